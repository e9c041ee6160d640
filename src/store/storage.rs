//! Retrying storage facade

use super::location::StoreLocation;
use super::retry::RetryPolicy;
use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectMeta, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;
use tracing::debug;

/// Object storage with retries on every call
#[derive(Debug, Clone)]
pub struct Storage {
    location: StoreLocation,
    retry: RetryPolicy,
}

impl Storage {
    /// Create storage over a parsed location
    pub fn new(location: StoreLocation, retry: RetryPolicy) -> Self {
        Self { location, retry }
    }

    /// Parse a URL and create storage for it
    pub fn open(url: &str, region: &str, retry: RetryPolicy) -> Result<Self> {
        Ok(Self::new(StoreLocation::parse(url, region)?, retry))
    }

    /// Wrap an existing store
    pub fn from_store(store: Arc<dyn ObjectStore>, retry: RetryPolicy) -> Self {
        Self::new(StoreLocation::from_store(store, "memory"), retry)
    }

    /// Get the scheme (s3, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        self.location.scheme()
    }

    /// Retry policy in use
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolve a key relative to the URL base into a store path
    pub fn path(&self, key: &str) -> ObjectPath {
        let base = self.location.base();
        if base.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{base}/{key}"))
        }
    }

    /// Render a store path as a URL, bucket included
    pub fn url(&self, path: &ObjectPath) -> String {
        let bucket = self.location.bucket();
        if bucket.is_empty() {
            format!("{}://{path}", self.scheme())
        } else {
            format!("{}://{bucket}/{path}", self.scheme())
        }
    }

    /// List every object under a key prefix
    ///
    /// The underlying listing is paginated by the store client; the stream is
    /// drained completely, so a retry restarts the listing from the top.
    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let store = self.location.store();
        let store = &store;
        let path = self.path(prefix);
        let path = &path;

        let objects = self
            .retry
            .run("list", path.as_ref(), move || {
                store.list(Some(path)).try_collect::<Vec<ObjectMeta>>()
            })
            .await?;

        debug!("Listed {} objects under {}", objects.len(), self.url(path));
        Ok(objects)
    }

    /// Read a whole object
    pub async fn get_bytes(&self, path: &ObjectPath) -> Result<Bytes> {
        let store = self.location.store();
        let store = &store;

        self.retry
            .run("get", path.as_ref(), move || async move {
                store.get(path).await?.bytes().await
            })
            .await
    }

    /// Read a whole object as UTF-8 text
    pub async fn get_text(&self, path: &ObjectPath) -> Result<String> {
        let bytes = self.get_bytes(path).await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::decode(format!("{} is not valid UTF-8: {e}", self.url(path))))
    }

    /// Write an object
    pub async fn put(&self, path: &ObjectPath, data: Bytes) -> Result<()> {
        let store = self.location.store();
        let store = &store;
        let data = &data;

        self.retry
            .run("put", path.as_ref(), move || async move {
                store
                    .put(path, PutPayload::from(data.clone()))
                    .await
                    .map(|_| ())
            })
            .await
    }

    /// Write an object with an explicit content type
    ///
    /// Stores that cannot carry attributes (the local filesystem) get a plain
    /// write instead.
    pub async fn put_with_content_type(
        &self,
        path: &ObjectPath,
        data: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let store = self.location.store();
        let store = &store;
        let data_ref = &data;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..PutOptions::default()
        };
        let opts = &opts;

        let result = self
            .retry
            .run("put", path.as_ref(), move || async move {
                store
                    .put_opts(path, PutPayload::from(data_ref.clone()), opts.clone())
                    .await
                    .map(|_| ())
            })
            .await;

        match result {
            Err(Error::Unsupported { .. }) => {
                debug!(
                    "{} does not store content types, writing {} without one",
                    self.scheme(),
                    self.url(path)
                );
                self.put(path, data).await
            }
            other => other,
        }
    }

    /// Copy an object, replacing its metadata with the given content type
    pub async fn copy_with_content_type(
        &self,
        from: &ObjectPath,
        to: &ObjectPath,
        content_type: &str,
    ) -> Result<()> {
        let data = self.get_bytes(from).await?;
        self.put_with_content_type(to, data, content_type).await
    }

    /// Delete an object
    pub async fn delete(&self, path: &ObjectPath) -> Result<()> {
        let store = self.location.store();
        let store = &store;

        self.retry
            .run("delete", path.as_ref(), move || store.delete(path))
            .await
    }
}
