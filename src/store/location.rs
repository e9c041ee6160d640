//! Store URL parsing (S3, GCS, Azure, local)

use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use std::sync::Arc;

/// A bucket (or directory) an object store client is bound to
#[derive(Debug, Clone)]
pub struct StoreLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Bucket, container or local root the store is bound to
    bucket: String,
    /// Path prefix given in the URL after the bucket name
    base: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl StoreLocation {
    /// Parse a store URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket[/base]` - AWS S3 (credentials and endpoint from env)
    /// - `gs://bucket[/base]` - Google Cloud Storage
    /// - `az://container[/base]` - Azure Blob Storage
    /// - `memory://` - Process-local in-memory store
    /// - `/local/path` or `file:///local/path` - Local filesystem
    pub fn parse(url: &str, region: &str) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            Self::parse_s3(rest, region)
        } else if let Some(rest) = url.strip_prefix("gs://") {
            Self::parse_gcs(rest)
        } else if let Some(rest) = url.strip_prefix("az://") {
            Self::parse_azure(rest)
        } else if url.starts_with("memory://") {
            Ok(Self::from_store(Arc::new(InMemory::new()), "memory"))
        } else {
            Self::parse_local(url)
        }
    }

    /// Bind to an existing store (tests, embedding)
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: impl Into<String>) -> Self {
        Self {
            store,
            bucket: String::new(),
            base: String::new(),
            scheme: scheme.into(),
        }
    }

    fn parse_s3(rest: &str, region: &str) -> Result<Self> {
        let (bucket, base) = split_bucket(rest, "s3")?;
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            base,
            scheme: "s3".to_string(),
        })
    }

    fn parse_gcs(rest: &str) -> Result<Self> {
        let (bucket, base) = split_bucket(rest, "gs")?;
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            base,
            scheme: "gs".to_string(),
        })
    }

    fn parse_azure(rest: &str) -> Result<Self> {
        let (container, base) = split_bucket(rest, "az")?;
        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: container.to_string(),
            base,
            scheme: "az".to_string(),
        })
    }

    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        // Create directory if it doesn't exist
        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: path.trim_end_matches('/').to_string(),
            base: String::new(),
            scheme: "file".to_string(),
        })
    }

    /// Get the scheme (s3, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Bucket, container or local root; empty for in-memory stores
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Base prefix from the URL, without slashes at either end
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }
}

/// Split `bucket/base/path` into bucket and trimmed base
fn split_bucket<'a>(rest: &'a str, scheme: &str) -> Result<(&'a str, String)> {
    let (bucket, base) = match rest.find('/') {
        Some(idx) => (&rest[..idx], rest[idx + 1..].trim_matches('/').to_string()),
        None => (rest, String::new()),
    };
    if bucket.is_empty() {
        return Err(Error::config(format!("Missing bucket in {scheme}:// URL")));
    }
    Ok((bucket, base))
}
