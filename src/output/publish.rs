//! Batch directory layout and publication
//!
//! Each run writes into a fresh `final_batch_<id>/` directory: one data part
//! plus a `_SUCCESS` marker. Publishing copies the part to
//! `ecommerce_clean_<YYYYMMDD-HHMMSS>.<ext>` in the same directory with an
//! explicit content type, then removes the part on a best-effort basis.
//! The final name existing is the only success signal; a leftover part after
//! a crash between copy and delete is harmless.

use crate::error::Result;
use crate::store::Storage;
use crate::types::OutputFormat;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::path::Path as ObjectPath;
use object_store::ObjectMeta;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Marker written next to the data part once it is complete
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Stem of the published file name
pub const FINAL_NAME_PREFIX: &str = "ecommerce_clean_";

/// Keys used by one transform run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLayout {
    output_prefix: String,
    batch_id: Uuid,
    started_at: DateTime<Utc>,
    format: OutputFormat,
}

impl BatchLayout {
    /// Layout for a given batch id and start time
    pub fn new(
        output_prefix: &str,
        batch_id: Uuid,
        started_at: DateTime<Utc>,
        format: OutputFormat,
    ) -> Self {
        let trimmed = output_prefix.trim_matches('/');
        let output_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };
        Self {
            output_prefix,
            batch_id,
            started_at,
            format,
        }
    }

    /// Layout with a random batch id starting now
    pub fn fresh(output_prefix: &str, format: OutputFormat) -> Self {
        Self::new(output_prefix, Uuid::new_v4(), Utc::now(), format)
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// UTC start time as `YYYYMMDD-HHMMSS`
    pub fn timestamp(&self) -> String {
        self.started_at.format("%Y%m%d-%H%M%S").to_string()
    }

    /// Batch directory, with trailing slash
    pub fn dir(&self) -> String {
        format!("{}final_batch_{}/", self.output_prefix, self.batch_id.simple())
    }

    /// Key of the data part as first written
    pub fn part_key(&self) -> String {
        format!(
            "{}part-00000-{}.{}",
            self.dir(),
            self.batch_id.simple(),
            self.format.extension()
        )
    }

    /// Key of the completion marker
    pub fn marker_key(&self) -> String {
        format!("{}{SUCCESS_MARKER}", self.dir())
    }

    /// Key of the published artifact
    pub fn final_key(&self) -> String {
        format!(
            "{}{FINAL_NAME_PREFIX}{}.{}",
            self.dir(),
            self.timestamp(),
            self.format.extension()
        )
    }
}

/// Outcome of the publish step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The artifact is available under its final key
    Published {
        key: String,
        /// Whether the original part could be removed
        source_deleted: bool,
    },
    /// Nothing to rename was found in the batch directory
    NoDataFile { dir: String },
    /// Listing the batch or copying the part failed after retries
    RenameFailed { dir: String, error: String },
}

impl PublishOutcome {
    /// Final key, if published
    pub fn key(&self) -> Option<&str> {
        match self {
            PublishOutcome::Published { key, .. } => Some(key),
            PublishOutcome::NoDataFile { .. } | PublishOutcome::RenameFailed { .. } => None,
        }
    }
}

/// Write the data part and then the `_SUCCESS` marker
pub async fn write_batch(storage: &Storage, layout: &BatchLayout, data: Bytes) -> Result<ObjectPath> {
    let part = storage.path(&layout.part_key());
    storage.put(&part, data).await?;
    storage
        .put(&storage.path(&layout.marker_key()), Bytes::new())
        .await?;

    info!("Wrote {} part to {}", layout.format.extension(), storage.url(&part));
    Ok(part)
}

/// Pick the data part out of a batch directory listing
///
/// Markers (names starting with `_` or `.`) and the final artifact itself are
/// skipped; among several parts the smallest key wins.
pub fn find_data_file<'a>(
    objects: &'a [ObjectMeta],
    extension: &str,
    final_path: &ObjectPath,
) -> Option<&'a ObjectMeta> {
    let suffix = format!(".{extension}");
    objects
        .iter()
        .filter(|meta| {
            let name = meta.location.filename().unwrap_or_default();
            name.ends_with(&suffix)
                && !name.starts_with('_')
                && !name.starts_with('.')
                && meta.location != *final_path
        })
        .min_by(|a, b| a.location.as_ref().cmp(b.location.as_ref()))
}

/// Rename the batch's data part to its final name
///
/// Never fails: the data part is already written when this runs. A missing
/// part is returned as [`PublishOutcome::NoDataFile`], a listing or copy that
/// fails after retries as [`PublishOutcome::RenameFailed`], and failing to
/// delete the original part is logged and otherwise ignored.
pub async fn publish(storage: &Storage, layout: &BatchLayout) -> PublishOutcome {
    match rename_part(storage, layout).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let dir = layout.dir();
            error!(
                "Rename step failed under {}, part left in place: {e}",
                storage.url(&storage.path(&dir))
            );
            PublishOutcome::RenameFailed {
                dir,
                error: e.to_string(),
            }
        }
    }
}

async fn rename_part(storage: &Storage, layout: &BatchLayout) -> Result<PublishOutcome> {
    let dir = layout.dir();
    let listing = storage.list(&dir).await?;
    let final_path = storage.path(&layout.final_key());

    let Some(part) = find_data_file(&listing, layout.format.extension(), &final_path) else {
        error!(
            "No part-*.{} found to rename under {}",
            layout.format.extension(),
            storage.url(&storage.path(&dir))
        );
        return Ok(PublishOutcome::NoDataFile { dir });
    };

    storage
        .copy_with_content_type(&part.location, &final_path, layout.format.content_type())
        .await?;

    let source_deleted = match storage.delete(&part.location).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Delete of original part file {} failed: {e}",
                storage.url(&part.location)
            );
            false
        }
    };

    info!("Renamed to: {}", storage.url(&final_path));
    Ok(PublishOutcome::Published {
        key: final_path.to_string(),
        source_deleted,
    })
}
