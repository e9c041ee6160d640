//! Newest-object lookup

use super::storage::Storage;
use crate::error::Result;
use object_store::ObjectMeta;
use tracing::debug;

/// Pick the most recently modified object whose key ends with `suffix`
///
/// Equal timestamps resolve to the greatest key, so the choice does not
/// depend on listing order.
pub fn select_newest<'a>(objects: &'a [ObjectMeta], suffix: &str) -> Option<&'a ObjectMeta> {
    objects
        .iter()
        .filter(|meta| meta.location.as_ref().ends_with(suffix))
        .max_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.location.as_ref().cmp(b.location.as_ref()))
        })
}

/// List `prefix` and return the newest object ending with `suffix`
///
/// `Ok(None)` means there is nothing to process yet.
pub async fn find_newest(
    storage: &Storage,
    prefix: &str,
    suffix: &str,
) -> Result<Option<ObjectMeta>> {
    let listing = storage.list(prefix).await?;
    let newest = select_newest(&listing, suffix).cloned();

    debug!(
        "{} of {} objects under '{}' end with '{}'",
        listing
            .iter()
            .filter(|meta| meta.location.as_ref().ends_with(suffix))
            .count(),
        listing.len(),
        prefix,
        suffix
    );

    Ok(newest)
}
