//! Synthetic dataset generator
//!
//! Produces customer, order and payment records in the unified wide shape and
//! uploads them as one JSONL drop under the raw prefix.
//!
//! # Overview
//!
//! - [`RecordGenerator`] - seedable builder for the three record kinds
//! - [`GeneratorConfig`] - pool size, order count, date window, seed
//! - [`upload_drop`] - encode a batch and write it under a timestamped key
//! - [`generate`] - both of the above in one call

mod builder;
mod types;

pub use builder::{RecordGenerator, DISCOUNTS, PAYMENT_STATUSES, PAYMENT_TYPES};
pub use types::{GenerateReport, GeneratedBatch, GeneratorConfig};

use crate::config::RawSourceConfig;
use crate::error::{Result, ResultExt};
use crate::record::encode_jsonl;
use crate::store::Storage;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;

/// Stem of every raw drop name
pub const DROP_NAME_PREFIX: &str = "ecommerce_unified_";

/// Key of a drop written at `at`: `<prefix>/ecommerce_unified_<YYYY-MM-DD-HH-MM-SS><suffix>`
pub fn drop_key(raw: &RawSourceConfig, at: DateTime<Utc>) -> String {
    let prefix = raw.prefix.trim_matches('/');
    let name = format!(
        "{DROP_NAME_PREFIX}{}{}",
        at.format("%Y-%m-%d-%H-%M-%S"),
        raw.suffix
    );
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}/{name}")
    }
}

/// Encode a generated batch as JSONL and write it as one object
pub async fn upload_drop(
    storage: &Storage,
    raw: &RawSourceConfig,
    batch: GeneratedBatch,
    at: DateTime<Utc>,
) -> Result<GenerateReport> {
    let report = GenerateReport {
        key: drop_key(raw, at),
        customers: batch.customers.len(),
        orders: batch.orders.len(),
        payments: batch.payments.len(),
    };

    let body = encode_jsonl(&batch.into_records()).context("Failed to encode generated drop")?;
    let path = storage.path(&report.key);
    storage.put(&path, Bytes::from(body)).await?;

    info!(
        "Uploaded {} records to {} ({} customers, {} orders, {} payments)",
        report.records(),
        storage.url(&path),
        report.customers,
        report.orders,
        report.payments
    );
    Ok(report)
}

/// Generate a drop and upload it
pub async fn generate(
    storage: &Storage,
    raw: &RawSourceConfig,
    config: &GeneratorConfig,
) -> Result<GenerateReport> {
    let now = Utc::now();
    let batch = RecordGenerator::new(config.seed, now).generate(config)?;
    upload_drop(storage, raw, batch, now).await
}
