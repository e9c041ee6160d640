//! Transform job module
//!
//! Single-shot batch run: find the newest raw drop, transform it and publish
//! one clean artifact.
//!
//! # Overview
//!
//! The job module provides:
//! - `TransformJob` - Runs one transform against a raw and an output store
//! - `RunReport` - What the run did, logged on commit
//! - `RunOutcome` - `NoInput` or `Completed`

mod types;

pub use types::{RunOutcome, RunReport};

use crate::config::JobConfig;
use crate::error::{Error, Result};
use crate::output::{encode, publish, to_record_batch, write_batch, BatchLayout};
use crate::record::decode_jsonl;
use crate::store::{find_newest, RetryPolicy, Storage};
use crate::transform::transform;
use std::time::Instant;
use tracing::{debug, info};

/// One named run of the batch transform
#[derive(Debug, Clone)]
pub struct TransformJob {
    /// Run name passed at invocation
    name: String,
    /// Deployment targets and run policy
    config: JobConfig,
    /// Store holding raw drops
    raw: Storage,
    /// Store receiving clean artifacts
    output: Storage,
}

impl TransformJob {
    /// Create a job over already opened stores
    pub fn new(
        name: impl Into<String>,
        config: JobConfig,
        raw: Storage,
        output: Storage,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::missing_field("job_name"));
        }
        config.validate()?;

        Ok(Self {
            name,
            config,
            raw,
            output,
        })
    }

    /// Create a job, opening both stores from the config URLs
    pub fn from_config(name: impl Into<String>, config: JobConfig) -> Result<Self> {
        let retry = RetryPolicy::from(&config.retry);
        let raw = Storage::open(&config.raw.url, &config.region, retry.clone())?;
        let output = Storage::open(&config.output.url, &config.region, retry)?;
        Self::new(name, config, raw, output)
    }

    /// Get the job name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the config
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run the transform under the configured timeout
    ///
    /// Missing input and anything that goes wrong after the data part is
    /// written are reported through the returned [`RunReport`]. Failures
    /// before that point and the timeout are errors.
    pub async fn run(&self) -> Result<RunReport> {
        let timeout = self.config.run_timeout();
        match tokio::time::timeout(timeout, self.execute()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    async fn execute(&self) -> Result<RunReport> {
        let start = Instant::now();
        info!(
            "Starting job {}: {} -> {}",
            self.name, self.config.raw.url, self.config.output.url
        );

        let raw = &self.config.raw;
        let Some(newest) = find_newest(&self.raw, &raw.prefix, &raw.suffix).await? else {
            info!(
                "No raw objects found under {}/{} ending with {}",
                self.config.raw.url.trim_end_matches('/'),
                raw.prefix,
                raw.suffix
            );
            return Ok(RunReport::no_input(&self.name)
                .with_duration(start.elapsed().as_millis() as u64));
        };

        let source = self.raw.url(&newest.location);
        info!("Newest raw object: {source} ({} bytes)", newest.size);

        let body = self.raw.get_text(&newest.location).await?;
        let (records, decode) = decode_jsonl(&body);
        let (rows, stats) = transform(&records);

        let batch = to_record_batch(&rows)?;
        let format = self.config.output_format;
        let data = encode(&batch, format)?;
        debug!("Encoded {} rows as {} bytes of {}", rows.len(), data.len(), format.extension());

        let layout = BatchLayout::fresh(&self.config.output.prefix, format);
        let part = write_batch(&self.output, &layout, data).await?;
        let publish = publish(&self.output, &layout).await;

        Ok(RunReport {
            job_name: self.name.clone(),
            outcome: RunOutcome::Completed {
                source,
                decode,
                transform: stats,
                part_key: part.to_string(),
                publish,
            },
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests;
