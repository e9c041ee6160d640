//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, MessageFormat};
use crate::config::JobConfig;
use crate::error::Result;
use crate::generate::{generate, GenerateReport, GeneratorConfig};
use crate::job::{RunOutcome, RunReport, TransformJob};
use crate::output::PublishOutcome;
use crate::store::{RetryPolicy, Storage};
use serde_json::{json, Value};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Transform { job_name } => self.transform(job_name).await,
            Commands::Generate {
                customers,
                orders,
                days,
                seed,
            } => {
                let config = GeneratorConfig {
                    customers: *customers,
                    orders: *orders,
                    days: *days,
                    seed: *seed,
                };
                self.generate(&config).await
            }
            Commands::Config => self.show_config(),
        }
    }

    /// Load configuration, falling back to the built-in defaults
    fn load_config(&self) -> Result<JobConfig> {
        match &self.cli.config {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                JobConfig::from_file(path)
            }
            None => Ok(JobConfig::default()),
        }
    }

    /// Run the batch transform
    async fn transform(&self, job_name: &str) -> Result<()> {
        let config = self.load_config()?;
        let job = TransformJob::from_config(job_name, config)?;

        let report = job.run().await?;
        report.commit();

        self.output_message(&report_message(&report));
        Ok(())
    }

    /// Generate and upload a synthetic drop
    async fn generate(&self, generator: &GeneratorConfig) -> Result<()> {
        let config = self.load_config()?;
        let storage = Storage::open(
            &config.raw.url,
            &config.region,
            RetryPolicy::from(&config.retry),
        )?;

        let report = generate(&storage, &config.raw, generator).await?;
        self.output_message(&generate_message(&config.raw.url, &report));
        Ok(())
    }

    /// Print the effective configuration
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        print!("{}", config.to_yaml()?);
        Ok(())
    }

    /// Output a message in the selected format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            MessageFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            MessageFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Result message for a transform run
pub fn report_message(report: &RunReport) -> Value {
    match &report.outcome {
        RunOutcome::NoInput => json!({
            "type": "TRANSFORM",
            "job_name": report.job_name,
            "status": "NO_INPUT",
            "duration_ms": report.duration_ms,
        }),
        RunOutcome::Completed {
            source,
            decode,
            transform,
            part_key,
            publish,
        } => {
            let (status, published, source_deleted, error) = match publish {
                PublishOutcome::Published {
                    key,
                    source_deleted,
                } => ("PUBLISHED", Some(key.as_str()), Some(*source_deleted), None),
                PublishOutcome::NoDataFile { .. } => ("NO_DATA_FILE", None, None, None),
                PublishOutcome::RenameFailed { error, .. } => {
                    ("RENAME_FAILED", None, None, Some(error.as_str()))
                }
            };
            json!({
                "type": "TRANSFORM",
                "job_name": report.job_name,
                "status": status,
                "source": source,
                "part_key": part_key,
                "published_key": published,
                "part_deleted": source_deleted,
                "error": error,
                "duration_ms": report.duration_ms,
                "stats": {
                    "lines": decode.lines,
                    "unparseable_lines": decode.malformed_lines,
                    "unknown_kinds": decode.unknown_kind,
                    "orders_seen": transform.orders_seen,
                    "orders_dropped": transform.orders_dropped,
                    "payments_seen": transform.payments_seen,
                    "duplicate_payments": transform.duplicate_payments,
                    "unmatched_orders": transform.unmatched_orders,
                    "rows_out": transform.rows_out,
                }
            })
        }
    }
}

/// Result message for a generator run
pub fn generate_message(raw_url: &str, report: &GenerateReport) -> Value {
    json!({
        "type": "GENERATE",
        "location": format!("{}/{}", raw_url.trim_end_matches('/'), report.key),
        "records": report.records(),
        "customers": report.customers,
        "orders": report.orders,
        "payments": report.payments,
    })
}
