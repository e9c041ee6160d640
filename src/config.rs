//! Job configuration
//!
//! Deployment targets (region, buckets, prefixes) and run policy are kept in
//! one explicit structure that is loaded from YAML and handed to the job.
//! Every field has a default matching the production deployment, so an empty
//! document is a valid configuration.

use crate::error::{Error, Result};
use crate::types::{BackoffType, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Job Config
// ============================================================================

/// Complete configuration for one transform or generator invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Cloud region used for S3 clients
    #[serde(default = "default_region")]
    pub region: String,

    /// Where raw unified JSONL objects are written and discovered
    #[serde(default)]
    pub raw: RawSourceConfig,

    /// Where cleaned artifacts are published
    #[serde(default)]
    pub output: OutputConfig,

    /// Artifact format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Retry policy for storage calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Upper bound on a whole transform run
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_run_timeout_secs() -> u64 {
    15 * 60
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            raw: RawSourceConfig::default(),
            output: OutputConfig::default(),
            output_format: OutputFormat::default(),
            retry: RetryConfig::default(),
            run_timeout_secs: default_run_timeout_secs(),
        }
    }
}

impl JobConfig {
    /// Parse a config from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Render the effective config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Overall run timeout
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    /// Check the config for values that can never work
    pub fn validate(&self) -> Result<()> {
        if self.raw.url.trim().is_empty() {
            return Err(Error::missing_field("raw.url"));
        }
        if self.output.url.trim().is_empty() {
            return Err(Error::missing_field("output.url"));
        }
        if self.raw.suffix.is_empty() {
            return Err(Error::invalid_value("raw.suffix", "must not be empty"));
        }
        validate_prefix("raw.prefix", &self.raw.prefix)?;
        validate_prefix("output.prefix", &self.output.prefix)?;
        if self.run_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "run_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            return Err(Error::invalid_value(
                "retry.max_backoff_ms",
                "must not be smaller than retry.initial_backoff_ms",
            ));
        }
        Ok(())
    }
}

fn validate_prefix(field: &str, prefix: &str) -> Result<()> {
    if prefix.split('/').any(|segment| segment == "..") {
        return Err(Error::invalid_value(field, "must not contain '..'"));
    }
    Ok(())
}

// ============================================================================
// Raw Source
// ============================================================================

/// Location of raw unified JSONL drops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSourceConfig {
    /// Store URL (`s3://bucket`, `gs://bucket`, `az://container`, or a local path)
    #[serde(default = "default_raw_url")]
    pub url: String,

    /// Key prefix holding the raw objects
    #[serde(default = "default_raw_prefix")]
    pub prefix: String,

    /// Only keys ending with this suffix are candidates
    #[serde(default = "default_raw_suffix")]
    pub suffix: String,
}

fn default_raw_url() -> String {
    "s3://aws-project-4-raw-data".to_string()
}

fn default_raw_prefix() -> String {
    "raw/ecommerce/".to_string()
}

fn default_raw_suffix() -> String {
    ".jsonl".to_string()
}

impl Default for RawSourceConfig {
    fn default() -> Self {
        Self {
            url: default_raw_url(),
            prefix: default_raw_prefix(),
            suffix: default_raw_suffix(),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Location of cleaned artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Store URL
    #[serde(default = "default_output_url")]
    pub url: String,

    /// Key prefix under which batch directories are created
    #[serde(default = "default_output_prefix")]
    pub prefix: String,
}

fn default_output_url() -> String {
    "s3://aws-project-4-processed-data".to_string()
}

fn default_output_prefix() -> String {
    "cleaned-csv/ecommerce/".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            url: default_output_url(),
            prefix: default_output_prefix(),
        }
    }
}

// ============================================================================
// Retry
// ============================================================================

/// Retry settings for storage calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound for any single delay
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// How the delay grows between attempts
    #[serde(default)]
    pub backoff: BackoffType,
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    2_000
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff: BackoffType::default(),
        }
    }
}

impl RetryConfig {
    /// Retry config that never sleeps (tests and local runs)
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
            backoff: BackoffType::Constant,
        }
    }
}
