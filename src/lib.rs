// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # shopclean
//!
//! Batch cleaner for unified e-commerce drops kept in object storage.
//!
//! A generator writes customers, orders and payments as one JSONL object;
//! the transform picks the newest such object, cleans and enriches its
//! orders, joins their payment status and publishes one flat CSV under a
//! predictable name.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopclean::{JobConfig, Result, TransformJob};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = JobConfig::from_file("job.yaml")?;
//!     let job = TransformJob::from_config("nightly", config)?;
//!
//!     let report = job.run().await?;
//!     report.commit();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   JSONL   ┌──────────────────────────────────────────────┐
//! │  generate  │ ────────► │                    job                       │
//! └────────────┘   store   │  select newest → decode → transform → output │
//!                          └──────────────────────────────────────────────┘
//!       ┌──────────┬────────────┬───────────────┬─────────────────┐
//!       │  store   │  record    │  transform    │  output         │
//!       ├──────────┼────────────┼───────────────┼─────────────────┤
//!       │ S3/GCS/  │ wide JSONL │ project/cast  │ Arrow batch     │
//!       │ Azure/   │ tagged     │ hash ids      │ quoted CSV      │
//!       │ local    │ union      │ left join     │ Parquet         │
//!       │ retries  │            │               │ copy + delete   │
//!       └──────────┴────────────┴───────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Job configuration
pub mod config;

/// Object storage with retries
pub mod store;

/// Unified record model and JSONL codec
pub mod record;

/// Order cleaning, hashing and payment join
pub mod transform;

/// Arrow/CSV/Parquet output and publication
pub mod output;

/// Single-shot transform job
pub mod job;

/// Synthetic dataset generator
pub mod generate;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::JobConfig;
pub use job::{RunOutcome, RunReport, TransformJob};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
