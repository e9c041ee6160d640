//! Job types
//!
//! Run outcome and report returned by a transform job.

use crate::output::PublishOutcome;
use crate::record::DecodeStats;
use crate::transform::TransformStats;
use tracing::{error, info};

/// What a transform run ended with
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No raw object matched the prefix and suffix
    NoInput,
    /// A raw object was transformed and written
    Completed {
        /// URL of the raw object that was read
        source: String,
        /// Decoding counters for the raw object
        decode: DecodeStats,
        /// Transform counters
        transform: TransformStats,
        /// Key of the data part as first written
        part_key: String,
        /// Result of the rename step
        publish: PublishOutcome,
    },
}

/// Summary of one transform run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Run name passed at invocation
    pub job_name: String,
    /// How the run ended
    pub outcome: RunOutcome,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Report for a run that found nothing to process
    pub fn no_input(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            outcome: RunOutcome::NoInput,
            duration_ms: 0,
        }
    }

    /// Set duration
    #[must_use]
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Final key of the published artifact, if any
    pub fn published_key(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Completed { publish, .. } => publish.key(),
            RunOutcome::NoInput => None,
        }
    }

    /// Number of clean rows written
    pub fn rows_out(&self) -> usize {
        match &self.outcome {
            RunOutcome::Completed { transform, .. } => transform.rows_out,
            RunOutcome::NoInput => 0,
        }
    }

    /// Check if the run had nothing to do
    pub fn is_no_input(&self) -> bool {
        matches!(self.outcome, RunOutcome::NoInput)
    }

    /// Finalise the run by logging its summary
    ///
    /// Called on every path that does not end in an error, including runs
    /// without input and runs whose rename step found no part or failed.
    pub fn commit(&self) {
        match &self.outcome {
            RunOutcome::NoInput => {
                info!("Job {} committed: no raw objects found", self.job_name);
            }
            RunOutcome::Completed {
                source,
                decode,
                transform,
                publish,
                ..
            } => {
                info!(
                    "Job {} read {} records from {} ({} unparseable lines, {} unknown kinds)",
                    self.job_name,
                    decode.records(),
                    source,
                    decode.malformed_lines,
                    decode.unknown_kind
                );
                info!(
                    "Orders kept {} of {} ({} dropped), payments {} ({} duplicates ignored), {} without payment",
                    transform.rows_out,
                    transform.orders_seen,
                    transform.orders_dropped,
                    transform.payments_seen,
                    transform.duplicate_payments,
                    transform.unmatched_orders
                );
                match publish {
                    PublishOutcome::Published { key, .. } => {
                        info!(
                            "Job {} committed in {}ms: {}",
                            self.job_name, self.duration_ms, key
                        );
                    }
                    PublishOutcome::NoDataFile { dir } => {
                        error!(
                            "Job {} committed in {}ms without a published file under {}",
                            self.job_name, self.duration_ms, dir
                        );
                    }
                    PublishOutcome::RenameFailed { dir, error } => {
                        error!(
                            "Job {} committed in {}ms, rename under {} failed: {}",
                            self.job_name, self.duration_ms, dir, error
                        );
                    }
                }
            }
        }
    }
}
