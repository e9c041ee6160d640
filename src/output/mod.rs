//! Output module
//!
//! Turns clean rows into one tabular artifact and publishes it under a
//! predictable name.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Building the fixed 7-column Arrow batch from clean rows
//! - Encoding a batch as fully quoted CSV or as Parquet
//! - Writing the batch directory (data part plus `_SUCCESS` marker)
//! - Publishing the part under its final name with a content type

mod csv;
mod publish;
mod table;
mod writer;

pub use csv::encode_csv;
pub use publish::{
    find_data_file, publish, write_batch, BatchLayout, PublishOutcome, FINAL_NAME_PREFIX,
    SUCCESS_MARKER,
};
pub use table::{clean_schema, to_record_batch, CLEAN_COLUMNS};
pub use writer::{encode_parquet, ParquetWriterConfig};

use crate::error::Result;
use crate::types::OutputFormat;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;

/// Encode a batch in the requested format
pub fn encode(batch: &RecordBatch, format: OutputFormat) -> Result<Bytes> {
    match format {
        OutputFormat::Csv => Ok(Bytes::from(encode_csv(batch)?)),
        OutputFormat::Parquet => {
            encode_parquet(batch, &ParquetWriterConfig::default()).map(Bytes::from)
        }
    }
}
