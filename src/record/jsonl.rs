//! JSONL encoding and decoding for unified records

use super::types::{Record, RecordKind, WireRecord};
use crate::error::Result;
use tracing::debug;

/// Counters collected while decoding a raw drop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Non-blank lines seen
    pub lines: usize,
    /// Lines that were not a JSON object
    pub malformed_lines: usize,
    /// Objects with a missing or unknown `record_type`
    pub unknown_kind: usize,
    pub customers: usize,
    pub orders: usize,
    pub payments: usize,
}

impl DecodeStats {
    /// Number of records that made it into the union
    pub fn records(&self) -> usize {
        self.customers + self.orders + self.payments
    }

    fn count(&mut self, kind: RecordKind) {
        match kind {
            RecordKind::Customer => self.customers += 1,
            RecordKind::Order => self.orders += 1,
            RecordKind::Payment => self.payments += 1,
        }
    }
}

/// Decode a JSONL body into records
///
/// Malformed lines and unknown record kinds are skipped and counted; a bad
/// line never fails the whole drop.
pub fn decode_jsonl(body: &str) -> (Vec<Record>, DecodeStats) {
    let mut records = Vec::new();
    let mut stats = DecodeStats::default();

    for (line_num, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        let wire: WireRecord = match serde_json::from_str(line) {
            Ok(wire) => wire,
            Err(e) => {
                debug!("Skipping malformed JSONL at line {}: {e}", line_num + 1);
                stats.malformed_lines += 1;
                continue;
            }
        };

        match wire.into_record() {
            Some(record) => {
                stats.count(record.kind());
                records.push(record);
            }
            None => stats.unknown_kind += 1,
        }
    }

    (records, stats)
}

/// Encode records as JSONL, one wide record per line
pub fn encode_jsonl(records: &[Record]) -> Result<String> {
    let mut body = String::new();
    for record in records {
        body.push_str(&serde_json::to_string(&WireRecord::from(record))?);
        body.push('\n');
    }
    Ok(body)
}
