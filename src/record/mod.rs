//! Unified record model
//!
//! Raw drops carry three record kinds (customer, order, payment) in one wide
//! shape where every field not applicable to a kind is an explicit null.
//!
//! # Overview
//!
//! - [`WireRecord`] is the wide nullable shape used on the wire
//! - [`Record`] is the tagged union the rest of the crate works with
//! - [`decode_jsonl`] / [`encode_jsonl`] convert between JSONL text and records

mod coerce;
mod jsonl;
mod types;

pub use coerce::{coerce_f64, coerce_i64, lenient_string};
pub use jsonl::{decode_jsonl, encode_jsonl, DecodeStats};
pub use types::{Customer, Order, Payment, Record, RecordKind, WireRecord};
