//! End-to-end record transform

use super::hashing::{assign_product, short_customer_id};
use super::join::{join_payments, PaymentIndex};
use super::project::{project_orders, project_payments};
use crate::record::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// One row of the published artifact, in output column order
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub order_id: String,
    /// Short `CUST-######` form
    pub customer_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    /// Catalog label derived from the order id
    pub product: String,
    pub quantity: i64,
    pub order_amount: f64,
    /// Lower-cased, `unknown` when no payment matched
    pub payment_status: String,
}

/// Aggregate counts for one transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub orders_seen: usize,
    pub orders_dropped: usize,
    pub payments_seen: usize,
    pub duplicate_payments: usize,
    pub unmatched_orders: usize,
    pub rows_out: usize,
}

/// Reduce an order timestamp to its date
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, RFC 3339 and bare dates; anything else is
/// null.
pub fn normalize_order_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|ts| ts.date())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Transform the records of one raw drop into clean rows
pub fn transform(records: &[Record]) -> (Vec<CleanRecord>, TransformStats) {
    let orders = project_orders(records);
    let payments = project_payments(records);
    let index = PaymentIndex::build(&payments);

    let mut stats = TransformStats {
        orders_seen: orders.seen,
        orders_dropped: orders.dropped,
        payments_seen: payments.len(),
        duplicate_payments: index.duplicates(),
        ..TransformStats::default()
    };

    let rows: Vec<CleanRecord> = join_payments(orders.orders, &index)
        .into_iter()
        .map(|joined| {
            if !joined.matched {
                stats.unmatched_orders += 1;
            }
            let order = joined.order;
            CleanRecord {
                // null stays null, it is never hashed
                customer_id: order.customer_id.as_deref().map(short_customer_id),
                order_date: normalize_order_date(order.order_date.as_deref()),
                product: assign_product(&order.order_id).to_string(),
                quantity: order.quantity,
                order_amount: order.order_amount,
                payment_status: joined.payment_status,
                order_id: order.order_id,
            }
        })
        .collect();

    stats.rows_out = rows.len();
    debug!(
        "Transform kept {} of {} orders ({} dropped, {} without payment)",
        stats.rows_out, stats.orders_seen, stats.orders_dropped, stats.unmatched_orders
    );

    (rows, stats)
}
