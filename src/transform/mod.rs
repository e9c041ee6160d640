//! Batch transform
//!
//! Turns the records of one raw drop into clean, flat order rows.
//!
//! # Overview
//!
//! The transform runs in four steps, each a pure function of its input:
//! - project orders and payments out of the unified records, casting types,
//!   backfilling missing amounts and dropping corrupt orders
//! - derive the short customer id and the catalog product from stable hashes
//! - left-join payments onto orders and normalise the payment status
//! - assemble [`CleanRecord`] rows in the fixed output column order

mod hashing;
mod join;
mod pipeline;
mod project;

pub use hashing::{
    assign_product, short_customer_id, stable_bucket, stable_hash, CUSTOMER_ID_PREFIX,
    CUSTOMER_ID_SPACE, HASH_SEED, PRODUCT_CATALOG,
};
pub use join::{join_payments, normalize_status, JoinedOrder, PaymentIndex, UNKNOWN_STATUS};
pub use pipeline::{normalize_order_date, transform, CleanRecord, TransformStats};
pub use project::{
    backfill_amount, project_order, project_orders, project_payments, round2, OrdersView,
    PaymentView, ProjectedOrder,
};

#[cfg(test)]
mod tests;
