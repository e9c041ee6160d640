//! Clean rows as an Arrow RecordBatch

use crate::error::Result;
use crate::transform::CleanRecord;
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use std::sync::Arc;

/// Output columns, in order
pub const CLEAN_COLUMNS: [&str; 7] = [
    "order_id",
    "customer_id",
    "order_date",
    "product",
    "quantity",
    "order_amount",
    "payment_status",
];

/// Schema of the published artifact
pub fn clean_schema() -> Schema {
    Schema::new(vec![
        Field::new(CLEAN_COLUMNS[0], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[1], DataType::Utf8, true),
        Field::new(CLEAN_COLUMNS[2], DataType::Date32, true),
        Field::new(CLEAN_COLUMNS[3], DataType::Utf8, false),
        Field::new(CLEAN_COLUMNS[4], DataType::Int64, false),
        Field::new(CLEAN_COLUMNS[5], DataType::Float64, false),
        Field::new(CLEAN_COLUMNS[6], DataType::Utf8, false),
    ])
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    date.signed_duration_since(epoch).num_days() as i32
}

/// Build the 7-column batch from clean rows
pub fn to_record_batch(rows: &[CleanRecord]) -> Result<RecordBatch> {
    let order_id: StringArray = rows.iter().map(|r| Some(r.order_id.as_str())).collect();
    let customer_id: StringArray = rows.iter().map(|r| r.customer_id.as_deref()).collect();
    let order_date: Date32Array = rows
        .iter()
        .map(|r| r.order_date.map(days_since_epoch))
        .collect();
    let product: StringArray = rows.iter().map(|r| Some(r.product.as_str())).collect();
    let quantity: Int64Array = rows.iter().map(|r| Some(r.quantity)).collect();
    let order_amount: Float64Array = rows.iter().map(|r| Some(r.order_amount)).collect();
    let payment_status: StringArray = rows
        .iter()
        .map(|r| Some(r.payment_status.as_str()))
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(order_id),
        Arc::new(customer_id),
        Arc::new(order_date),
        Arc::new(product),
        Arc::new(quantity),
        Arc::new(order_amount),
        Arc::new(payment_status),
    ];

    Ok(RecordBatch::try_new(Arc::new(clean_schema()), columns)?)
}
