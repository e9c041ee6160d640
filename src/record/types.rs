//! Record types
//!
//! `WireRecord` mirrors the unified JSONL layout field for field. It exists
//! only at the edges; everything in between uses the [`Record`] union.

use super::coerce::{coerce_f64, coerce_i64, lenient_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Record Kind
// ============================================================================

/// Discriminator carried in the `record_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Customer,
    Order,
    Payment,
}

impl RecordKind {
    /// Wire value of the discriminator
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Customer => "customer",
            RecordKind::Order => "order",
            RecordKind::Payment => "payment",
        }
    }

    /// Parse a wire discriminator (exact, case-sensitive match)
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(RecordKind::Customer),
            "order" => Some(RecordKind::Order),
            "payment" => Some(RecordKind::Payment),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Typed Records
// ============================================================================

/// A customer in the generated pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customer {
    pub ingest_ts: Option<String>,
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub created_at: Option<String>,
}

/// An order line, already cast to its working types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub ingest_ts: Option<String>,
    pub customer_id: Option<String>,
    pub order_id: Option<String>,
    pub order_date: Option<String>,
    pub product_id: Option<String>,
    pub product: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub price: Option<f64>,
    pub discount_pct: Option<f64>,
    pub order_amount: Option<f64>,
    pub currency: Option<String>,
}

/// A payment attached to an order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payment {
    pub ingest_ts: Option<String>,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub payment_type: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub payment_date: Option<String>,
}

/// One record of a raw drop
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Customer(Customer),
    Order(Order),
    Payment(Payment),
}

impl Record {
    /// Kind of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Customer(_) => RecordKind::Customer,
            Record::Order(_) => RecordKind::Order,
            Record::Payment(_) => RecordKind::Payment,
        }
    }

    /// Borrow the order, if this is one
    pub fn as_order(&self) -> Option<&Order> {
        match self {
            Record::Order(order) => Some(order),
            _ => None,
        }
    }

    /// Borrow the payment, if this is one
    pub fn as_payment(&self) -> Option<&Payment> {
        match self {
            Record::Payment(payment) => Some(payment),
            _ => None,
        }
    }
}

// ============================================================================
// Wire Record
// ============================================================================

/// The unified wide record as it appears on one JSONL line
///
/// Numeric fields keep their raw JSON value so that strings like `"3"` can be
/// cast instead of rejecting the whole line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    // housekeeping
    #[serde(default, deserialize_with = "lenient_string")]
    pub record_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingest_ts: Option<String>,

    // customer
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,

    // order
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit_price: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub discount_pct: Option<Value>,
    #[serde(default)]
    pub order_amount: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: Option<String>,

    // payment
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_date: Option<String>,
}

impl WireRecord {
    /// Convert into the tagged union
    ///
    /// Returns `None` when the discriminator is missing or unknown.
    pub fn into_record(self) -> Option<Record> {
        let kind = RecordKind::from_wire(self.record_type.as_deref()?)?;
        let int = |v: &Option<Value>| v.as_ref().and_then(coerce_i64);
        let float = |v: &Option<Value>| v.as_ref().and_then(coerce_f64);

        Some(match kind {
            RecordKind::Customer => Record::Customer(Customer {
                ingest_ts: self.ingest_ts,
                customer_id: self.customer_id,
                name: self.name,
                email: self.email,
                country: self.country,
                city: self.city,
                created_at: self.created_at,
            }),
            RecordKind::Order => Record::Order(Order {
                quantity: int(&self.quantity),
                unit_price: float(&self.unit_price),
                price: float(&self.price),
                discount_pct: float(&self.discount_pct),
                order_amount: float(&self.order_amount),
                ingest_ts: self.ingest_ts,
                customer_id: self.customer_id,
                order_id: self.order_id,
                order_date: self.order_date,
                product_id: self.product_id,
                product: self.product,
                category: self.category,
                brand: self.brand,
                currency: self.currency,
            }),
            RecordKind::Payment => Record::Payment(Payment {
                amount: float(&self.amount),
                ingest_ts: self.ingest_ts,
                order_id: self.order_id,
                payment_id: self.payment_id,
                payment_type: self.payment_type,
                currency: self.currency,
                status: self.status,
                payment_date: self.payment_date,
            }),
        })
    }
}

fn float_value(value: Option<f64>) -> Option<Value> {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

impl From<&Record> for WireRecord {
    fn from(record: &Record) -> Self {
        let mut wire = WireRecord {
            record_type: Some(record.kind().as_str().to_string()),
            ..WireRecord::default()
        };

        match record {
            Record::Customer(c) => {
                wire.ingest_ts.clone_from(&c.ingest_ts);
                wire.customer_id.clone_from(&c.customer_id);
                wire.name.clone_from(&c.name);
                wire.email.clone_from(&c.email);
                wire.country.clone_from(&c.country);
                wire.city.clone_from(&c.city);
                wire.created_at.clone_from(&c.created_at);
            }
            Record::Order(o) => {
                wire.ingest_ts.clone_from(&o.ingest_ts);
                wire.customer_id.clone_from(&o.customer_id);
                wire.order_id.clone_from(&o.order_id);
                wire.order_date.clone_from(&o.order_date);
                wire.product_id.clone_from(&o.product_id);
                wire.product.clone_from(&o.product);
                wire.category.clone_from(&o.category);
                wire.brand.clone_from(&o.brand);
                wire.quantity = o.quantity.map(Value::from);
                wire.unit_price = float_value(o.unit_price);
                wire.price = float_value(o.price);
                wire.discount_pct = float_value(o.discount_pct);
                wire.order_amount = float_value(o.order_amount);
                wire.currency.clone_from(&o.currency);
            }
            Record::Payment(p) => {
                wire.ingest_ts.clone_from(&p.ingest_ts);
                wire.order_id.clone_from(&p.order_id);
                wire.payment_id.clone_from(&p.payment_id);
                wire.payment_type.clone_from(&p.payment_type);
                wire.amount = float_value(p.amount);
                wire.currency.clone_from(&p.currency);
                wire.status.clone_from(&p.status);
                wire.payment_date.clone_from(&p.payment_date);
            }
        }

        wire
    }
}
