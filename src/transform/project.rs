//! Order and payment projection
//!
//! Orders are cast, have their amount backfilled and are filtered; payments
//! are cut down to the join key and status.

use crate::record::{Order, Record};
use crate::types::OptionStringExt;

/// An order that passed the corruption filter
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedOrder {
    /// Trimmed, non-empty order id
    pub order_id: String,
    /// Original opaque customer id
    pub customer_id: Option<String>,
    /// Raw order timestamp
    pub order_date: Option<String>,
    /// At least 1
    pub quantity: i64,
    /// Provided or backfilled amount, two decimals, never negative
    pub order_amount: f64,
}

/// Orders view with the number of rows the filter removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersView {
    pub orders: Vec<ProjectedOrder>,
    pub seen: usize,
    pub dropped: usize,
}

/// Payment reduced to what the join needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentView {
    pub order_id: Option<String>,
    pub status: Option<String>,
}

/// Beyond this magnitude a cent count no longer fits an f64 mantissa
const MAX_EXACT_AMOUNT: f64 = 1e13;

/// Round half away from zero to two decimals
///
/// Rounds the shortest decimal form of the value, not its binary expansion,
/// so `1.005` becomes `1.01` and `2.675` becomes `2.68`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= MAX_EXACT_AMOUNT {
        return (value * 100.0).round() / 100.0;
    }
    round2_decimal(value.abs())
        .map_or(value, |rounded| rounded.copysign(value))
}

/// Half-up rounding of a non-negative value on its `Display` digits
fn round2_decimal(value: f64) -> Option<f64> {
    // f64 Display never switches to exponent notation
    let text = value.to_string();
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if frac.len() <= 2 {
        return Some(value);
    }

    let whole: u64 = whole.parse().ok()?;
    let cents: u64 = frac[..2].parse().ok()?;
    let carry = u64::from(frac.as_bytes()[2] >= b'5');
    Some((whole * 100 + cents + carry) as f64 / 100.0)
}

/// Final order amount
///
/// A missing or non-positive amount is recomputed as
/// `round(price * quantity * (1 - discount_pct / 100), 2)`; anything else is
/// kept and rounded. A missing discount counts as zero.
pub fn backfill_amount(
    order_amount: Option<f64>,
    price: Option<f64>,
    quantity: Option<i64>,
    discount_pct: Option<f64>,
) -> Option<f64> {
    match order_amount {
        Some(amount) if amount > 0.0 => Some(round2(amount)),
        _ => {
            let discount = discount_pct.unwrap_or(0.0);
            let gross = price? * quantity? as f64;
            Some(round2(gross * (1.0 - discount / 100.0)))
        }
    }
}

/// Project one order, or `None` if it is corrupt
///
/// Corrupt means: no order id after trimming, quantity missing or below 1,
/// or a final amount that is missing or negative.
pub fn project_order(order: &Order) -> Option<ProjectedOrder> {
    let order_id = order
        .order_id
        .as_deref()
        .map(|id| id.trim().to_string())
        .none_if_empty()?;

    let quantity = order.quantity.filter(|q| *q >= 1)?;
    let order_amount = backfill_amount(
        order.order_amount,
        order.price,
        Some(quantity),
        order.discount_pct,
    )
    .filter(|amount| *amount >= 0.0)?;
    // -0.0 passes the filter but must not print as "-0.00"
    let order_amount = order_amount + 0.0;

    Some(ProjectedOrder {
        order_id,
        customer_id: order.customer_id.clone(),
        order_date: order.order_date.clone(),
        quantity,
        order_amount,
    })
}

/// Build the orders view from every order record
pub fn project_orders(records: &[Record]) -> OrdersView {
    let mut view = OrdersView::default();

    for order in records.iter().filter_map(Record::as_order) {
        view.seen += 1;
        match project_order(order) {
            Some(projected) => view.orders.push(projected),
            None => view.dropped += 1,
        }
    }

    view
}

/// Build the payments view from every payment record
pub fn project_payments(records: &[Record]) -> Vec<PaymentView> {
    records
        .iter()
        .filter_map(Record::as_payment)
        .map(|payment| PaymentView {
            order_id: payment.order_id.clone(),
            status: payment.status.clone(),
        })
        .collect()
}
