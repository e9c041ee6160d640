//! Left-outer join of payments onto orders

use super::project::{PaymentView, ProjectedOrder};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Status used when an order has no payment or the payment has no status
pub const UNKNOWN_STATUS: &str = "unknown";

/// Payment status lookup keyed by order id
///
/// The first payment seen for an order wins; later ones are counted as
/// duplicates and ignored, so every order yields exactly one output row.
#[derive(Debug, Clone, Default)]
pub struct PaymentIndex {
    by_order: HashMap<String, Option<String>>,
    duplicates: usize,
}

impl PaymentIndex {
    /// Index a payments view
    pub fn build(payments: &[PaymentView]) -> Self {
        let mut index = Self::default();

        for payment in payments {
            let Some(order_id) = payment.order_id.as_ref() else {
                continue;
            };
            match index.by_order.entry(order_id.clone()) {
                Entry::Occupied(_) => index.duplicates += 1,
                Entry::Vacant(slot) => {
                    slot.insert(payment.status.clone());
                }
            }
        }

        index
    }

    /// Status of the payment for an order
    ///
    /// Outer `None`: no payment. Inner `None`: payment without a status.
    pub fn lookup(&self, order_id: &str) -> Option<Option<&str>> {
        self.by_order.get(order_id).map(Option::as_deref)
    }

    /// Payments ignored because an earlier one had the same order id
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.by_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_order.is_empty()
    }
}

/// An order with its resolved payment status
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedOrder {
    pub order: ProjectedOrder,
    /// Lower-cased status or `unknown`
    pub payment_status: String,
    /// Whether a payment row existed for the order
    pub matched: bool,
}

/// Lower-case a payment status, defaulting to `unknown`
pub fn normalize_status(status: Option<&str>) -> String {
    status.unwrap_or(UNKNOWN_STATUS).to_lowercase()
}

/// Left-outer join orders to payments on order id
pub fn join_payments(orders: Vec<ProjectedOrder>, index: &PaymentIndex) -> Vec<JoinedOrder> {
    orders
        .into_iter()
        .map(|order| {
            let payment = index.lookup(&order.order_id);
            JoinedOrder {
                payment_status: normalize_status(payment.flatten()),
                matched: payment.is_some(),
                order,
            }
        })
        .collect()
}
