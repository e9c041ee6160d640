//! Random record construction

use super::types::{GeneratedBatch, GeneratorConfig};
use crate::error::{Error, Result};
use crate::record::{Customer, Order, Payment};
use crate::transform::round2;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

/// Payment methods, sampled uniformly
pub const PAYMENT_TYPES: [&str; 4] = ["card", "upi", "net_banking", "cod"];

/// Payment statuses, sampled uniformly
pub const PAYMENT_STATUSES: [&str; 4] = ["success", "failed", "pending", "cancelled"];

/// Discount percentages, sampled uniformly
pub const DISCOUNTS: [f64; 5] = [0.0, 5.0, 10.0, 15.0, 20.0];

const CURRENCY: &str = "USD";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SECONDS_PER_DAY: i64 = 86_400;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A product drawn for a single order
struct ProductDraw {
    product_id: String,
    name: String,
    category: String,
    brand: String,
    base_price: f64,
}

/// Builds synthetic customers, orders and payments
///
/// All timestamps are derived from the `now` given at construction, so a
/// seeded generator reproduces the same drop byte for byte.
#[derive(Debug, Clone)]
pub struct RecordGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl RecordGenerator {
    /// Create a generator, seeded from the OS unless a seed is given
    pub fn new(seed: Option<u64>, now: DateTime<Utc>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, now }
    }

    /// Generate a full drop
    pub fn generate(&mut self, config: &GeneratorConfig) -> Result<GeneratedBatch> {
        config.validate()?;
        let customers = self.customer_pool(config.customers);
        let (orders, payments) = self.orders_and_payments(&customers, config.orders, config.days)?;
        Ok(GeneratedBatch {
            customers,
            orders,
            payments,
        })
    }

    /// Build `count` customers with fresh uuid ids
    pub fn customer_pool(&mut self, count: usize) -> Vec<Customer> {
        let created_at = self.timestamp(self.now);
        (0..count)
            .map(|_| {
                let name = format!("{}{}", self.letters(UPPER, 1, 1), self.letters(LOWER, 3, 7));
                let email = format!(
                    "{}{}@example.com",
                    name.to_lowercase(),
                    self.rng.random_range(1..=9999)
                );
                Customer {
                    ingest_ts: Some(created_at.clone()),
                    customer_id: Some(self.uuid()),
                    email: Some(email),
                    country: Some(self.letters(UPPER, 2, 2)),
                    city: Some(self.letters(LETTERS, 5, 10)),
                    created_at: Some(created_at.clone()),
                    name: Some(name),
                }
            })
            .collect()
    }

    /// Build `count` orders, each paired with one payment for its net amount
    pub fn orders_and_payments(
        &mut self,
        customers: &[Customer],
        count: usize,
        days: u32,
    ) -> Result<(Vec<Order>, Vec<Payment>)> {
        let ingest_ts = self.timestamp(self.now);
        let mut orders = Vec::with_capacity(count);
        let mut payments = Vec::with_capacity(count);

        for _ in 0..count {
            let customer = customers.choose(&mut self.rng).ok_or_else(|| {
                Error::invalid_value("customers", "no customer to attach the order to")
            })?;
            let product = self.product();
            let quantity: i64 = self.rng.random_range(1..=5);
            let unit_price = round2(product.base_price * self.rng.random_range(0.9..=1.1));
            let discount = DISCOUNTS[self.rng.random_range(0..DISCOUNTS.len())];
            let net = round2(unit_price * quantity as f64 * (1.0 - discount / 100.0));

            let order_id = format!("ORD-{}", self.rng.random_range(100_000..=999_999));
            let order_date = self.order_date(days);

            payments.push(Payment {
                ingest_ts: Some(ingest_ts.clone()),
                order_id: Some(order_id.clone()),
                payment_id: Some(format!("PAY-{}", self.rng.random_range(100_000..=999_999))),
                payment_type: Some(PAYMENT_TYPES[self.rng.random_range(0..PAYMENT_TYPES.len())].to_string()),
                amount: Some(net),
                currency: Some(CURRENCY.to_string()),
                status: Some(PAYMENT_STATUSES[self.rng.random_range(0..PAYMENT_STATUSES.len())].to_string()),
                payment_date: Some(order_date.clone()),
            });
            orders.push(Order {
                ingest_ts: Some(ingest_ts.clone()),
                customer_id: customer.customer_id.clone(),
                order_id: Some(order_id),
                order_date: Some(order_date),
                product_id: Some(product.product_id),
                product: Some(product.name),
                category: Some(product.category),
                brand: Some(product.brand),
                quantity: Some(quantity),
                unit_price: Some(unit_price),
                price: Some(unit_price),
                discount_pct: Some(discount),
                order_amount: Some(net),
                currency: Some(CURRENCY.to_string()),
            });
        }

        Ok((orders, payments))
    }

    fn product(&mut self) -> ProductDraw {
        ProductDraw {
            product_id: format!("P-{}", self.rng.random_range(1000..=9999)),
            name: self.letters(LETTERS, 5, 12),
            category: self.letters(LETTERS, 5, 10),
            brand: self.letters(LETTERS, 3, 8),
            base_price: round2(self.rng.random_range(10.0..=500.0)),
        }
    }

    /// Random instant within the last `days` days plus up to one more day
    fn order_date(&mut self, days: u32) -> String {
        let day = self.rng.random_range(0..=i64::from(days));
        let second = self.rng.random_range(0..SECONDS_PER_DAY);
        let at = self.now - Duration::days(day) - Duration::seconds(second);
        self.timestamp(at)
    }

    fn letters(&mut self, alphabet: &[u8], min: usize, max: usize) -> String {
        let len = self.rng.random_range(min..=max);
        (0..len)
            .map(|_| char::from(alphabet[self.rng.random_range(0..alphabet.len())]))
            .collect()
    }

    fn uuid(&mut self) -> String {
        Builder::from_random_bytes(self.rng.random()).into_uuid().to_string()
    }

    fn timestamp(&self, at: DateTime<Utc>) -> String {
        at.format(TIMESTAMP_FORMAT).to_string()
    }
}
