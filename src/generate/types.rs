//! Generator types

use crate::error::{Error, Result};
use crate::record::{Customer, Order, Payment, Record};

/// Sizes and seed for one generated drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Customers in the pool
    pub customers: usize,
    /// Orders, each with exactly one payment
    pub orders: usize,
    /// Order dates fall within this many days before now
    pub days: u32,
    /// Fixed RNG seed for reproducible drops
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            customers: 200,
            orders: 1000,
            days: 30,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the customer pool size
    #[must_use]
    pub fn with_customers(mut self, customers: usize) -> Self {
        self.customers = customers;
        self
    }

    /// Set the number of orders
    #[must_use]
    pub fn with_orders(mut self, orders: usize) -> Self {
        self.orders = orders;
        self
    }

    /// Set the order date window
    #[must_use]
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Use a fixed seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Orders need at least one customer to belong to
    pub fn validate(&self) -> Result<()> {
        if self.orders > 0 && self.customers == 0 {
            return Err(Error::invalid_value(
                "customers",
                "must be at least 1 when orders are generated",
            ));
        }
        Ok(())
    }
}

/// Records of one generated drop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedBatch {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
}

impl GeneratedBatch {
    /// Total number of records
    pub fn len(&self) -> usize {
        self.customers.len() + self.orders.len() + self.payments.len()
    }

    /// Check if nothing was generated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Customers, then orders, then payments, as one record list
    pub fn into_records(self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.len());
        records.extend(self.customers.into_iter().map(Record::Customer));
        records.extend(self.orders.into_iter().map(Record::Order));
        records.extend(self.payments.into_iter().map(Record::Payment));
        records
    }
}

/// Where a generated drop was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Key of the uploaded JSONL object
    pub key: String,
    pub customers: usize,
    pub orders: usize,
    pub payments: usize,
}

impl GenerateReport {
    /// Total number of records uploaded
    pub fn records(&self) -> usize {
        self.customers + self.orders + self.payments
    }
}
