//! Stable hashing for derived identifiers
//!
//! Every derived value in the output hangs off one hash: XXH64 over the UTF-8
//! bytes of the key with seed 42, read as a signed 64-bit integer. Changing
//! the function or the seed changes every short id and product label.

use xxhash_rust::xxh64::xxh64;

/// Seed for all stable hashes
pub const HASH_SEED: u64 = 42;

/// Literal tag in front of every short customer id
pub const CUSTOMER_ID_PREFIX: &str = "CUST-";

/// Number of distinct short customer ids
pub const CUSTOMER_ID_SPACE: u64 = 1_000_000;

/// Labels assigned to orders, indexed by `stable_bucket(order_id, 12)`
pub const PRODUCT_CATALOG: [&str; 12] = [
    "iPhone 14",
    "Galaxy S23",
    "Pixel 7 Pro",
    "MacBook Pro",
    "ThinkPad X1 Carbon",
    "AirPods Pro",
    "Sony WH-1000XM5",
    "Canon EOS R5",
    "Nikon Z6 II",
    "Kindle Paperwhite",
    "Echo Dot",
    "Apple Watch Series 8",
];

/// Signed 64-bit hash of a key
pub fn stable_hash(key: &str) -> i64 {
    xxh64(key.as_bytes(), HASH_SEED) as i64
}

/// Map a key into `0..buckets` using the absolute value of its hash
pub fn stable_bucket(key: &str, buckets: u64) -> u64 {
    debug_assert!(buckets > 0);
    stable_hash(key).unsigned_abs() % buckets
}

/// Compact customer id, `CUST-` followed by six digits
///
/// Only called for present ids. A missing customer id stays null in the
/// output; engines whose xxhash64 maps null to the bare seed would emit
/// `CUST-000042` there instead.
pub fn short_customer_id(customer_id: &str) -> String {
    format!(
        "{CUSTOMER_ID_PREFIX}{:06}",
        stable_bucket(customer_id, CUSTOMER_ID_SPACE)
    )
}

/// Catalog label for an order
pub fn assign_product(order_id: &str) -> &'static str {
    PRODUCT_CATALOG[stable_bucket(order_id, PRODUCT_CATALOG.len() as u64) as usize]
}
