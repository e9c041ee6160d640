//! Object storage module
//!
//! Thin layer over `object_store` that adds the retry policy, credential
//! error classification and the newest-object lookup used to pick a raw drop.
//!
//! # Overview
//!
//! - [`StoreLocation`] - parse `s3://`, `gs://`, `az://` or local URLs
//! - [`Storage`] - list/get/put/copy/delete with retries
//! - [`RetryPolicy`] - backoff schedule shared by all storage calls
//! - [`select_newest`] - pick the most recent object with a given suffix

mod location;
mod retry;
mod selector;
mod storage;

pub use location::StoreLocation;
pub use retry::RetryPolicy;
pub use selector::{find_newest, select_newest};
pub use storage::Storage;
