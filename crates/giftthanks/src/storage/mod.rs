//! Store backend implementations.
//!
//! The `KeyValueStore` trait and the in-memory store live in
//! `giftthanks_core::store`. This module adds the network-backed client.
//!
//! # Feature Flags
//!
//! - `redis` (default): Redis store using the `redis` crate
//!
//! Build without Redis (memory backend only):
//! ```bash
//! cargo build -p giftthanks --no-default-features
//! ```

#[cfg(feature = "redis")]
pub mod redis_impl;

#[cfg(feature = "redis")]
pub use redis_impl::RedisStore;
