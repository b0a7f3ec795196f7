//! Redis store backend.
//!
//! One `ConnectionManager` per process, cloned per call. The manager
//! reconnects on its own after a dropped connection.

mod error;
mod store;

pub use store::RedisStore;
