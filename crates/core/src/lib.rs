//! Core for the giftthanks service.
//!
//! - [`record`]: the gift-thank record, its JSON contract and byte encoding.
//! - [`store`]: the key-value capability set the repository needs, plus an
//!   in-memory implementation.
//! - [`storage`]: the [`storage::RecordRepository`] and its error taxonomy.

pub mod record;
pub mod serde;
pub mod storage;
pub mod store;
