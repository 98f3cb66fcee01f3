//! Core types and traits for the tinyfix URL shortener.
//!
//! This crate provides the domain types shared by every tinyfix crate, the
//! transactional key-value store contract the shortening engine runs on, and
//! the [`Shortener`] contract the engine exposes to the HTTP layer.

pub mod error;
pub mod hash;
pub mod key;
pub mod long_url;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use error::{CoreError, ShortenerError, StorageError};
pub use hash::ContentHash;
pub use key::{Namespace, StoreKey};
pub use long_url::{LongUrl, MAX_URL_LENGTH};
pub use shortcode::{ShortCode, ALPHABET};
pub use shortener::Shortener;
pub use store::{Compare, CompareOp, KvStore, Txn, TxnOp, TxnOpResponse, TxnResponse, Versioned};
