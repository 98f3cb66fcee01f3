//! Short code allocation engine.
//!
//! This crate turns long URLs into short codes on top of any transactional
//! [`KvStore`](tinyfix_core::KvStore): content-hash deduplication, candidate
//! generation and an atomic two-key commit, plus the read path that resolves
//! codes back to URLs. Core types are re-exported from `tinyfix_core`.

pub mod allocator;
pub mod dedup;
pub mod error;
pub mod resolver;
pub mod service;

pub use allocator::{Allocator, AllocatorSettings};
pub use dedup::DedupIndex;
pub use error::{Result, ShortenerError};
pub use resolver::Resolver;
pub use service::ShortenerService;
pub use tinyfix_core::Shortener;
