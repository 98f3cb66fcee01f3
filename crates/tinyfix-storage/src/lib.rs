//! [`KvStore`](tinyfix_core::KvStore) backends.
//!
//! - [`InMemoryStore`]: a process-local store for tests and single-node use.
//! - [`RedisStore`]: a shared store where every transaction runs as one Lua
//!   script, which Redis executes atomically.

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryStore;
pub use self::redis::RedisStore;
pub use tinyfix_core::{KvStore, StorageError};
