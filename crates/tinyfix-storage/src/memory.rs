use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tinyfix_core::store::Result;
use tinyfix_core::{KvStore, StoreKey, Txn, TxnOp, TxnOpResponse, TxnResponse, Versioned};

type Entries = HashMap<StoreKey, Versioned>;

/// In-memory implementation of [`KvStore`].
///
/// All entries sit behind one `RwLock`. Reads share the lock and a
/// transaction holds the write lock from its first compare to its last write,
/// so every operation is linearizable and a transaction's writes become
/// visible together.
///
/// Cloning is cheap and yields a handle to the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn write(entries: &mut Entries, key: &StoreKey, value: String) -> u64 {
        let entry = entries.entry(key.clone()).or_insert(Versioned {
            value: String::new(),
            version: 0,
        });
        entry.value = value;
        entry.version += 1;
        entry.version
    }

    fn apply(entries: &mut Entries, op: &TxnOp) -> TxnOpResponse {
        match op {
            TxnOp::Put { key, value } => TxnOpResponse::Put {
                version: Self::write(entries, key, value.clone()),
            },
            TxnOp::Get { key } => TxnOpResponse::Get(entries.get(key).cloned()),
        }
    }
}

#[async_trait]
impl KvStore for InMemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Versioned>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &StoreKey, value: String) -> Result<u64> {
        Ok(Self::write(&mut self.entries.write(), key, value))
    }

    async fn txn(&self, txn: Txn) -> Result<TxnResponse> {
        let mut entries = self.entries.write();

        let succeeded = txn
            .compares()
            .iter()
            .all(|compare| compare.evaluate(entries.get(compare.key())));

        let branch = if succeeded {
            txn.success()
        } else {
            txn.failure()
        };

        let responses = branch
            .iter()
            .map(|op| Self::apply(&mut entries, op))
            .collect();

        Ok(TxnResponse {
            succeeded,
            responses,
        })
    }
}
