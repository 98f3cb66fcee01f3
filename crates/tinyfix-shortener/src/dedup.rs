use std::sync::Arc;

use tinyfix_core::{ContentHash, KvStore, ShortCode, StoreKey};
use tracing::trace;

use crate::error::{corrupt, Result};

/// Read side of the `hash -> code` key space.
///
/// Answers whether a URL with a given content hash already owns a short code.
#[derive(Debug)]
pub struct DedupIndex<S> {
    store: Arc<S>,
}

impl<S> Clone for DedupIndex<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KvStore> DedupIndex<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the code already allocated for `hash`, if any.
    pub async fn lookup(&self, hash: &ContentHash) -> Result<Option<ShortCode>> {
        let key = StoreKey::hash_to_code(hash);

        match self.store.get(&key).await? {
            Some(entry) => {
                let code = ShortCode::new(entry.value).map_err(|e| corrupt(&key, e))?;
                trace!(hash = %hash, code = %code, "found existing short code");
                Ok(Some(code))
            }
            None => Ok(None),
        }
    }
}
