use std::sync::Arc;

use tinyfix_core::{KvStore, LongUrl, ShortCode, StoreKey};
use tracing::{debug, trace};

use crate::error::{corrupt, Result};

/// Resolves short codes to the long URLs they were allocated for.
///
/// One read of the `code -> url` key space per call. A code is visible here
/// only after its allocation committed, and then it never changes.
#[derive(Debug)]
pub struct Resolver<S> {
    store: Arc<S>,
}

impl<S> Clone for Resolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KvStore> Resolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the long URL for `code`.
    ///
    /// `Ok(None)` means the code was never allocated.
    pub async fn resolve(&self, code: &ShortCode) -> Result<Option<LongUrl>> {
        trace!(code = %code, "resolving short code");

        let key = StoreKey::code_to_url(code);
        match self.store.get(&key).await? {
            Some(entry) => {
                let url = LongUrl::new(entry.value).map_err(|e| corrupt(&key, e))?;
                debug!(code = %code, url = %url, "resolved short code");
                Ok(Some(url))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}
