use std::sync::Arc;

use tinyfix_core::{
    Compare, ContentHash, KvStore, LongUrl, ShortCode, ShortenerError, StoreKey, Txn, TxnOp,
    TxnOpResponse, TxnResponse,
};
use tinyfix_generator::Generator;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

use crate::dedup::DedupIndex;
use crate::error::Result;

/// Tuning knobs for an [`Allocator`].
#[derive(Debug, Clone, Copy, Default, TypedBuilder)]
pub struct AllocatorSettings {
    /// Upper bound on committed candidates per call.
    ///
    /// `None` retries until a commit succeeds or the URL turns out to be
    /// shortened already. With a 64-symbol alphabet conflicts are rare enough
    /// that the unbounded loop terminates in practice.
    ///
    /// `Some(0)` makes the allocator lookup-only: URLs that already own a
    /// code resolve, every other call fails with `RetriesExhausted`.
    #[builder(default, setter(strip_option))]
    pub max_attempts: Option<u32>,
}

/// Where an allocation currently stands.
#[derive(Debug)]
enum Step {
    ComputeHash,
    CheckExisting { hash: ContentHash },
    ProposeCandidate { hash: ContentHash },
    Commit { hash: ContentHash, code: ShortCode },
    Done(ShortCode),
}

/// Allocates short codes for long URLs.
///
/// An allocation writes two keys, `hash -> code` and `code -> url`, in one
/// store transaction guarded by both keys being absent. Concurrent allocators
/// sharing a store therefore never hand out one code for two URLs, and never
/// give one URL two codes: whoever loses the commit goes back and reads the
/// winner's `hash -> code` entry, or proposes a fresh candidate if the loss
/// was a plain code collision.
///
/// The allocator keeps no local state about codes. Everything it knows comes
/// from the store.
pub struct Allocator<S, G> {
    store: Arc<S>,
    generator: G,
    dedup: DedupIndex<S>,
    settings: AllocatorSettings,
}

impl<S: KvStore, G: Generator> Allocator<S, G> {
    pub fn new(store: Arc<S>, generator: G, settings: AllocatorSettings) -> Self {
        Self {
            dedup: DedupIndex::new(Arc::clone(&store)),
            store,
            generator,
            settings,
        }
    }

    /// Returns the short code for `url`, allocating one if needed.
    pub async fn allocate(&self, url: &LongUrl) -> Result<ShortCode> {
        let mut attempts = 0u32;
        let mut step = Step::ComputeHash;

        loop {
            step = match step {
                Step::ComputeHash => Step::CheckExisting {
                    hash: ContentHash::of(url),
                },
                Step::CheckExisting { hash } => match self.dedup.lookup(&hash).await? {
                    Some(code) => {
                        debug!(hash = %hash, code = %code, "url already shortened");
                        Step::Done(code)
                    }
                    None => Step::ProposeCandidate { hash },
                },
                Step::ProposeCandidate { hash } => {
                    if self.settings.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(ShortenerError::RetriesExhausted { attempts });
                    }
                    attempts += 1;
                    Step::Commit {
                        hash,
                        code: self.generator.generate().into(),
                    }
                }
                Step::Commit { hash, code } => self.commit(url, hash, code, attempts).await?,
                Step::Done(code) => return Ok(code),
            };
        }
    }

    async fn commit(
        &self,
        url: &LongUrl,
        hash: ContentHash,
        code: ShortCode,
        attempt: u32,
    ) -> Result<Step> {
        let hash_key = StoreKey::hash_to_code(&hash);
        let code_key = StoreKey::code_to_url(&code);

        let txn = Txn::new()
            .when([
                Compare::absent(hash_key.clone()),
                Compare::absent(code_key.clone()),
            ])
            .and_then([
                TxnOp::put(hash_key.clone(), code.as_str()),
                TxnOp::put(code_key.clone(), url.as_str()),
            ])
            .or_else([TxnOp::get(hash_key), TxnOp::get(code_key)]);

        let response = self.store.txn(txn).await?;
        if response.succeeded {
            info!(hash = %hash, code = %code, attempt, "allocated short code");
            return Ok(Step::Done(code));
        }

        warn!(
            hash = %hash,
            candidate = %code,
            attempt,
            hash_owner = ?occupant(&response, 0),
            code_owner = ?occupant(&response, 1),
            "short code commit conflicted, retrying"
        );
        Ok(Step::CheckExisting { hash })
    }
}

/// Current value of the key read by the `index`th failure-branch op.
fn occupant(response: &TxnResponse, index: usize) -> Option<&str> {
    match response.responses.get(index) {
        Some(TxnOpResponse::Get(Some(entry))) => Some(entry.value.as_str()),
        _ => None,
    }
}
