//! The transactional key-value store contract the shortener is built on.
//!
//! The model follows etcd: every key carries a version that counts the writes
//! made to it since it was created, an absent key has version `0`, and a
//! transaction evaluates a list of compares atomically before running exactly
//! one of two operation lists.

use crate::error::StorageError;
use crate::key::StoreKey;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored value together with its version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned {
    pub value: String,
    /// Number of writes to the key since it was created. Always `>= 1`.
    pub version: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Greater,
    Less,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::Less => ordering == Ordering::Less,
        }
    }

    /// Wire name used by script-based backends.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Equal => "eq",
            CompareOp::NotEqual => "ne",
            CompareOp::Greater => "gt",
            CompareOp::Less => "lt",
        }
    }
}

/// A predicate on the current state of one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compare {
    /// Compares the key's version (`0` when absent) against `version`.
    Version {
        key: StoreKey,
        op: CompareOp,
        version: u64,
    },
    /// Compares the key's value against `value`. Never holds for an absent key.
    Value {
        key: StoreKey,
        op: CompareOp,
        value: String,
    },
}

impl Compare {
    pub fn version(key: StoreKey, op: CompareOp, version: u64) -> Self {
        Self::Version { key, op, version }
    }

    pub fn value(key: StoreKey, op: CompareOp, value: impl Into<String>) -> Self {
        Self::Value {
            key,
            op,
            value: value.into(),
        }
    }

    /// Holds while `key` has never been written.
    pub fn absent(key: StoreKey) -> Self {
        Self::version(key, CompareOp::Equal, 0)
    }

    pub fn key(&self) -> &StoreKey {
        match self {
            Compare::Version { key, .. } | Compare::Value { key, .. } => key,
        }
    }

    /// Evaluates the predicate against the key's current entry.
    pub fn evaluate(&self, current: Option<&Versioned>) -> bool {
        match self {
            Compare::Version { op, version, .. } => {
                let actual = current.map_or(0, |entry| entry.version);
                op.holds(actual.cmp(version))
            }
            Compare::Value { op, value, .. } => {
                current.is_some_and(|entry| op.holds(entry.value.as_str().cmp(value.as_str())))
            }
        }
    }
}

/// An operation run by a transaction branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxnOp {
    Put { key: StoreKey, value: String },
    Get { key: StoreKey },
}

impl TxnOp {
    pub fn put(key: StoreKey, value: impl Into<String>) -> Self {
        Self::Put {
            key,
            value: value.into(),
        }
    }

    pub fn get(key: StoreKey) -> Self {
        Self::Get { key }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxnOpResponse {
    /// The key's version after the write.
    Put { version: u64 },
    Get(Option<Versioned>),
}

impl TxnOpResponse {
    /// Returns the entry read by a `Get`, or `None` for puts and misses.
    pub fn as_get(&self) -> Option<&Versioned> {
        match self {
            TxnOpResponse::Get(entry) => entry.as_ref(),
            TxnOpResponse::Put { .. } => None,
        }
    }
}

/// A compare-and-swap transaction.
///
/// ```
/// use tinyfix_core::{Compare, ContentHash, ShortCode, StoreKey, Txn, TxnOp};
///
/// let hash_key = StoreKey::hash_to_code(&ContentHash::from_bytes(b"https://example.com"));
/// let code_key = StoreKey::code_to_url(&ShortCode::new_unchecked("abcd"));
///
/// let txn = Txn::new()
///     .when([Compare::absent(hash_key.clone()), Compare::absent(code_key.clone())])
///     .and_then([
///         TxnOp::put(hash_key.clone(), "abcd"),
///         TxnOp::put(code_key.clone(), "https://example.com"),
///     ])
///     .or_else([TxnOp::get(hash_key), TxnOp::get(code_key)]);
///
/// assert_eq!(txn.compares().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Txn {
    compares: Vec<Compare>,
    success: Vec<TxnOp>,
    failure: Vec<TxnOp>,
}

impl Txn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds predicates that must all hold for the success branch to run.
    pub fn when(mut self, compares: impl IntoIterator<Item = Compare>) -> Self {
        self.compares.extend(compares);
        self
    }

    /// Adds operations run when every compare holds.
    pub fn and_then(mut self, ops: impl IntoIterator<Item = TxnOp>) -> Self {
        self.success.extend(ops);
        self
    }

    /// Adds operations run when any compare fails.
    pub fn or_else(mut self, ops: impl IntoIterator<Item = TxnOp>) -> Self {
        self.failure.extend(ops);
        self
    }

    pub fn compares(&self) -> &[Compare] {
        &self.compares
    }

    pub fn success(&self) -> &[TxnOp] {
        &self.success
    }

    pub fn failure(&self) -> &[TxnOp] {
        &self.failure
    }
}

/// Outcome of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxnResponse {
    /// `true` when every compare held and the success branch ran.
    pub succeeded: bool,
    /// Responses of the branch that ran, in operation order.
    pub responses: Vec<TxnOpResponse>,
}

/// A linearizable key-value store with multi-key compare-and-swap.
///
/// Implementations must apply [`KvStore::txn`] as one indivisible unit: no
/// reader may observe some of a branch's writes without the others.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Reads a key. Returns `None` if the key was never written.
    async fn get(&self, key: &StoreKey) -> Result<Option<Versioned>>;

    /// Writes a key unconditionally and returns its new version.
    async fn put(&self, key: &StoreKey, value: String) -> Result<u64>;

    /// Evaluates the compares and runs the matching branch atomically.
    async fn txn(&self, txn: Txn) -> Result<TxnResponse>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &StoreKey) -> Result<Option<Versioned>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &StoreKey, value: String) -> Result<u64> {
        (**self).put(key, value).await
    }

    async fn txn(&self, txn: Txn) -> Result<TxnResponse> {
        (**self).txn(txn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::ShortCode;

    fn key(code: &str) -> StoreKey {
        StoreKey::code_to_url(&ShortCode::new_unchecked(code))
    }

    fn entry(value: &str, version: u64) -> Versioned {
        Versioned {
            value: value.to_string(),
            version,
        }
    }

    #[test]
    fn absent_holds_only_for_missing_keys() {
        let compare = Compare::absent(key("abcd"));
        assert!(compare.evaluate(None));
        assert!(!compare.evaluate(Some(&entry("x", 1))));
    }

    #[test]
    fn version_ordering() {
        let greater = Compare::version(key("abcd"), CompareOp::Greater, 1);
        assert!(!greater.evaluate(None));
        assert!(!greater.evaluate(Some(&entry("x", 1))));
        assert!(greater.evaluate(Some(&entry("x", 2))));

        let less = Compare::version(key("abcd"), CompareOp::Less, 1);
        assert!(less.evaluate(None));

        let not_equal = Compare::version(key("abcd"), CompareOp::NotEqual, 0);
        assert!(not_equal.evaluate(Some(&entry("x", 3))));
    }

    #[test]
    fn value_compare_never_holds_for_absent_key() {
        let compare = Compare::value(key("abcd"), CompareOp::NotEqual, "x");
        assert!(!compare.evaluate(None));
        assert!(compare.evaluate(Some(&entry("y", 1))));
        assert!(!compare.evaluate(Some(&entry("x", 1))));
    }

    #[test]
    fn txn_builder_keeps_order() {
        let txn = Txn::new()
            .when([Compare::absent(key("aaaa"))])
            .and_then([TxnOp::put(key("aaaa"), "1"), TxnOp::put(key("bbbb"), "2")])
            .or_else([TxnOp::get(key("aaaa"))]);

        assert_eq!(txn.compares().len(), 1);
        assert_eq!(txn.success()[1], TxnOp::put(key("bbbb"), "2"));
        assert_eq!(txn.failure(), &[TxnOp::get(key("aaaa"))]);
    }

    #[test]
    fn op_response_as_get() {
        assert_eq!(
            TxnOpResponse::Get(Some(entry("x", 1))).as_get(),
            Some(&entry("x", 1))
        );
        assert_eq!(TxnOpResponse::Put { version: 1 }.as_get(), None);
    }
}
