pub use tinyfix_core::ShortenerError;

pub type Result<T> = std::result::Result<T, ShortenerError>;

pub(crate) fn corrupt(key: &tinyfix_core::StoreKey, reason: impl ToString) -> ShortenerError {
    ShortenerError::CorruptMapping {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
