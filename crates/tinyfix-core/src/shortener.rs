use crate::shortcode::ShortCode;
use crate::long_url::LongUrl;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// The operations the shortening engine exposes to the service layer.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for `url`, allocating one on first submission.
    ///
    /// Submitting the same bytes again returns the same code.
    async fn shorten(&self, url: &LongUrl) -> Result<ShortCode>;

    /// Resolves a short code to its long URL.
    /// Returns `None` if the code was never allocated.
    async fn unshorten(&self, code: &ShortCode) -> Result<Option<LongUrl>>;
}
