use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Longest URL accepted for shortening, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// A long URL submitted for shortening.
///
/// The string is kept exactly as submitted: its bytes are what the
/// deduplication hash is computed over, so no normalization happens here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LongUrl(String);

impl LongUrl {
    /// Creates a new `LongUrl` after validating the input.
    ///
    /// The input must be non-empty, at most [`MAX_URL_LENGTH`] characters and
    /// parse as an absolute URL with a host.
    pub fn new(url: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let url = url.into();
        Self::validate(&url)?;
        Ok(Self(url))
    }

    /// Creates a `LongUrl` without validation.
    ///
    /// Use this for values read back from the store, which were validated
    /// before they were written.
    pub fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the exact bytes of the URL.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn validate(url: &str) -> std::result::Result<(), CoreError> {
        if url.is_empty() {
            return Err(CoreError::InvalidUrl("empty input".to_string()));
        }

        let length = url.chars().count();
        if length > MAX_URL_LENGTH {
            return Err(CoreError::InvalidUrl(format!(
                "max url's length is {}, got {}",
                MAX_URL_LENGTH, length
            )));
        }

        let parsed = url::Url::parse(url)
            .map_err(|e| CoreError::InvalidUrl(format!("malformed url '{}': {}", url, e)))?;

        match parsed.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(CoreError::InvalidUrl(format!(
                "url must have a host: '{}'",
                url
            ))),
        }
    }
}

impl Display for LongUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LongUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for LongUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LongUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LongUrl::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_urls() {
        assert!(LongUrl::new("https://example.com").is_ok());
        assert!(LongUrl::new("http://example.com/a/b?c=d#e").is_ok());
        assert!(LongUrl::new("ftp://files.example.org/pub").is_ok());
    }

    #[test]
    fn rejects_empty() {
        let err = LongUrl::new("").unwrap_err();
        assert_eq!(err, CoreError::InvalidUrl("empty input".to_string()));
    }

    #[test]
    fn rejects_oversized() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        let err = LongUrl::new(url).unwrap_err();
        assert!(err.to_string().contains("max url's length is 2048"));
    }

    #[test]
    fn accepts_exactly_max_length() {
        let prefix = "https://example.com/";
        let url = format!("{}{}", prefix, "a".repeat(MAX_URL_LENGTH - prefix.len()));
        assert_eq!(url.len(), MAX_URL_LENGTH);
        assert!(LongUrl::new(url).is_ok());
    }

    #[test]
    fn rejects_malformed() {
        assert!(LongUrl::new("not-a-valid-url").is_err());
        assert!(LongUrl::new("example.com").is_err());
        assert!(LongUrl::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn keeps_original_bytes() {
        let raw = "HTTPS://Example.com/Path";
        let url = LongUrl::new(raw).unwrap();
        assert_eq!(url.as_str(), raw);
        assert_eq!(url.as_bytes(), raw.as_bytes());
    }
}
