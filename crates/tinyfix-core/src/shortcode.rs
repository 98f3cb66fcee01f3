use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The 64 symbols a short code may be built from.
///
/// The order is part of the contract: generators index into it and the
/// sequential generator relies on `ALPHABET[0]` as its padding symbol.
pub const ALPHABET: &[u8; 64] =
    b"-_abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shortest short code the system hands out.
pub const MIN_LENGTH: usize = 4;
/// Longest short code the system hands out.
pub const MAX_LENGTH: usize = 8;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 4-8 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are 4-8 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators that are guaranteed to produce valid output).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `symbol` belongs to [`ALPHABET`].
    pub fn is_symbol(symbol: char) -> bool {
        symbol.is_ascii_alphanumeric() || symbol == '-' || symbol == '_'
    }

    fn validate(code: &str) -> std::result::Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(Self::is_symbol) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ShortCode::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("abcd").is_ok());
        assert!(ShortCode::new("Ab-1_xyz").is_ok());
        assert!(ShortCode::new("----").is_ok());
        assert!(ShortCode::new("a".repeat(8)).is_ok());
    }

    #[test]
    fn too_short() {
        assert!(ShortCode::new("abc").is_err());
        assert!(ShortCode::new("").is_err());
    }

    #[test]
    fn too_long() {
        assert!(ShortCode::new("a".repeat(9)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("ab cd").is_err());
        assert!(ShortCode::new("ab/cd").is_err());
        assert!(ShortCode::new("ab!cd").is_err());
        assert!(ShortCode::new("abcé").is_err());
    }

    #[test]
    fn alphabet_has_64_distinct_valid_symbols() {
        let mut symbols: Vec<u8> = ALPHABET.to_vec();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 64);
        assert!(ALPHABET.iter().all(|&b| ShortCode::is_symbol(b as char)));
    }

    #[test]
    fn to_url_joins_with_single_slash() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(code.to_url("http://localhost"), "http://localhost/abc123");
        assert_eq!(code.to_url("http://localhost/"), "http://localhost/abc123");
    }

    #[test]
    fn deserialize_validates() {
        let code: ShortCode = serde_json::from_str("\"Zx_9\"").unwrap();
        assert_eq!(code.as_str(), "Zx_9");

        let err = serde_json::from_str::<ShortCode>("\"no\"").unwrap_err();
        assert!(err.to_string().contains("invalid short code"));
    }

    #[test]
    fn serialize_as_plain_string() {
        let code = ShortCode::new("abcd").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abcd\"");
    }
}
