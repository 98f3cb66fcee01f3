use crate::hash::ContentHash;
use crate::shortcode::ShortCode;
use std::fmt::Display;

/// The two logical key spaces of a mapping record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Content hash of a long URL to the short code allocated for it.
    HashToCode,
    /// Short code to the long URL it stands for.
    CodeToUrl,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::HashToCode => "hash_url/short_url",
            Namespace::CodeToUrl => "short_url/long_url",
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A key in the shared store.
///
/// Keys can only be built from validated payloads (a hex digest or a
/// [`ShortCode`]), neither of which can contain `/`, so the rendered path is
/// unambiguous.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey {
    namespace: Namespace,
    id: String,
}

impl StoreKey {
    pub fn hash_to_code(hash: &ContentHash) -> Self {
        Self {
            namespace: Namespace::HashToCode,
            id: hash.to_hex(),
        }
    }

    pub fn code_to_url(code: &ShortCode) -> Self {
        Self {
            namespace: Namespace::CodeToUrl,
            id: code.as_str().to_owned(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Renders the key as `{namespace prefix}/{id}`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.namespace.prefix(), self.id)
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace.prefix(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_key_path() {
        let hash = ContentHash::from_bytes(b"abc");
        let key = StoreKey::hash_to_code(&hash);
        assert_eq!(key.namespace(), Namespace::HashToCode);
        assert_eq!(
            key.path(),
            "hash_url/short_url/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn code_key_path() {
        let key = StoreKey::code_to_url(&ShortCode::new_unchecked("Ab-_"));
        assert_eq!(key.namespace(), Namespace::CodeToUrl);
        assert_eq!(key.id(), "Ab-_");
        assert_eq!(key.to_string(), "short_url/long_url/Ab-_");
    }

    #[test]
    fn namespaces_do_not_collide() {
        let code = StoreKey::code_to_url(&ShortCode::new_unchecked("abcd"));
        let hash = StoreKey::hash_to_code(&ContentHash::from_bytes(b"abcd"));
        assert_ne!(code.namespace(), hash.namespace());
        assert_ne!(code.path(), hash.path());
    }
}
