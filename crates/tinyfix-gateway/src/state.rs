use std::sync::Arc;

use tinyfix_core::{ShortCode, Shortener};

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    fqdn: String,
    base_url: String,
}

impl AppState {
    /// `fqdn` is both the host short links are served from and the only
    /// `Host` header the redirect route accepts.
    pub fn new(shortener: Arc<dyn Shortener>, scheme: &str, fqdn: impl Into<String>) -> Self {
        let fqdn = fqdn.into();
        Self {
            base_url: format!("{scheme}://{fqdn}"),
            shortener,
            fqdn,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn short_link(&self, code: &ShortCode) -> String {
        code.to_url(&self.base_url)
    }
}
