use serde::{Deserialize, Serialize};
use tinyfix_core::{LongUrl, MAX_URL_LENGTH};

use crate::error::AppError;

/// Body of the start page form.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

impl ShortenForm {
    /// Checks the submitted URL, reporting the first failed rule.
    pub fn validate(self) -> Result<LongUrl, AppError> {
        if self.url.is_empty() {
            return Err(AppError::InvalidInput("Empty input".into()));
        }
        if self.url.chars().count() > MAX_URL_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "Max url's length is {MAX_URL_LENGTH}"
            )));
        }
        LongUrl::new(self.url).map_err(|_| AppError::InvalidInput("Invalid URL".into()))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
