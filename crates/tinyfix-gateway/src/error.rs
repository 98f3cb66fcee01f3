use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tinyfix_core::ShortenerError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error: {0}")]
    InvalidInput(String),
    #[error("Unknown HOST header")]
    UnknownHost,
    #[error("Unknown URL format")]
    UnknownFormat,
    #[error("Sorry, unknown URL")]
    NotFound,
    #[error("Service temporarily unavailable")]
    Unavailable(#[source] ShortenerError),
    #[error("Internal server error")]
    Internal(#[source] ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(e: ShortenerError) -> Self {
        if e.is_unavailable() {
            Self::Unavailable(e)
        } else {
            Self::Internal(e)
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UnknownHost | Self::UnknownFormat => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Unavailable(e) | Self::Internal(e) = &self {
            error!(error = %e, "request failed");
        }
        (self.status(), self.to_string()).into_response()
    }
}
