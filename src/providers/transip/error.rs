use reqwest::StatusCode;
use thiserror::Error;

use crate::error::Error;

#[derive(Error, Debug)]
pub enum TransipProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),
}

impl TransipProviderError {
    /// Classifies a non-success API response by its status code.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                TransipProviderError::Credential(message)
            }
            StatusCode::NOT_FOUND => TransipProviderError::NotFound(message),
            StatusCode::BAD_REQUEST
            | StatusCode::NOT_ACCEPTABLE
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY => TransipProviderError::InvalidInput(message),
            StatusCode::TOO_MANY_REQUESTS => TransipProviderError::RateLimited(message),
            _ => TransipProviderError::Provider(format!("{status}: {message}")),
        }
    }
}

pub fn map_error(e: TransipProviderError) -> Error {
    use TransipProviderError::*;
    match e {
        Http(err) if err.is_timeout() => Error::Context(err.to_string()),
        Http(err) => Error::ProviderError(err.to_string()),
        Json(err) => Error::ProviderError(err.to_string()),
        Credential(msg) => Error::CredentialError(msg),
        NotFound(msg) => Error::NotFound(msg),
        InvalidInput(msg) => Error::InvalidInput(msg),
        Provider(msg) => Error::ProviderError(msg),
        RateLimited(msg) => Error::ProviderError(format!("Rate limited: {msg}")),
    }
}
