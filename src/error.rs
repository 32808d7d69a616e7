use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Credential error: {0}")]
    CredentialError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Request cancelled: {0}")]
    Context(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
