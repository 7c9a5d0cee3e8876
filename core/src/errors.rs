use thiserror::Error;

/// Errors raised while talking to the guidance endpoint or loading configuration
#[derive(Error, Debug)]
pub enum AshramError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },
}

/// Result type for guidance operations
pub type AshramResult<T> = Result<T, AshramError>;
