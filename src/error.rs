use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Backend error: {0}")]
    #[diagnostic(code(reservas::backend))]
    Backend(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(reservas::http))]
    Http(#[from] reqwest::Error),

    #[error("Environment error: {0}")]
    #[diagnostic(code(reservas::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(reservas::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(reservas::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(reservas::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(reservas::serialization))]
    Serialization(String),

    #[error("Invalid date: {0}")]
    #[diagnostic(code(reservas::invalid_date))]
    InvalidDate(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(reservas::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create backend errors
pub fn backend_error(message: &str) -> Error {
    Error::Backend(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
