use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(aukiolo::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(aukiolo::config))]
    Config(String),

    #[error("Database error: {0}")]
    #[diagnostic(code(aukiolo::database))]
    Database(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(aukiolo::component))]
    Component(String),

    #[error("No suggestion found with id {0}")]
    #[diagnostic(code(aukiolo::workflow::not_found))]
    SuggestionNotFound(String),

    #[error("Suggestion {id} is already {current}, only pending ones can be reviewed")]
    #[diagnostic(code(aukiolo::workflow::invalid_transition))]
    InvalidTransition { id: String, current: String },

    #[error("Rejection requires a non-empty reviewer note")]
    #[diagnostic(code(aukiolo::workflow::missing_justification))]
    MissingJustification,

    #[error("A pending suggestion already exists for hospital {0}")]
    #[diagnostic(code(aukiolo::workflow::duplicate_pending))]
    DuplicatePending(String),

    #[error(transparent)]
    #[diagnostic(code(aukiolo::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(aukiolo::serialization))]
    Serialization(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type HoursResult<T> = Result<T, Error>;

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

/// Helper to create database errors
pub fn db_error(message: &str) -> Error {
    Error::Database(message.to_string())
}

/// Helper to create invalid transition errors from a proposal's current state
pub fn invalid_transition(id: &str, current: &str) -> Error {
    Error::InvalidTransition {
        id: id.to_string(),
        current: current.to_string(),
    }
}
