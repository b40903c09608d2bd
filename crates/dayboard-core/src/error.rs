//! Core error types for dayboard-core.
//!
//! Every fallible operation in the library reports one of these enums.
//! None of them is fatal to a session: the host catches them at the
//! callback that produced them and the next render pass starts clean.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionId;

/// Core error type for dayboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Prompt generation errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// Rerun host errors
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// No home directory to put the config under
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Missing or malformed user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No API key was supplied
    #[error("an API key is required")]
    MissingApiKey,

    /// No subject description was supplied
    #[error("a description of the image is required")]
    MissingDescription,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures surfaced by prompt generation, each rendered distinctly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API rejected the key
    #[error("authentication failed: the API key was rejected")]
    Authentication,

    /// Quota or rate limit exceeded
    #[error("rate limit exceeded: try again later or check your quota")]
    RateLimit,

    /// Anything else, wrapping the underlying message
    #[error("prompt generation failed: {0}")]
    Generic(String),
}

/// Rerun host errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The session was never opened or has already ended
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// A render pass kept requesting immediate reruns
    #[error("render pass requested {0} consecutive immediate reruns")]
    RerunLoop(usize),
}

impl From<reqwest::Error> for PromptError {
    fn from(err: reqwest::Error) -> Self {
        match err.status().map(|s| s.as_u16()) {
            Some(401) => PromptError::Authentication,
            Some(429) => PromptError::RateLimit,
            _ => PromptError::Generic(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
