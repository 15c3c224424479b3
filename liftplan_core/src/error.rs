//! Error types for the liftplan_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftplan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation parameters failed validation
    #[error("Invalid generation parameters: {0}")]
    InvalidParams(String),

    /// Catalog or routine store rejected an operation
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Failure talking to the external generation service.
///
/// These never reach callers of `ProgramGenerator::generate`; they are logged
/// and replaced by the fallback program.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("service returned {0}")]
    Status(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response carried no text payload")]
    EmptyPayload,
}

/// Reasons a service response could not be repaired into a program.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("program has no name")]
    MissingName,

    #[error("program has no workouts sequence")]
    MissingWorkouts,

    #[error("program workouts sequence is empty")]
    NoWorkouts,
}
