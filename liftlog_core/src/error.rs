//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
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

    /// A structural precondition of the program definition was violated
    /// (empty stages, missing rule parameter, missing increment or
    /// start-weight entry). Fatal for the replay in progress; surfaced
    /// to the caller so the definition can be rejected upstream.
    #[error("Malformed program definition: {0}")]
    MalformedDefinition(String),

    /// A rule kind the engine does not know about. Isolated from
    /// `MalformedDefinition` because it signals a definition authored
    /// for a newer rule vocabulary than this engine supports.
    #[error("Unknown progression rule kind: {0}")]
    UnknownRuleKind(String),

    /// Definition-level validation error (load-time validator)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
