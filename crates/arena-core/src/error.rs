//! Error types for the fallible edges of the arena: configuration, I/O and
//! JSON output.
//!
//! The per-frame update never fails; these only surface while loading
//! configuration or starting the host.

use thiserror::Error;

/// Errors raised outside the simulation tick.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// TOML could not be parsed into a config.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// A config could not be written back out as TOML.
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or summary serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parsed config holds values the simulation cannot run with.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl ArenaError {
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias for arena operations.
pub type Result<T> = std::result::Result<T, ArenaError>;
