//! Centralized error types.
//!
//! Only startup can fail: configuration is validated and every resource is
//! loaded before the first tick. The simulation loop itself is infallible.

use std::io;

/// Main error type, returned by the binary's startup path.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

/// Rejected configuration (fatal, reported before the session starts).
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("At least one level must be configured")]
    NoLevels,

    #[error("Level {level} has a non-positive score threshold")]
    NonPositiveThreshold { level: usize },

    #[error("Level {level} allows no enemy palettes")]
    EmptyPalette { level: usize },

    #[error("Level {level} references unknown palette '{key}'")]
    UnknownPalette { level: usize, key: String },

    #[error("Invalid tuning value: {0}")]
    InvalidTuning(String),
}

/// Resource loading failures (fatal at startup).
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt asset {path}: {reason}")]
    Corrupt { path: String, reason: String },
}
