//! Error types for Kagami

use thiserror::Error;

/// Main error type for Kagami
#[derive(Error, Debug)]
pub enum KagamiError {
    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rig error: {0}")]
    Rig(#[from] RigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Solver-feed errors
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Receiver error: {0}")]
    Receiver(String),

    #[error("Packet parse error: {0}")]
    Parse(String),

    #[error("Receiver not started")]
    NotStarted,
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Rig-related errors
#[derive(Error, Debug)]
pub enum RigError {
    #[error("Unknown bone profile: {0}")]
    UnknownProfile(String),
}

/// Result type alias for Kagami operations
pub type Result<T> = std::result::Result<T, KagamiError>;
