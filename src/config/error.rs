//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address")]
    InvalidBindAddress,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request timeout of {request_secs}s must exceed {required_secs}s (two model calls)")]
    RequestTimeoutTooShort { request_secs: u64, required_secs: u64 },

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Upload size limit must be between 1 byte and 100 MiB")]
    InvalidUploadLimit,

    #[error("Image dimension must be at least 64 pixels")]
    InvalidImageDimension,

    #[error("JPEG quality must be between 1 and 100")]
    InvalidJpegQuality,

    #[error("Unknown agent in paid_agents: {0}")]
    UnknownAgent(String),

    #[error("Unsupported payment sign type: {0}")]
    InvalidSignType(String),

    #[error("Price must be greater than zero")]
    InvalidPrice,
}
