//! Error types used throughout the booking core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Studiobook
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StudiobookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Studiobook operations
pub type Result<T> = std::result::Result<T, StudiobookError>;
