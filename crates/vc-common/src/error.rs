//! Error types for Venv Census.
//!
//! Structured error handling with stable error codes and category
//! classification. Note that most scanning conditions are deliberately
//! NOT errors: a missing site-packages directory, a truncated METADATA
//! file, or an unavailable pip oracle all degrade to empty/omitted
//! results. The variants here cover the conditions that do surface to
//! the CLI: configuration problems, discovery failures, and I/O or
//! serialization faults outside the scan path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Venv Census operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration and CLI argument errors.
    Config,
    /// Environment discovery errors.
    Discovery,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Discovery => write!(f, "discovery"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Venv Census.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    // Discovery errors (20-29)
    #[error("environment discovery failed under {root}: {reason}")]
    Discovery { root: String, reason: String },

    #[error("environment not found: {name}")]
    EnvironmentNotFound { name: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Discovery errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnknownProfile(_) => 11,
            Error::Discovery { .. } => 20,
            Error::EnvironmentNotFound { .. } => 21,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::UnknownProfile(_) => ErrorCategory::Config,
            Error::Discovery { .. } | Error::EnvironmentNotFound { .. } => {
                ErrorCategory::Discovery
            }
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a short headline for human-readable stderr output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::UnknownProfile(_) => "Unknown Profile",
            Error::Discovery { .. } => "Environment Discovery Failed",
            Error::EnvironmentNotFound { .. } => "Environment Not Found",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Serialization Error",
        }
    }
}

/// Format an error for human-readable stderr output.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, reset) = if use_color { ("\x1b[31m", "\x1b[0m") } else { ("", "") };
    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}",
        red = red,
        reset = reset,
        headline = err.headline(),
        message = err
    )
}
