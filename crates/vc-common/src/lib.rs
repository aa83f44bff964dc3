//! Venv Census common types and errors.
//!
//! This crate provides foundational types shared across vc-core modules:
//! - Package and environment identity types
//! - Scan level ordering
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod id;
pub mod level;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result};
pub use id::{Environment, PackageName};
pub use level::ScanLevel;
pub use output::OutputFormat;
