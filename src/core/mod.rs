//! Core types for partial-render
//!
//! This module holds the error vocabulary shared by every other module:
//!
//! - [`RenderError`] - Enumerated failure modes of a render call
//! - [`ErrorContext`] - User-friendly wrapper with details and suggestions
//! - [`user_friendly_error`] - Convert any [`anyhow::Error`] for CLI display
//! - [`file_error`] - File operation errors that carry their call-site context

pub mod error;
pub mod file_error;

pub use error::{EngineStage, ErrorContext, RenderError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};

/// Result alias used across the library.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;
