//! Error handling for partial-render
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`RenderError`]) so callers can tell a missing
//!    partial from an engine failure
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! # Error Categories
//!
//! - **Resources**: [`RenderError::ResourceNotFound`], [`RenderError::InvalidResourceName`],
//!   [`RenderError::ResourceTooLarge`]
//! - **Engine**: [`RenderError::RenderEngineError`], [`RenderError::BootstrapFailed`],
//!   [`RenderError::EngineTimeout`], [`RenderError::EnginePoisoned`]
//! - **Input**: [`RenderError::InvalidDataPayload`]
//! - **Configuration and I/O**: [`RenderError::ConfigError`], [`RenderError::FileOperation`],
//!   [`RenderError::IoError`], [`RenderError::TomlError`]
//!
//! Every failure aborts the current render call. Nothing is retried and nothing is
//! logged-and-continued.
//!
//! # Examples
//!
//! ```rust,no_run
//! use partial_render::core::{RenderError, user_friendly_error};
//!
//! let error = RenderError::ResourceNotFound {
//!     name: "missing/section.html".to_string(),
//!     suggestions: vec!["missing/sections.html".to_string()],
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::file_error::FileOperationError;

/// The stage of a render call at which the engine reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStage {
    /// Evaluating the construction call that binds template, data and partials
    Construct,
    /// Evaluating the call that produces the textual rendering
    Render,
}

impl fmt::Display for EngineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStage::Construct => write!(f, "construct"),
            EngineStage::Render => write!(f, "render"),
        }
    }
}

/// The main error type for partial-render operations
///
/// Each variant maps to one failure mode of a render call. Library functions
/// return `Result<T, RenderError>`; the CLI converts to [`anyhow::Error`] and
/// presents failures through [`user_friendly_error`].
///
/// # Examples
///
/// ```rust,no_run
/// use partial_render::core::RenderError;
///
/// fn handle_error(error: RenderError) {
///     match error {
///         RenderError::ResourceNotFound { name, .. } => {
///             eprintln!("Create {name} under the resource root");
///         }
///         RenderError::RenderEngineError { diagnostic, .. } => {
///             eprintln!("The engine rejected the template: {diagnostic}");
///         }
///         _ => eprintln!("Unexpected error: {error}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum RenderError {
    /// A template, partial or bootstrap path does not resolve to content
    ///
    /// Fatal for the current render call. `suggestions` lists similarly named
    /// resources when the loader can enumerate its storage.
    #[error("Resource not found: {name}")]
    ResourceNotFound {
        /// The logical resource name that was requested
        name: String,
        /// Similarly named resources that do exist
        suggestions: Vec<String>,
    },

    /// A resource name was rejected before any storage access
    #[error("Invalid resource name '{name}': {reason}")]
    InvalidResourceName {
        /// The rejected resource name
        name: String,
        /// Why the name was rejected
        reason: String,
    },

    /// A resource exceeds the configured size limit
    #[error("Resource '{name}' is {size} bytes, exceeding the limit of {limit} bytes")]
    ResourceTooLarge {
        /// The resource name
        name: String,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// The rendering engine failed to evaluate a submission
    ///
    /// Covers malformed templates, engine-internal failures and syntax corruption
    /// of the invocation itself. `diagnostic` carries the engine's own message.
    #[error("Render engine failed during {stage}: {diagnostic}")]
    RenderEngineError {
        /// Which submission failed
        stage: EngineStage,
        /// The engine diagnostic
        diagnostic: String,
    },

    /// The data payload is not valid JSON
    #[error("Invalid data payload: {reason}")]
    InvalidDataPayload {
        /// Parser message describing the problem
        reason: String,
    },

    /// The templating library could not be loaded into the engine
    ///
    /// Fatal: the render context never becomes usable.
    #[error("Failed to bootstrap render engine from '{resource}': {reason}")]
    BootstrapFailed {
        /// The bootstrap resource name
        resource: String,
        /// Why loading failed
        reason: String,
    },

    /// A render did not complete within the configured deadline
    #[error("Render engine did not respond within {after:?}")]
    EngineTimeout {
        /// The deadline that elapsed
        after: Duration,
    },

    /// A previous render panicked while holding the engine
    #[error("Render engine state is poisoned by an earlier failure")]
    EnginePoisoned,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// File operation failed with structured context
    #[error(transparent)]
    FileOperation(#[from] FileOperationError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl RenderError {
    /// Shorthand for a [`RenderError::ResourceNotFound`] without suggestions.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            name: name.into(),
            suggestions: Vec::new(),
        }
    }

    /// Whether this error means a resource was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use partial_render::core::{ErrorContext, RenderError};
///
/// let context = ErrorContext::new(RenderError::EnginePoisoned)
///     .with_suggestion("Restart the process to get a fresh engine")
///     .with_details("A render panicked while it held the engine");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RenderError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: RenderError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`RenderError`] (directly or anywhere in the chain),
/// [`std::io::Error`] and [`toml::de::Error`]. Anything else is reported with
/// its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(render_error) = cause.downcast_ref::<RenderError>() {
            return create_error_context(render_error);
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(RenderError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the ownership and permissions of the resource root");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(RenderError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(RenderError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your partial-render.toml");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(RenderError::Other {
        message,
    })
}

/// Map each [`RenderError`] variant to a context with tailored suggestions.
fn create_error_context(error: &RenderError) -> ErrorContext {
    let ctx = ErrorContext::new(clone_for_display(error));
    match error {
        RenderError::ResourceNotFound {
            name,
            suggestions,
        } => {
            let ctx = ctx.with_details(
                "Partials are looked up by replacing '_' in the marker name with '/' and appending \
                 '.html', relative to the resource root",
            );
            if suggestions.is_empty() {
                ctx.with_suggestion(format!("Create '{name}' under the resource root"))
            } else {
                ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }
        RenderError::InvalidResourceName {
            ..
        } => ctx.with_suggestion(
            "Resource names must be relative paths that stay inside the resource root",
        ),
        RenderError::ResourceTooLarge {
            ..
        } => ctx.with_suggestion("Raise max_resource_bytes in the configuration or split the file"),
        RenderError::RenderEngineError {
            stage,
            ..
        } => match stage {
            EngineStage::Render => ctx
                .with_suggestion("Check template syntax and that every variable exists in the data")
                .with_details("The template was accepted but could not be rendered"),
            EngineStage::Construct => ctx
                .with_suggestion("Check the template for unbalanced {{ }} delimiters")
                .with_details("The engine rejected the generated invocation"),
        },
        RenderError::InvalidDataPayload {
            ..
        } => ctx.with_suggestion("The data payload must be a JSON object, e.g. {\"name\": \"World\"}"),
        RenderError::BootstrapFailed {
            ..
        } => ctx
            .with_suggestion("Check the 'bootstrap' setting and the contents of the bootstrap script")
            .with_details("The engine cannot render anything until its library is loaded"),
        RenderError::EngineTimeout {
            ..
        } => ctx.with_suggestion("Raise engine_timeout_secs or simplify the template"),
        RenderError::EnginePoisoned => {
            ctx.with_suggestion("Restart the process to get a fresh engine")
        }
        RenderError::TomlError(_) | RenderError::ConfigError {
            ..
        } => ctx.with_suggestion("Check the TOML syntax of your partial-render.toml"),
        RenderError::FileOperation(file_error) => ctx.with_details(file_error.user_message()),
        RenderError::IoError(_) | RenderError::Other {
            ..
        } => ctx,
    }
}

/// Rebuild an owned error for display. Source-carrying variants are flattened
/// to their message.
fn clone_for_display(error: &RenderError) -> RenderError {
    match error {
        RenderError::ResourceNotFound {
            name,
            suggestions,
        } => RenderError::ResourceNotFound {
            name: name.clone(),
            suggestions: suggestions.clone(),
        },
        RenderError::InvalidResourceName {
            name,
            reason,
        } => RenderError::InvalidResourceName {
            name: name.clone(),
            reason: reason.clone(),
        },
        RenderError::ResourceTooLarge {
            name,
            size,
            limit,
        } => RenderError::ResourceTooLarge {
            name: name.clone(),
            size: *size,
            limit: *limit,
        },
        RenderError::RenderEngineError {
            stage,
            diagnostic,
        } => RenderError::RenderEngineError {
            stage: *stage,
            diagnostic: diagnostic.clone(),
        },
        RenderError::InvalidDataPayload {
            reason,
        } => RenderError::InvalidDataPayload {
            reason: reason.clone(),
        },
        RenderError::BootstrapFailed {
            resource,
            reason,
        } => RenderError::BootstrapFailed {
            resource: resource.clone(),
            reason: reason.clone(),
        },
        RenderError::EngineTimeout {
            after,
        } => RenderError::EngineTimeout {
            after: *after,
        },
        RenderError::EnginePoisoned => RenderError::EnginePoisoned,
        RenderError::ConfigError {
            message,
        } => RenderError::ConfigError {
            message: message.clone(),
        },
        other => RenderError::Other {
            message: other.to_string(),
        },
    }
}
