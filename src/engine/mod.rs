//! Script engine abstraction
//!
//! The renderer talks to its templating library through a [`ScriptEngine`]:
//! it submits a script, the engine evaluates it and hands back the value of the
//! last statement. Two submissions make up one render (see
//! [`Invocation`](crate::templating::Invocation)), and a [`RenderContext`] makes
//! sure no other render interleaves between them.
//!
//! [`TeraHost`] is the engine shipped with the crate. It understands the
//! statement forms an invocation and a bootstrap script are made of, and renders
//! views with [Tera](https://keats.github.io/tera/).

mod context;
pub mod lexer;
pub mod parser;
mod tera_host;

pub use context::RenderContext;
pub use tera_host::TeraHost;

use thiserror::Error;

/// Failure reported by a script engine.
///
/// The `Display` form is the diagnostic surfaced to callers in
/// [`RenderError::RenderEngineError`](crate::core::RenderError::RenderEngineError).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The script could not be parsed
    #[error("SyntaxError: {message} (at offset {offset})")]
    Syntax {
        /// What the parser expected or found
        message: String,
        /// Byte offset into the submitted script
        offset: usize,
    },

    /// A name was used that is not bound
    #[error("ReferenceError: {name} is not defined")]
    Reference {
        /// The unbound name
        name: String,
    },

    /// A value was used in a way its type does not allow
    #[error("TypeError: {message}")]
    Type {
        /// Description of the misuse
        message: String,
    },

    /// The templating library rejected or failed to render a template
    #[error("TemplateError: {message}")]
    Template {
        /// The library diagnostic, with its cause chain
        message: String,
    },
}

/// An embedded script evaluator.
///
/// Implementations keep state between calls: a view constructed by one
/// submission is rendered by the next. `eval` is only ever called by one thread
/// at a time.
pub trait ScriptEngine: Send {
    /// Evaluate `script`, returning the value of its last statement as text.
    ///
    /// Statements without a value (declarations, registrations) yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the script is malformed or fails while
    /// executing. State changes made by statements before the failing one are
    /// kept.
    fn eval(&mut self, script: &str) -> Result<Option<String>, EngineError>;

    /// Engine name for log messages.
    fn name(&self) -> &str;

    /// Partials the engine resolves without being handed them, such as the ones
    /// a bootstrap script registered.
    fn registered_partials(&self) -> Vec<String> {
        Vec::new()
    }
}
