//! Partial name to storage path resolution.

use crate::constants::{NAMESPACE_SEPARATOR, PARTIAL_EXTENSION};

/// Maps logical partial names to resource paths.
///
/// Every `_` in the name becomes the namespace separator, then the extension is
/// appended: `footer_links` resolves to `footer/links.html` with the defaults.
/// Resolution is pure and never fails; a bad path only surfaces when it is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialPathResolver {
    separator: char,
    extension: String,
}

impl Default for PartialPathResolver {
    fn default() -> Self {
        Self {
            separator: NAMESPACE_SEPARATOR,
            extension: PARTIAL_EXTENSION.to_string(),
        }
    }
}

impl PartialPathResolver {
    /// Create a resolver with a custom separator and extension.
    pub fn new(separator: char, extension: impl Into<String>) -> Self {
        Self {
            separator,
            extension: extension.into(),
        }
    }

    /// Resolve `name` to its resource path.
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        let mut path: String =
            name.chars().map(|c| if c == '_' { self.separator } else { c }).collect();
        path.push_str(&self.extension);
        path
    }

    /// The separator substituted for `_`.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// The extension appended to every path.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Resolve `name` with the default separator and extension.
#[must_use]
pub fn resolve_partial_path(name: &str) -> String {
    PartialPathResolver::default().resolve(name)
}
