//! Partial reference discovery.
//!
//! Templates reference partials with markers of the form `{{> name}}`, with at
//! most one whitespace character after `>` and before `}}`. Names are limited to
//! `[A-Za-z0-9_./]+`. Anything else is ordinary template text: malformed markers
//! are skipped without an error and left for the engine to deal with.
//!
//! Discovery is purely textual. Nothing checks whether the referenced partials
//! form a cycle.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::resolver::PartialPathResolver;

static PARTIAL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{>\s?([A-Za-z0-9_./]+)\s?\}\}").expect("partial marker pattern is valid")
});

/// The set of partials referenced by one template, keyed by name.
///
/// Iteration is ordered by name, which makes the assembled invocation
/// deterministic for a given template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSet {
    entries: BTreeMap<String, String>,
}

impl PartialSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name -> path`. Returns `false` if `name` was already present,
    /// in which case the existing path is kept.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) -> bool {
        match self.entries.entry(name.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(path.into());
                true
            }
        }
    }

    /// Resolved path for `name`, if it was referenced.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Whether `name` was referenced.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Drop `name` from the set, returning its path.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    /// Number of distinct partials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no partial was referenced.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Referenced names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, path)` pairs, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, path)| (name.as_str(), path.as_str()))
    }
}

impl IntoIterator for PartialSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Finds partial markers and resolves each referenced name to a path.
#[derive(Debug, Clone, Default)]
pub struct PartialScanner {
    resolver: PartialPathResolver,
}

impl PartialScanner {
    /// Create a scanner that resolves paths with `resolver`.
    pub fn new(resolver: PartialPathResolver) -> Self {
        Self {
            resolver,
        }
    }

    /// The resolver used for discovered names.
    pub fn resolver(&self) -> &PartialPathResolver {
        &self.resolver
    }

    /// Scan `text` for markers.
    ///
    /// `text` is normally the already-encoded template. Encoding leaves every
    /// name character and the marker punctuation alone, so the discovered set
    /// matches a scan of the raw text for markers that use a plain space.
    pub fn scan(&self, text: &str) -> PartialSet {
        let mut partials = PartialSet::new();

        for captures in PARTIAL_MARKER.captures_iter(text) {
            if let Some(name) = captures.get(1) {
                let name = name.as_str();
                if partials.insert(name, self.resolver.resolve(name)) {
                    tracing::debug!("Found partial reference '{}'", name);
                }
            }
        }

        tracing::debug!("Discovered {} partial(s)", partials.len());
        partials
    }
}

/// Scan `text` with the default resolver.
pub fn scan_partials(text: &str) -> PartialSet {
    PartialScanner::default().scan(text)
}

/// Rewrite every partial marker in `text` with `replace(name)`.
///
/// Markers are matched with exactly the pattern used for discovery, so a marker
/// is rewritten if and only if it would have been scanned.
pub fn replace_markers(text: &str, mut replace: impl FnMut(&str) -> String) -> String {
    PARTIAL_MARKER.replace_all(text, |captures: &regex::Captures<'_>| replace(&captures[1])).into_owned()
}
