//! In-memory resource loader.

use std::collections::HashMap;
use std::sync::RwLock;

use strsim::levenshtein;

use super::ResourceLoader;
use crate::constants::{MAX_SUGGESTIONS, SIMILARITY_THRESHOLD_PERCENT};
use crate::core::{RenderError, Result};

/// Serves resources from a map held in memory.
///
/// Entries can be replaced while the loader is shared; the next load sees the
/// new content.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    resources: RwLock<HashMap<String, String>>,
}

impl MemoryLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    /// Add or replace a resource.
    pub fn insert(&self, name: impl Into<String>, content: impl Into<String>) {
        let mut resources = self.resources.write().unwrap_or_else(|e| e.into_inner());
        resources.insert(name.into(), content.into());
    }

    /// Remove a resource, returning its content.
    pub fn remove(&self, name: &str) -> Option<String> {
        let mut resources = self.resources.write().unwrap_or_else(|e| e.into_inner());
        resources.remove(name)
    }

    fn suggest(resources: &HashMap<String, String>, name: &str) -> Vec<String> {
        let threshold = name.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
        let mut scored: Vec<(&String, usize)> = resources
            .keys()
            .map(|candidate| (candidate, levenshtein(name, candidate)))
            .filter(|(_, distance)| *distance <= threshold)
            .collect();
        scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        scored.into_iter().take(MAX_SUGGESTIONS).map(|(candidate, _)| candidate.clone()).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryLoader
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let resources = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            resources: RwLock::new(resources),
        }
    }
}

impl ResourceLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String> {
        let resources = self.resources.read().unwrap_or_else(|e| e.into_inner());
        resources.get(name).cloned().ok_or_else(|| RenderError::ResourceNotFound {
            name: name.to_string(),
            suggestions: Self::suggest(&resources, name),
        })
    }

    fn describe(&self) -> String {
        "in-memory resources".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_replace() {
        let loader = MemoryLoader::new().with("header.html", "<h1>Hi</h1>");
        assert_eq!(loader.load("header.html").unwrap(), "<h1>Hi</h1>");

        loader.insert("header.html", "<h1>Bye</h1>");
        assert_eq!(loader.load("header.html").unwrap(), "<h1>Bye</h1>");

        assert_eq!(loader.remove("header.html").as_deref(), Some("<h1>Bye</h1>"));
        assert!(loader.load("header.html").unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_with_suggestion() {
        let loader: MemoryLoader = [("nav/main.html", "x")].into_iter().collect();
        match loader.load("nav/mian.html").unwrap_err() {
            RenderError::ResourceNotFound {
                suggestions,
                ..
            } => assert_eq!(suggestions, vec!["nav/main.html".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
