//! Partial loading and serialization.
//!
//! The assembler turns a [`PartialSet`] into the body of the `partials` mapping
//! literal of an invocation: `name: 'encoded content', other: '...'`.
//!
//! Loading is strict. The first partial that cannot be loaded aborts assembly
//! with its error, so a template is never rendered with a partial missing.
//! Every call loads every partial again; nothing is cached between calls.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use super::encoder::{encode, literal_key};
use super::scanner::{PartialScanner, PartialSet};
use crate::core::Result;
use crate::loader::ResourceLoader;

/// A loaded partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    /// Logical name, as written in the marker
    pub name: String,
    /// Resource path the name resolved to
    pub path: String,
    /// Raw content, before encoding
    pub content: String,
}

impl Partial {
    /// The `name: 'encoded'` entry for this partial.
    pub fn entry(&self) -> String {
        format!("{}: '{}'", literal_key(&self.name), encode(&self.content))
    }
}

/// Serialize loaded partials as the body of a mapping literal.
///
/// Entries are joined with `, `. No partials yield an empty string.
pub fn fragment(partials: &[Partial]) -> String {
    partials.iter().map(Partial::entry).collect::<Vec<_>>().join(", ")
}

/// Loads partial content and serializes it for an invocation.
#[derive(Clone)]
pub struct PartialAssembler {
    loader: Arc<dyn ResourceLoader>,
    scanner: PartialScanner,
    nested: bool,
    registered: BTreeSet<String>,
}

impl std::fmt::Debug for PartialAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialAssembler")
            .field("loader", &self.loader.describe())
            .field("scanner", &self.scanner)
            .field("nested", &self.nested)
            .field("registered", &self.registered)
            .finish()
    }
}

impl PartialAssembler {
    /// Create an assembler that loads through `loader`.
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            scanner: PartialScanner::default(),
            nested: false,
            registered: BTreeSet::new(),
        }
    }

    /// Use `scanner` when discovering partials referenced by other partials.
    #[must_use]
    pub fn with_scanner(mut self, scanner: PartialScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Also load partials referenced from inside loaded partials.
    ///
    /// Each name is loaded at most once per call, which also ends the walk when
    /// partials reference each other in a loop.
    #[must_use]
    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Names the engine resolves on its own.
    ///
    /// A nested reference to one of these is left to the engine when no resource
    /// exists for it. Direct references are always loaded.
    #[must_use]
    pub fn with_registered(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.registered = names.into_iter().collect();
        self
    }

    /// Load every partial in `partials`, ordered by name.
    ///
    /// # Errors
    ///
    /// Propagates the first loader error, typically
    /// [`RenderError::ResourceNotFound`](crate::core::RenderError::ResourceNotFound).
    pub fn load(&self, partials: &PartialSet) -> Result<Vec<Partial>> {
        self.load_with(partials, &BTreeMap::new())
    }

    /// Like [`load`](Self::load), with some partials supplied by the caller.
    ///
    /// Every entry of `provided` is part of the result, referenced or not, and is
    /// never loaded. Referenced names not in `provided` are loaded as usual.
    pub fn load_with(
        &self,
        partials: &PartialSet,
        provided: &BTreeMap<String, String>,
    ) -> Result<Vec<Partial>> {
        let mut seen = partials.clone();
        let mut pending = VecDeque::new();
        let mut loaded = Vec::with_capacity(partials.len() + provided.len());

        for (name, content) in provided {
            let path = self.scanner.resolver().resolve(name);
            seen.insert(name.clone(), path.clone());
            self.discover(name, content, &mut seen, &mut pending);
            loaded.push(Partial {
                name: name.clone(),
                path,
                content: content.clone(),
            });
        }

        for (name, path) in partials.iter() {
            if !provided.contains_key(name) {
                pending.push_back((name.to_string(), path.to_string()));
            }
        }

        while let Some((name, path)) = pending.pop_front() {
            tracing::debug!("Loading partial '{}' from '{}'", name, path);
            let content = match self.loader.load(&path) {
                Ok(content) => content,
                Err(e)
                    if e.is_not_found()
                        && !partials.contains(&name)
                        && self.registered.contains(&name) =>
                {
                    tracing::debug!("Partial '{}' is registered with the engine", name);
                    continue;
                }
                Err(e) => return Err(e),
            };
            self.discover(&name, &content, &mut seen, &mut pending);
            loaded.push(Partial {
                name,
                path,
                content,
            });
        }

        loaded.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(loaded)
    }

    /// Queue partials referenced from `content` that have not been seen yet.
    fn discover(
        &self,
        parent: &str,
        content: &str,
        seen: &mut PartialSet,
        pending: &mut VecDeque<(String, String)>,
    ) {
        if !self.nested {
            return;
        }
        for (child, child_path) in self.scanner.scan(&encode(content)) {
            if seen.insert(child.clone(), child_path.clone()) {
                tracing::debug!("Partial '{}' references '{}'", parent, child);
                pending.push_back((child, child_path));
            }
        }
    }

    /// Load `partials` and serialize them as a mapping-literal body.
    ///
    /// An empty set yields an empty fragment without touching the loader.
    pub fn assemble(&self, partials: &PartialSet) -> Result<String> {
        Ok(fragment(&self.load(partials)?))
    }
}
