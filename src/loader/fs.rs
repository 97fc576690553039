//! Directory-backed resource loader.

use std::path::{Component, Path, PathBuf};

use strsim::levenshtein;
use walkdir::WalkDir;

use super::ResourceLoader;
use crate::constants::{MAX_SUGGESTIONS, SIMILARITY_THRESHOLD_PERCENT};
use crate::core::{FileOperation, FileResultExt, RenderError, Result};

/// Loads resources from files under a root directory.
///
/// Resource names are relative paths using `/` separators. Every load reads the
/// file again; nothing is cached between calls.
///
/// # Security
///
/// Names are validated before any file system access:
/// - absolute paths are rejected
/// - `..` components may not climb above the root
///
/// # Examples
///
/// ```rust,no_run
/// use partial_render::loader::{FsLoader, ResourceLoader};
///
/// # fn example() -> partial_render::core::Result<()> {
/// let loader = FsLoader::new("templates");
/// let header = loader.load("header.html")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
    max_file_size: Option<u64>,
}

impl FsLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: None,
        }
    }

    /// Reject files larger than `limit` bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// The root directory resources are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource name to a path under the root.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidResourceName`] for absolute names, names that
    /// climb above the root and empty names.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = Path::new(name);

        if name.is_empty() {
            return Err(invalid(name, "resource name is empty"));
        }

        if path.is_absolute() {
            return Err(invalid(name, "absolute paths are not allowed"));
        }

        let mut depth: i32 = 0;
        for component in path.components() {
            match component {
                Component::Normal(_) => depth += 1,
                Component::ParentDir => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(invalid(name, "path escapes the resource root"));
                    }
                }
                Component::CurDir => {}
                _ => return Err(invalid(name, "only relative paths are allowed")),
            }
        }

        Ok(self.root.join(path))
    }

    /// Resource names under the root that look like `name`.
    ///
    /// Candidates are ranked by Levenshtein distance and kept when the distance is
    /// within [`SIMILARITY_THRESHOLD_PERCENT`] of the requested name's length.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let threshold = name.len() * SIMILARITY_THRESHOLD_PERCENT / 100;

        let mut scored: Vec<(String, usize)> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let candidate = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let distance = levenshtein(name, &candidate);
                (distance <= threshold).then_some((candidate, distance))
            })
            .collect();

        scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        scored.into_iter().take(MAX_SUGGESTIONS).map(|(candidate, _)| candidate).collect()
    }
}

fn invalid(name: &str, reason: &str) -> RenderError {
    RenderError::InvalidResourceName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

impl ResourceLoader for FsLoader {
    fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;

        if !path.is_file() {
            tracing::debug!("Resource '{}' not found at {}", name, path.display());
            return Err(RenderError::ResourceNotFound {
                name: name.to_string(),
                suggestions: self.suggest(name),
            });
        }

        if let Some(limit) = self.max_file_size {
            let size = std::fs::metadata(&path)
                .with_file_context(FileOperation::Metadata, &path, "checking resource size", "fs_loader")?
                .len();
            if size > limit {
                return Err(RenderError::ResourceTooLarge {
                    name: name.to_string(),
                    size,
                    limit,
                });
            }
        }

        let content = std::fs::read_to_string(&path).with_file_context(
            FileOperation::Read,
            &path,
            format!("loading resource '{name}'"),
            "fs_loader",
        )?;

        tracing::debug!("Loaded resource '{}' ({} bytes)", name, content.len());
        Ok(content)
    }

    fn describe(&self) -> String {
        format!("files under {}", self.root.display())
    }
}
