//! Arguments and helpers shared by CLI commands

use anyhow::{Context, Result};
use clap::Args;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::config::RenderConfig;
use crate::engine::{RenderContext, TeraHost};
use crate::loader::{FsLoader, ResourceLoader};

/// Where the JSON data payload comes from
#[derive(Args, Debug, Default)]
pub struct DataArgs {
    /// Read the JSON data payload from FILE (`-` for stdin)
    #[arg(short, long, value_name = "FILE", conflicts_with = "json")]
    pub data: Option<PathBuf>,

    /// JSON data payload given inline
    #[arg(short, long, value_name = "JSON")]
    pub json: Option<String>,
}

impl DataArgs {
    /// The payload text. Defaults to `{}` when neither option is given.
    ///
    /// # Errors
    /// Returns an error if the data file or stdin cannot be read
    pub async fn payload(&self) -> Result<String> {
        if let Some(json) = &self.json {
            return Ok(json.clone());
        }

        match &self.data {
            Some(path) if path.as_os_str() == "-" => {
                let mut payload = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut payload)
                    .await
                    .context("Failed to read data payload from stdin")?;
                Ok(payload)
            }
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read data payload from {}", path.display())),
            None => Ok("{}".to_string()),
        }
    }
}

/// Overrides for where and how resources are loaded
#[derive(Args, Debug, Default)]
pub struct ResourceArgs {
    /// Directory to load templates and partials from
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Also follow partials referenced from inside partials
    #[arg(long)]
    pub nested: bool,
}

impl ResourceArgs {
    /// Apply the overrides on top of the file configuration.
    #[must_use]
    pub fn apply(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(root) = &self.root {
            config.resource_root = root.clone();
        }
        if self.nested {
            config.nested_partials = true;
        }
        config
    }
}

/// A loader over the configured resource root.
pub fn resource_loader(config: &RenderConfig) -> Arc<dyn ResourceLoader> {
    Arc::new(FsLoader::new(&config.resource_root).with_max_file_size(config.max_resource_bytes))
}

/// Partials the configured bootstrap script registers with the engine.
///
/// A bootstrap that cannot be loaded or evaluated registers nothing.
pub fn registered_partials(config: &RenderConfig, loader: &dyn ResourceLoader) -> BTreeSet<String> {
    let engine = Box::new(TeraHost::with_constructor(&config.view_constructor));
    match RenderContext::init(engine, loader, &config.bootstrap) {
        Ok(context) => context.registered_partials().clone(),
        Err(e) => {
            tracing::debug!("No registered partials: {}", e);
            BTreeSet::new()
        }
    }
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// Readers never observe a partially written file.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file cannot be
/// written or moved into place
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(content.as_bytes()).context("Failed to write rendered output")?;
    file.persist(path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
