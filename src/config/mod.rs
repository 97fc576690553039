//! Configuration for partial-render
//!
//! Settings live in a single TOML file. Every key is optional; a missing file
//! or key falls back to the defaults shown here:
//!
//! ```toml
//! # Directory templates, partials and the bootstrap script are loaded from
//! resource_root = "."
//!
//! # Bootstrap script evaluated once when the engine starts
//! bootstrap = "ractive.js"
//!
//! # Name of the view constructor invocations call
//! view_constructor = "Ractive"
//!
//! # Partial name -> path mapping: `_` becomes the separator, then the extension is appended
//! partial_extension = ".html"
//! namespace_separator = "/"
//!
//! # Also load partials referenced from inside partials
//! nested_partials = false
//!
//! # Render deadline (the CLI uses 30 seconds when unset) and resource size limit
//! # engine_timeout_secs = 30
//! # max_resource_bytes = 1048576
//! ```
//!
//! # Lookup Order
//!
//! 1. An explicit path (`--config`)
//! 2. The `PARTIAL_RENDER_CONFIG` environment variable
//! 3. `partial-render.toml` in the working directory
//! 4. `~/.partial-render/config.toml`
//!
//! The first existing file wins. An explicit path or environment variable that
//! points at a missing file is an error; the two implicit locations are simply
//! skipped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_BOOTSTRAP, DEFAULT_VIEW_CONSTRUCTOR,
    NAMESPACE_SEPARATOR, PARTIAL_EXTENSION,
};
use crate::core::RenderError;
use crate::templating::PartialPathResolver;

/// Render configuration.
///
/// # Examples
///
/// ```rust
/// use partial_render::config::RenderConfig;
///
/// let config: RenderConfig = toml::from_str("nested_partials = true")?;
/// assert!(config.nested_partials);
/// assert_eq!(config.bootstrap, "ractive.js");
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Directory resources are loaded from.
    ///
    /// A relative path in a configuration file is taken relative to the file.
    pub resource_root: PathBuf,

    /// Resource name of the bootstrap script.
    pub bootstrap: String,

    /// Constructor called by the construction script.
    pub view_constructor: String,

    /// Extension appended to partial paths.
    pub partial_extension: String,

    /// Character that replaces `_` in partial names.
    pub namespace_separator: char,

    /// Discover partials referenced from loaded partials.
    pub nested_partials: bool,

    /// Fail renders that take longer than this many seconds.
    ///
    /// Library renders have no deadline unless one is set; the CLI falls back to
    /// [`DEFAULT_ENGINE_TIMEOUT`](crate::constants::DEFAULT_ENGINE_TIMEOUT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_timeout_secs: Option<u64>,

    /// Refuse to load resources larger than this many bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resource_bytes: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from("."),
            bootstrap: DEFAULT_BOOTSTRAP.to_string(),
            view_constructor: DEFAULT_VIEW_CONSTRUCTOR.to_string(),
            partial_extension: PARTIAL_EXTENSION.to_string(),
            namespace_separator: NAMESPACE_SEPARATOR,
            nested_partials: false,
            engine_timeout_secs: None,
            max_resource_bytes: None,
        }
    }
}

impl RenderConfig {
    /// Find and load the configuration, following the lookup order.
    ///
    /// Returns the configuration and the file it came from, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, or if the file
    /// found cannot be read, parsed or validated.
    pub async fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = named {
            if !path.exists() {
                return Err(RenderError::ConfigError {
                    message: format!("Configuration file not found: {}", path.display()),
                }
                .into());
            }
            let config = Self::load_from(&path).await?;
            return Ok((config, Some(path)));
        }

        let candidates = [Some(PathBuf::from(CONFIG_FILE_NAME)), Self::default_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!("Using configuration from {}", path.display());
                let config = Self::load_from(&path).await?;
                return Ok((config, Some(path)));
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Load from `path` if given and present, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(&path).await,
            _ => Ok(Self::default()),
        }
    }

    /// Load the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid TOML or unknown keys
    /// - A value fails [`validate`](Self::validate)
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(RenderError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        if config.resource_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.resource_root = parent.join(&config.resource_root);
            }
        }

        config.validate().with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// The per-user configuration file, `~/.partial-render/config.toml`.
    ///
    /// `None` when the home directory cannot be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".partial-render").join("config.toml"))
    }

    /// Check values that TOML types alone cannot.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> crate::core::Result<()> {
        let invalid = |message: String| -> crate::core::Result<()> {
            Err(RenderError::ConfigError {
                message,
            })
        };

        if self.bootstrap.trim().is_empty() {
            return invalid("bootstrap must name a resource".to_string());
        }

        let mut chars = self.view_constructor.chars();
        let is_identifier = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_identifier {
            return invalid(format!(
                "view_constructor '{}' is not a valid identifier",
                self.view_constructor
            ));
        }

        if self.namespace_separator == '_' {
            return invalid("namespace_separator cannot be '_'".to_string());
        }

        if self.engine_timeout_secs == Some(0) {
            return invalid("engine_timeout_secs must be greater than zero".to_string());
        }

        Ok(())
    }

    /// The partial path resolver these settings describe.
    pub fn resolver(&self) -> PartialPathResolver {
        PartialPathResolver::new(self.namespace_separator, self.partial_extension.clone())
    }

    /// The render deadline, if one is configured.
    pub fn engine_timeout(&self) -> Option<Duration> {
        self.engine_timeout_secs.map(Duration::from_secs)
    }
}
