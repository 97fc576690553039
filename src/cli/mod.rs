//! Command-line interface for partial-render.
//!
//! The `prender` binary renders templates from a resource directory and lets
//! you inspect what a render would do.
//!
//! # Available Commands
//!
//! - `render` - Render a template resource with a JSON data payload
//! - `partials` - List the partials a template references and where they resolve
//! - `invocation` - Print the scripts a render would submit, without rendering
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all log output
//! - `--config` - Path to a configuration file (see [`crate::config`])
//!
//! # Examples
//!
//! ```bash
//! # Render with inline data
//! prender render page.html --json '{"title":"Home"}'
//!
//! # Render with data from a file, into a file
//! prender render page.html --data data.json --output out/page.html
//!
//! # Which partials does a template pull in?
//! prender partials page.html --nested
//!
//! # What would be submitted to the engine?
//! prender --verbose invocation page.html --json '{}'
//! ```
//!
//! Log output goes to stderr so rendered output on stdout stays clean.

mod common;
mod invocation;
mod partials;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::RenderConfig;

/// Runtime configuration for CLI execution.
///
/// Separates what the global flags ask for from their side effects, so tests
/// can run commands with a configuration of their choosing.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` disables logging
    pub log_level: Option<String>,

    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with logging disabled and no explicit file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a stderr log subscriber for `log_level`.
    ///
    /// Does nothing when logging is disabled or a subscriber is already set.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for `prender`.
#[derive(Parser)]
#[command(
    name = "prender",
    about = "Render mustache-style templates and their partials",
    version,
    author,
    long_about = "prender renders templates from a resource directory. Partials referenced \
                  with {{> name}} are discovered, loaded and handed to the engine together \
                  with the template and its JSON data."
)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file
    ///
    /// Overrides the `PARTIAL_RENDER_CONFIG` environment variable and the
    /// default locations.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Render a template resource.
    ///
    /// See [`render::RenderCommand`].
    Render(render::RenderCommand),

    /// List the partials a template references.
    ///
    /// See [`partials::PartialsCommand`].
    Partials(partials::PartialsCommand),

    /// Print the invocation a render would submit.
    ///
    /// See [`invocation::InvocationCommand`].
    Invocation(invocation::InvocationCommand),
}

impl Cli {
    /// Execute the CLI with the configuration its flags describe.
    ///
    /// # Errors
    ///
    /// Returns the first error of configuration loading or the command itself.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed flags.
    ///
    /// - `--verbose`: `debug`
    /// - `--quiet`: logging disabled
    /// - otherwise `RUST_LOG` if set, else `info`
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Returns the first error of configuration loading or the command itself.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let (render_config, source) = RenderConfig::discover(config.config_path.as_deref()).await?;
        if let Some(source) = &source {
            tracing::debug!("Loaded configuration from {}", source.display());
        }

        match self.command {
            Commands::Render(cmd) => cmd.execute(render_config).await,
            Commands::Partials(cmd) => cmd.execute(render_config).await,
            Commands::Invocation(cmd) => cmd.execute(render_config).await,
        }
    }
}
