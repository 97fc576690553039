//! Render a template resource.
//!
//! # Examples
//!
//! ```bash
//! prender render page.html --json '{"title":"Home"}'
//! prender render blog/post.html --data post.json --output public/post.html
//! prender render page.html --root site --bootstrap boot.js
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use super::common::{DataArgs, ResourceArgs, write_atomic};
use crate::config::RenderConfig;
use crate::constants::DEFAULT_ENGINE_TIMEOUT;
use crate::templating::PartialRenderer;

/// Command to render a template resource with its partials.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template resource name, relative to the resource root
    template: String,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Bootstrap script to load into the engine
    #[arg(short, long, value_name = "NAME")]
    bootstrap: Option<String>,

    /// Write the rendered output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl RenderCommand {
    /// Execute the render command.
    ///
    /// # Errors
    /// Returns an error if the data payload cannot be read, the engine cannot be
    /// bootstrapped, the render fails, or the output cannot be written
    pub async fn execute(self, config: RenderConfig) -> Result<()> {
        let mut config = self.resources.apply(config);
        if let Some(bootstrap) = &self.bootstrap {
            config.bootstrap = bootstrap.clone();
        }

        let payload = self.data.payload().await?;
        let renderer = PartialRenderer::from_config(&config)?;

        let template = renderer.load_resource(&self.template)?;
        let html = renderer.render_with_timeout(template, payload, render_deadline(&config)).await?;

        match &self.output {
            Some(path) => {
                write_atomic(path, &html)
                    .with_context(|| format!("Failed to save render of '{}'", self.template))?;
                tracing::info!("Rendered '{}' to {}", self.template, path.display());
            }
            None => println!("{html}"),
        }

        Ok(())
    }
}

/// The configured deadline, or [`DEFAULT_ENGINE_TIMEOUT`].
fn render_deadline(config: &RenderConfig) -> Duration {
    config.engine_timeout().unwrap_or(DEFAULT_ENGINE_TIMEOUT)
}
