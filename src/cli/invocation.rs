//! Print the invocation a render would submit.
//!
//! Composes the construction and render scripts exactly as `render` would,
//! without starting an engine. Useful when a template renders unexpectedly or
//! the engine reports a syntax error in the submission.

use anyhow::Result;
use clap::Args;

use super::common::{DataArgs, ResourceArgs, resource_loader};
use crate::config::RenderConfig;
use crate::templating::InvocationComposer;

/// Command to print a template's invocation.
#[derive(Args, Debug)]
pub struct InvocationCommand {
    /// Template resource name, relative to the resource root
    template: String,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    resources: ResourceArgs,
}

impl InvocationCommand {
    /// Execute the invocation command.
    ///
    /// # Errors
    /// Returns an error if the template or a partial cannot be loaded, or the
    /// data payload is not JSON
    pub async fn execute(self, config: RenderConfig) -> Result<()> {
        let config = self.resources.apply(config);
        let loader = resource_loader(&config);

        let template = loader.load(&self.template)?;
        let payload = self.data.payload().await?;

        let invocation =
            InvocationComposer::from_config(&config, loader).compose_payload(&template, &payload)?;
        println!("{invocation}");
        Ok(())
    }
}
