//! prender CLI entry point
//!
//! Parses arguments, runs the selected command and turns any error into a
//! readable message with suggestions before exiting.

use anyhow::Result;
use clap::Parser;
use partial_render::cli;
use partial_render::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
