//! partial-render - mustache-style templates with discovered partials
//!
//! Renders a template and a JSON data payload through an embedded script
//! engine. Partials referenced from the template with `{{> name}}` are found,
//! loaded from a resource directory and handed to the engine together with the
//! template, so a page can be assembled from many small files without listing
//! them up front.
//!
//! # Architecture Overview
//!
//! A render is a pipeline of small, separately testable steps:
//!
//! 1. The template is encoded into a single-quoted script literal
//! 2. Partial markers are scanned from the encoded text
//! 3. Each partial name is resolved to a resource path (`footer_links` -> `footer/links.html`)
//! 4. Partials are loaded and encoded into a fragment of `name: 'content'` entries
//! 5. A construction script and a render script are submitted to the engine under one lock
//!
//! The engine is created once, bootstrapped with a script resource, and shared
//! by every render through a [`engine::RenderContext`].
//!
//! # Core Modules
//!
//! - [`templating`] - Encoding, scanning, resolution, assembly and rendering
//! - [`engine`] - The script engine seam and the bundled Tera-backed engine
//! - [`loader`] - Where template and partial resources come from
//! - [`config`] - `partial-render.toml` discovery and validation
//! - [`core`] - Error types and user-facing error formatting
//! - [`cli`] - The `prender` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use partial_render::config::RenderConfig;
//! use partial_render::templating::PartialRenderer;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = RenderConfig {
//!     resource_root: "site".into(),
//!     ..RenderConfig::default()
//! };
//! let renderer = PartialRenderer::from_config(&config)?;
//!
//! let html = renderer.render_resource("page.html", r#"{"title":"Home"}"#)?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Render a page
//! prender render page.html --data data.json
//!
//! # List the partials it pulls in
//! prender partials page.html --nested
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod engine;
pub mod loader;
pub mod templating;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
