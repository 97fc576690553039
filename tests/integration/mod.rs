//! Integration test suite for partial-render
//!
//! End-to-end tests that render real resource trees through the bundled engine
//! and drive the `prender` binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: template, partial and data scenarios through [`PartialRenderer`]
//! - **bootstrap**: engine start-up and global partials
//! - **concurrency**: serialized engine access and render deadlines
//! - **cli**: the `prender` commands
//!
//! [`PartialRenderer`]: partial_render::templating::PartialRenderer

mod bootstrap;
mod cli;
mod concurrency;
mod render;

use partial_render::templating::PartialRenderer;
use partial_render::test_utils::{ResourceTree, init_test_logging};

/// A tree with an empty bootstrap script, ready for [`renderer`].
pub fn site() -> ResourceTree {
    init_test_logging(None);
    ResourceTree::new().with_file("ractive.js", "// bundled library\n")
}

/// A renderer over `tree` with its default configuration.
pub fn renderer(tree: &ResourceTree) -> PartialRenderer {
    PartialRenderer::from_config(&tree.config()).expect("renderer should bootstrap")
}
