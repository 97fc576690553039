//! Resource loading.
//!
//! A [`ResourceLoader`] turns a logical resource name (`header.html`,
//! `footer/links.html`, `ractive.js`) into raw text. Loaders must not cache:
//! every call observes the current content of the underlying storage, so a
//! partial edited between two renders is picked up by the second one.
//!
//! Two implementations are provided:
//! - [`FsLoader`] reads from a directory tree
//! - [`MemoryLoader`] serves an in-memory map, for embedding and tests

mod fs;
mod memory;

pub use fs::FsLoader;
pub use memory::MemoryLoader;

use crate::core::Result;

/// Source of raw template, partial and bootstrap text.
pub trait ResourceLoader: Send + Sync {
    /// Load the current content of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ResourceNotFound`](crate::core::RenderError::ResourceNotFound)
    /// when `name` does not resolve to a resource. Other variants report names the
    /// loader refuses to serve or storage failures.
    fn load(&self, name: &str) -> Result<String>;

    /// Short description for log messages.
    fn describe(&self) -> String {
        "resource loader".to_string()
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for std::sync::Arc<L> {
    fn load(&self, name: &str) -> Result<String> {
        (**self).load(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
