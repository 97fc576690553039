//! Test utilities for partial-render
//!
//! Helpers shared by unit and integration tests:
//!
//! - [`init_test_logging`] - one-time tracing setup that plays well with the test harness
//! - [`ResourceTree`] - a temporary resource directory populated file by file
//! - [`RecordingEngine`] - a script engine that records what it is asked to evaluate
//!
//! # Example
//!
//! ```rust,no_run
//! use partial_render::loader::ResourceLoader;
//! use partial_render::test_utils::ResourceTree;
//!
//! let tree = ResourceTree::new()
//!     .with_file("page.html", "{{> header}}")
//!     .with_file("header.html", "<h1>Hi</h1>");
//! assert_eq!(tree.loader().load("header.html").unwrap(), "<h1>Hi</h1>");
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::RenderConfig;
use crate::engine::{EngineError, ScriptEngine};
use crate::loader::FsLoader;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run without a subscriber.
///
/// ```bash
/// RUST_LOG=partial_render=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary resource directory.
///
/// Removed when dropped.
pub struct ResourceTree {
    dir: TempDir,
}

impl ResourceTree {
    /// Create an empty tree.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `content` to `name`, creating parent directories.
    ///
    /// # Panics
    /// Panics if the file cannot be written
    #[must_use]
    pub fn with_file(self, name: &str, content: &str) -> Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create resource directory");
        }
        std::fs::write(&path, content).expect("Failed to write resource");
        self
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A loader over the tree.
    pub fn loader(&self) -> FsLoader {
        FsLoader::new(self.dir.path())
    }

    /// Default configuration with the tree as resource root.
    pub fn config(&self) -> RenderConfig {
        RenderConfig {
            resource_root: self.dir.path().to_path_buf(),
            ..RenderConfig::default()
        }
    }
}

impl Default for ResourceTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct Recording {
    scripts: Mutex<Vec<String>>,
    busy: AtomicBool,
    overlapped: AtomicBool,
}

/// A [`ScriptEngine`] that records every script it evaluates.
///
/// Scripts ending in `.toHtml()` evaluate to `rendered:<n>`, where `n` counts
/// evaluations so far; everything else evaluates to no value. Clones share one
/// recording, so keep a clone to inspect the engine after handing it off.
///
/// Overlapping evaluations are detected and reported by
/// [`overlapped`](Self::overlapped).
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    recording: Arc<Recording>,
    delay: Option<Duration>,
    fail_on: Option<(String, EngineError)>,
}

impl RecordingEngine {
    /// Create an engine that accepts every script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` inside every evaluation.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail any script containing `needle` with `error`.
    #[must_use]
    pub fn failing_on(mut self, needle: impl Into<String>, error: EngineError) -> Self {
        self.fail_on = Some((needle.into(), error));
        self
    }

    /// Every script evaluated so far, in order.
    ///
    /// # Panics
    /// Panics if a recording thread panicked
    pub fn scripts(&self) -> Vec<String> {
        self.recording.scripts.lock().expect("recording poisoned").clone()
    }

    /// Whether two evaluations ever ran at the same time.
    pub fn overlapped(&self) -> bool {
        self.recording.overlapped.load(Ordering::SeqCst)
    }
}

impl ScriptEngine for RecordingEngine {
    fn eval(&mut self, script: &str) -> Result<Option<String>, EngineError> {
        if self.recording.busy.swap(true, Ordering::SeqCst) {
            self.recording.overlapped.store(true, Ordering::SeqCst);
        }

        let count = {
            let mut scripts = self.recording.scripts.lock().expect("recording poisoned");
            scripts.push(script.to_string());
            scripts.len()
        };
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        self.recording.busy.store(false, Ordering::SeqCst);

        if let Some((needle, error)) = &self.fail_on {
            if script.contains(needle.as_str()) {
                return Err(error.clone());
            }
        }

        if script.ends_with(".toHtml()") {
            Ok(Some(format!("rendered:{count}")))
        } else {
            Ok(None)
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}
