//! Process-wide render context.

use std::collections::BTreeSet;
use std::sync::Mutex;

use super::ScriptEngine;
use crate::core::{RenderError, Result};
use crate::loader::ResourceLoader;

/// A bootstrapped script engine shared by every render.
///
/// The context owns one engine with the templating library already loaded. The
/// engine holds mutable state between the construction and render submissions
/// of an invocation, so access goes through [`session`](Self::session), which
/// keeps the engine locked for the whole closure. Concurrent renders are
/// serialized; none observes another's half-built view.
///
/// # Examples
///
/// ```rust
/// use partial_render::engine::{RenderContext, ScriptEngine, TeraHost};
/// use partial_render::loader::MemoryLoader;
///
/// let loader = MemoryLoader::new().with("ractive.js", "Ractive.partials.sig = 'bye';");
/// let context = RenderContext::init(Box::new(TeraHost::new()), &loader, "ractive.js")?;
///
/// let html = context.session(|engine| {
///     engine.eval("var ractive = new Ractive({ template: '{{> sig}}' })").ok();
///     Ok(engine.eval("ractive.toHtml()").ok().flatten())
/// })?;
/// assert_eq!(html.as_deref(), Some("bye"));
/// # Ok::<(), partial_render::core::RenderError>(())
/// ```
pub struct RenderContext {
    engine: Mutex<Box<dyn ScriptEngine>>,
    bootstrap: String,
    registered: BTreeSet<String>,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("bootstrap", &self.bootstrap)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    /// Load the bootstrap resource and evaluate it in `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::BootstrapFailed`] when the resource cannot be
    /// loaded or the engine rejects it. No context is created in that case.
    pub fn init(
        mut engine: Box<dyn ScriptEngine>,
        loader: &dyn ResourceLoader,
        bootstrap: &str,
    ) -> Result<Self> {
        let failed = |reason: String| RenderError::BootstrapFailed {
            resource: bootstrap.to_string(),
            reason,
        };

        let script = loader.load(bootstrap).map_err(|e| failed(e.to_string()))?;
        engine.eval(&script).map_err(|e| failed(e.to_string()))?;

        let registered: BTreeSet<String> = engine.registered_partials().into_iter().collect();
        tracing::debug!(
            "Bootstrapped {} engine from '{}' ({} bytes, {} registered partial(s))",
            engine.name(),
            bootstrap,
            script.len(),
            registered.len()
        );

        Ok(Self {
            engine: Mutex::new(engine),
            bootstrap: bootstrap.to_string(),
            registered,
        })
    }

    /// The resource the engine was bootstrapped from.
    pub fn bootstrap_resource(&self) -> &str {
        &self.bootstrap
    }

    /// Partials the bootstrapped engine already knows by name.
    pub fn registered_partials(&self) -> &BTreeSet<String> {
        &self.registered
    }

    /// Run `f` with exclusive access to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EnginePoisoned`] if an earlier session panicked,
    /// otherwise whatever `f` returns.
    pub fn session<T>(&self, f: impl FnOnce(&mut dyn ScriptEngine) -> Result<T>) -> Result<T> {
        let mut engine = self.engine.lock().map_err(|_| RenderError::EnginePoisoned)?;
        f(engine.as_mut())
    }

    /// Release the context and hand back its engine.
    pub fn teardown(self) -> Result<Box<dyn ScriptEngine>> {
        tracing::debug!("Tearing down render context bootstrapped from '{}'", self.bootstrap);
        self.engine.into_inner().map_err(|_| RenderError::EnginePoisoned)
    }
}
