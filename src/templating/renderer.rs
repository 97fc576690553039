//! Render orchestration.
//!
//! [`PartialRenderer`] ties the pipeline together for one render call:
//!
//! 1. encode the template
//! 2. scan the encoded template for partial markers
//! 3. load and assemble the referenced partials
//! 4. compose the [`Invocation`]
//! 5. submit the construction and render scripts to the engine under one lock
//!
//! Every failure aborts the call with a [`RenderError`]; nothing is retried and
//! no partial output is returned.

use std::sync::Arc;
use std::time::Duration;

use super::composer::InvocationComposer;
use super::invocation::{Invocation, RenderRequest};
use super::resolver::PartialPathResolver;
use super::scanner::PartialSet;
use crate::config::RenderConfig;
use crate::core::{EngineStage, RenderError, Result};
use crate::engine::{EngineError, RenderContext, TeraHost};
use crate::loader::{FsLoader, ResourceLoader};

/// Renders templates with their partials through a shared [`RenderContext`].
///
/// Cloning is cheap; clones share the context and loader.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use partial_render::engine::{RenderContext, TeraHost};
/// use partial_render::loader::MemoryLoader;
/// use partial_render::templating::PartialRenderer;
///
/// let loader = Arc::new(
///     MemoryLoader::new()
///         .with("ractive.js", "")
///         .with("header.html", "<h1>Hi</h1>"),
/// );
/// let context = Arc::new(RenderContext::init(Box::new(TeraHost::new()), loader.as_ref(), "ractive.js")?);
/// let renderer = PartialRenderer::new(context, loader);
///
/// let html = renderer.render("{{> header}}Hello {{name}}", r#"{"name":"World"}"#)?;
/// assert_eq!(html, "<h1>Hi</h1>Hello World");
/// # Ok::<(), partial_render::core::RenderError>(())
/// ```
#[derive(Clone)]
pub struct PartialRenderer {
    context: Arc<RenderContext>,
    loader: Arc<dyn ResourceLoader>,
    composer: InvocationComposer,
}

impl std::fmt::Debug for PartialRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartialRenderer")
            .field("context", &self.context)
            .field("loader", &self.loader.describe())
            .field("composer", &self.composer)
            .finish()
    }
}

impl PartialRenderer {
    /// Create a renderer that loads partials through `loader` and renders in
    /// `context`.
    pub fn new(context: Arc<RenderContext>, loader: Arc<dyn ResourceLoader>) -> Self {
        let composer = InvocationComposer::new(Arc::clone(&loader))
            .with_registered_partials(context.registered_partials().iter().cloned());
        Self {
            context,
            composer,
            loader,
        }
    }

    /// Build the loader, engine, context and renderer `config` describes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ConfigError`] for invalid settings and
    /// [`RenderError::BootstrapFailed`] when the engine cannot be bootstrapped.
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        config.validate()?;

        let loader: Arc<dyn ResourceLoader> = Arc::new(
            FsLoader::new(&config.resource_root).with_max_file_size(config.max_resource_bytes),
        );
        let engine = Box::new(TeraHost::with_constructor(&config.view_constructor));
        let context = RenderContext::init(engine, loader.as_ref(), &config.bootstrap)?;

        let composer = InvocationComposer::from_config(config, Arc::clone(&loader))
            .with_registered_partials(context.registered_partials().iter().cloned());

        Ok(Self {
            context: Arc::new(context),
            composer,
            loader,
        })
    }

    /// Map partial names to paths with `resolver`.
    #[must_use]
    pub fn with_resolver(mut self, resolver: PartialPathResolver) -> Self {
        self.composer = self.composer.with_resolver(resolver);
        self
    }

    /// Also load partials referenced from inside partials.
    #[must_use]
    pub fn with_nested_partials(mut self, nested: bool) -> Self {
        self.composer = self.composer.with_nested_partials(nested);
        self
    }

    /// Call `constructor` instead of the default view constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: impl Into<String>) -> Self {
        self.composer = self.composer.with_constructor(constructor);
        self
    }

    /// The shared render context.
    pub fn context(&self) -> &Arc<RenderContext> {
        &self.context
    }

    /// The partials `template` references, with their resolved paths.
    pub fn partials_of(&self, template: &str) -> PartialSet {
        self.composer.partials_of(template)
    }

    /// Build the invocation for `template` and `data_payload` without submitting it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDataPayload`] if `data_payload` is not JSON,
    /// or the first error loading a referenced partial.
    pub fn prepare(&self, template: &str, data_payload: &str) -> Result<Invocation> {
        self.composer.compose_payload(template, data_payload)
    }

    /// Build the invocation for a structured request without submitting it.
    ///
    /// # Errors
    ///
    /// Returns the first error loading a referenced partial.
    pub fn prepare_request(&self, request: &RenderRequest) -> Result<Invocation> {
        self.composer.compose(request)
    }

    /// Load the raw text of resource `name`, typically a template.
    ///
    /// # Errors
    ///
    /// Propagates the loader error, [`RenderError::ResourceNotFound`] if absent.
    pub fn load_resource(&self, name: &str) -> Result<String> {
        self.loader.load(name)
    }

    /// Render `template` against the JSON text `data_payload`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidDataPayload`] if `data_payload` is not JSON
    /// - [`RenderError::ResourceNotFound`] if a referenced partial is missing
    /// - [`RenderError::RenderEngineError`] if the engine rejects either submission
    /// - [`RenderError::EnginePoisoned`] if an earlier render panicked mid-call
    pub fn render(&self, template: &str, data_payload: &str) -> Result<String> {
        let invocation = self.prepare(template, data_payload)?;
        self.submit(&invocation)
    }

    /// Render a structured request.
    ///
    /// # Errors
    ///
    /// As [`render`](Self::render), minus payload validation.
    pub fn render_request(&self, request: &RenderRequest) -> Result<String> {
        let invocation = self.prepare_request(request)?;
        self.submit(&invocation)
    }

    /// Load the template resource `name` and render it.
    ///
    /// # Errors
    ///
    /// [`RenderError::ResourceNotFound`] if the template itself is missing, then
    /// as [`render`](Self::render).
    pub fn render_resource(&self, name: &str, data_payload: &str) -> Result<String> {
        let template = self.load_resource(name)?;
        self.render(&template, data_payload)
    }

    /// Render on the blocking thread pool, failing if it takes longer than `timeout`.
    ///
    /// A render that times out keeps the engine until it finishes; renders
    /// queued behind it wait for that.
    ///
    /// # Errors
    ///
    /// [`RenderError::EngineTimeout`] when the deadline passes, otherwise as
    /// [`render`](Self::render).
    pub async fn render_with_timeout(
        &self,
        template: String,
        data_payload: String,
        timeout: Duration,
    ) -> Result<String> {
        let renderer = self.clone();
        let task = tokio::task::spawn_blocking(move || renderer.render(&template, &data_payload));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(RenderError::Other {
                message: format!("Render task failed: {join_error}"),
            }),
            Err(_) => {
                tracing::warn!("Render did not finish within {:?}", timeout);
                Err(RenderError::EngineTimeout {
                    after: timeout,
                })
            }
        }
    }

    /// Submit both scripts of `invocation` while holding the engine.
    fn submit(&self, invocation: &Invocation) -> Result<String> {
        let construct = invocation.construct_script();
        let render = invocation.render_script();
        tracing::debug!("Invocation: {}", construct);

        self.context.session(|engine| {
            engine.eval(&construct).map_err(|e| engine_failure(EngineStage::Construct, &e))?;
            engine
                .eval(&render)
                .map_err(|e| engine_failure(EngineStage::Render, &e))?
                .ok_or_else(|| RenderError::RenderEngineError {
                    stage: EngineStage::Render,
                    diagnostic: format!("{render} produced no value"),
                })
        })
    }
}

fn engine_failure(stage: EngineStage, error: &EngineError) -> RenderError {
    RenderError::RenderEngineError {
        stage,
        diagnostic: error.to_string(),
    }
}
