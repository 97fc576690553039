//! Invocation composition from raw inputs.

use std::sync::Arc;

use super::assembler::{PartialAssembler, fragment};
use super::encoder::encode;
use super::invocation::{Invocation, RenderRequest};
use super::resolver::PartialPathResolver;
use super::scanner::{PartialScanner, PartialSet};
use crate::config::RenderConfig;
use crate::constants::{DEFAULT_VIEW_CONSTRUCTOR, VIEW_BINDING};
use crate::core::{RenderError, Result};
use crate::loader::ResourceLoader;

/// Builds [`Invocation`]s: encodes the template, discovers and loads its
/// partials, and serializes everything into the two scripts.
///
/// Composing never touches an engine, so it also serves to inspect what a
/// render would submit.
#[derive(Debug, Clone)]
pub struct InvocationComposer {
    scanner: PartialScanner,
    assembler: PartialAssembler,
    constructor: String,
}

impl InvocationComposer {
    /// Create a composer that loads partials through `loader`.
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            scanner: PartialScanner::default(),
            assembler: PartialAssembler::new(loader),
            constructor: DEFAULT_VIEW_CONSTRUCTOR.to_string(),
        }
    }

    /// Create a composer with the resolver, nesting and constructor of `config`.
    pub fn from_config(config: &RenderConfig, loader: Arc<dyn ResourceLoader>) -> Self {
        Self::new(loader)
            .with_resolver(config.resolver())
            .with_nested_partials(config.nested_partials)
            .with_constructor(&config.view_constructor)
    }

    /// Map partial names to paths with `resolver`.
    #[must_use]
    pub fn with_resolver(mut self, resolver: PartialPathResolver) -> Self {
        self.scanner = PartialScanner::new(resolver);
        self.assembler = self.assembler.with_scanner(self.scanner.clone());
        self
    }

    /// Also load partials referenced from inside partials.
    #[must_use]
    pub fn with_nested_partials(mut self, nested: bool) -> Self {
        self.assembler = self.assembler.with_nested(nested);
        self
    }

    /// Partials the engine already knows, see [`PartialAssembler::with_registered`].
    #[must_use]
    pub fn with_registered_partials(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.assembler = self.assembler.with_registered(names);
        self
    }

    /// Call `constructor` instead of the default view constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: impl Into<String>) -> Self {
        self.constructor = constructor.into();
        self
    }

    /// The partials `template` references directly, with their resolved paths.
    pub fn partials_of(&self, template: &str) -> PartialSet {
        self.scanner.scan(&encode(template))
    }

    /// Compose the invocation for `template` against the JSON text `data_payload`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDataPayload`] if `data_payload` is not JSON,
    /// or the first error loading a referenced partial.
    pub fn compose_payload(&self, template: &str, data_payload: &str) -> Result<Invocation> {
        let data = parse_data_payload(data_payload)?;
        self.compose(&RenderRequest::new(template, data))
    }

    /// Compose the invocation for a structured request.
    ///
    /// # Errors
    ///
    /// Returns the first error loading a referenced partial.
    pub fn compose(&self, request: &RenderRequest) -> Result<Invocation> {
        let encoded_template = encode(&request.template);
        let partials = self.scanner.scan(&encoded_template);
        let loaded = self.assembler.load_with(&partials, &request.inline_partials)?;

        Ok(Invocation::new(encoded_template, &request.data, fragment(&loaded))
            .with_constructor(&self.constructor)
            .with_binding(VIEW_BINDING))
    }
}

/// Parse a JSON data payload.
///
/// # Errors
///
/// Returns [`RenderError::InvalidDataPayload`] with the parser message.
pub fn parse_data_payload(payload: &str) -> Result<serde_json::Value> {
    serde_json::from_str(payload).map_err(|e| RenderError::InvalidDataPayload {
        reason: e.to_string(),
    })
}
