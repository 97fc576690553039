//! Invocation composition.
//!
//! An [`Invocation`] is the pair of scripts submitted to the engine for one
//! render: a construction call that binds template, data and partials to a view,
//! and a render call that asks the view for its HTML.
//!
//! ```text
//! var ractive = new Ractive({ template: '...', data: JSON.parse('...'), partials: {a: '...'} })
//! ractive.toHtml()
//! ```
//!
//! All three payloads are stored already encoded, so assembling the scripts is
//! plain concatenation.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::encoder::escape_literal;
use crate::constants::{DEFAULT_VIEW_CONSTRUCTOR, VIEW_BINDING};

/// A structured render request: the inputs of one invocation before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Raw template text
    pub template: String,
    /// Parsed data the template is rendered against
    pub data: Value,
    /// Partials supplied inline, raw content keyed by name
    ///
    /// A name given here is not loaded, even when the template references it.
    pub inline_partials: BTreeMap<String, String>,
}

impl RenderRequest {
    /// Request rendering `template` against `data`.
    pub fn new(template: impl Into<String>, data: Value) -> Self {
        Self {
            template: template.into(),
            data,
            inline_partials: BTreeMap::new(),
        }
    }

    /// Supply the content of partial `name` directly.
    #[must_use]
    pub fn with_partial(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.inline_partials.insert(name.into(), content.into());
        self
    }
}

/// The encoded pieces of one render, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    constructor: String,
    binding: String,
    template: String,
    data: String,
    partials: String,
}

impl Invocation {
    /// Build an invocation from already-encoded parts.
    ///
    /// `encoded_template` must come from [`encode`](super::encoder::encode), `partials_fragment` from
    /// [`fragment`](super::assembler::fragment).
    pub fn new(
        encoded_template: impl Into<String>,
        data: &Value,
        partials_fragment: impl Into<String>,
    ) -> Self {
        Self {
            constructor: DEFAULT_VIEW_CONSTRUCTOR.to_string(),
            binding: VIEW_BINDING.to_string(),
            template: encoded_template.into(),
            data: encode_data(data),
            partials: partials_fragment.into(),
        }
    }

    /// Use `constructor` instead of the default view constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: impl Into<String>) -> Self {
        self.constructor = constructor.into();
        self
    }

    /// Bind the view to `binding` instead of the default variable.
    #[must_use]
    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    /// The encoded template literal body.
    pub fn encoded_template(&self) -> &str {
        &self.template
    }

    /// The encoded data literal body.
    pub fn encoded_data(&self) -> &str {
        &self.data
    }

    /// The body of the partials mapping literal.
    pub fn partials_fragment(&self) -> &str {
        &self.partials
    }

    /// The construction call.
    pub fn construct_script(&self) -> String {
        format!(
            "var {} = new {}({{ template: '{}', data: JSON.parse('{}'), partials: {{{}}} }})",
            self.binding, self.constructor, self.template, self.data, self.partials
        )
    }

    /// The call that produces the rendered text.
    pub fn render_script(&self) -> String {
        format!("{}.toHtml()", self.binding)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{};", self.construct_script())?;
        write!(f, "{};", self.render_script())
    }
}

/// Serialize `data` compactly and escape it for a `JSON.parse('...')` literal.
fn encode_data(data: &Value) -> String {
    escape_literal(&data.to_string())
}
