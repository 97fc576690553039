//! Template and partial handling.
//!
//! This module turns a template, a data payload and the partials the template
//! references into the pair of scripts that render them, and submits those
//! scripts to the shared engine.
//!
//! # Pipeline
//!
//! ```text
//! template ──encode──▶ encoded template ──scan──▶ partial set
//!                                                     │
//!                                   loader ◀──resolve─┘
//!                                     │
//!                          partials ──encode──▶ fragment
//!                                                  │
//! data ──validate──▶ JSON ──────────────▶ Invocation ──▶ engine ──▶ HTML
//! ```
//!
//! # Partial Markers
//!
//! A partial is referenced with `{{> name}}`, one optional space allowed on each
//! side of the name. Names use `[A-Za-z0-9_./]`; every `_` maps to a directory
//! separator, so `{{> footer_links}}` loads `footer/links.html`.
//!
//! # Modules
//!
//! - [`encoder`] - escaping text for single-quoted literals
//! - [`scanner`] - finding markers and building the partial set
//! - [`resolver`] - partial name to resource path mapping
//! - [`assembler`] - loading partials and serializing the mapping literal
//! - [`invocation`] - the construction and render scripts
//! - [`composer`] - building an invocation from raw inputs
//! - [`renderer`] - the orchestrator, [`PartialRenderer`]

pub mod assembler;
pub mod composer;
pub mod encoder;
pub mod invocation;
pub mod renderer;
pub mod resolver;
pub mod scanner;

pub use assembler::{Partial, PartialAssembler, fragment};
pub use composer::{InvocationComposer, parse_data_payload};
pub use encoder::{encode, escape_literal, strip_newlines};
pub use invocation::{Invocation, RenderRequest};
pub use renderer::PartialRenderer;
pub use resolver::{PartialPathResolver, resolve_partial_path};
pub use scanner::{PartialScanner, PartialSet, replace_markers, scan_partials};
