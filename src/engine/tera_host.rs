//! Tera-backed script engine.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value as Json};
use tera::{Context, Tera};

use super::parser::{self, Expr, Statement, Value};
use super::{EngineError, ScriptEngine};
use crate::constants::DEFAULT_VIEW_CONSTRUCTOR;
use crate::templating::scanner::replace_markers;

/// Name the root template of a view is registered under.
///
/// The `.html` suffix turns on Tera's autoescaping, as does the suffix given to
/// every partial.
const ROOT_TEMPLATE: &str = "__view__.html";

/// Longest chain of partials including one another that a render accepts.
const MAX_INCLUDE_DEPTH: usize = 64;

/// A constructed view: template, data and view-local partials.
#[derive(Debug, Clone, PartialEq)]
struct View {
    template: String,
    data: Json,
    partials: BTreeMap<String, String>,
}

/// What evaluating an expression produced.
enum Outcome {
    View(View),
    Text(String),
    Undefined,
}

/// Script engine that renders views with Tera.
///
/// Understands the statement forms a render needs:
///
/// - `var ractive = new Ractive({ template: '...', data: JSON.parse('...'), partials: {...} })`
///   constructs a view and binds it
/// - `ractive.toHtml()` renders a bound view
/// - `Ractive.partials.name = '...'` registers a partial for every view,
///   typically from the bootstrap script
///
/// Partial markers `{{> name}}` in templates and partials become Tera includes.
/// A partial that includes itself, directly or through other partials, fails
/// the render with a template error, as does a chain of includes deeper than
/// 64 partials. Partials passed to a view take precedence over registered ones with the same
/// name. Everything else in a template is Tera syntax, so `{{ name }}` prints
/// HTML-escaped data.
///
/// # Examples
///
/// ```rust
/// use partial_render::engine::{ScriptEngine, TeraHost};
///
/// let mut host = TeraHost::new();
/// host.eval("var v = new Ractive({ template: 'Hi {{name}}', data: JSON.parse('{\"name\":\"Bo\"}') })")?;
/// assert_eq!(host.eval("v.toHtml()")?.as_deref(), Some("Hi Bo"));
/// # Ok::<(), partial_render::engine::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TeraHost {
    constructor: String,
    globals: BTreeMap<String, String>,
    views: HashMap<String, View>,
}

impl Default for TeraHost {
    fn default() -> Self {
        Self::with_constructor(DEFAULT_VIEW_CONSTRUCTOR)
    }
}

impl TeraHost {
    /// Create a host that exposes the default view constructor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host whose view constructor is called `constructor`.
    pub fn with_constructor(constructor: impl Into<String>) -> Self {
        Self {
            constructor: constructor.into(),
            globals: BTreeMap::new(),
            views: HashMap::new(),
        }
    }

    fn execute(&mut self, statement: Statement) -> Result<Option<String>, EngineError> {
        match statement {
            Statement::Declare {
                binding,
                init,
            } => {
                if let Outcome::View(view) = self.evaluate(init)? {
                    self.views.insert(binding, view);
                }
                Ok(None)
            }
            Statement::Expr(expr) => match self.evaluate(expr)? {
                Outcome::Text(text) => Ok(Some(text)),
                Outcome::View(_) | Outcome::Undefined => Ok(None),
            },
        }
    }

    fn evaluate(&mut self, expr: Expr) -> Result<Outcome, EngineError> {
        match expr {
            Expr::New {
                constructor,
                options,
            } => {
                self.check_constructor(&constructor)?;
                Ok(Outcome::View(build_view(options)?))
            }
            Expr::Call {
                target,
                method,
            } => {
                let view = self.views.get(&target).ok_or_else(|| EngineError::Reference {
                    name: target.clone(),
                })?;
                match method.as_str() {
                    "toHtml" => Ok(Outcome::Text(self.render(view)?)),
                    _ => Err(EngineError::Type {
                        message: format!("{target}.{method} is not a function"),
                    }),
                }
            }
            Expr::RegisterPartial {
                constructor,
                name,
                content,
            } => {
                self.check_constructor(&constructor)?;
                tracing::debug!("Registered global partial '{}'", name);
                self.globals.insert(name, content);
                Ok(Outcome::Undefined)
            }
        }
    }

    fn check_constructor(&self, name: &str) -> Result<(), EngineError> {
        if name == self.constructor {
            Ok(())
        } else {
            Err(EngineError::Reference {
                name: name.to_string(),
            })
        }
    }

    fn render(&self, view: &View) -> Result<String, EngineError> {
        let mut sources = self.globals.clone();
        sources.extend(view.partials.iter().map(|(name, body)| (name.clone(), body.clone())));
        check_includes(&view.template, &sources)?;

        let mut templates: Vec<(String, String)> =
            sources.iter().map(|(name, body)| (template_name(name), to_tera(body))).collect();
        templates.push((ROOT_TEMPLATE.to_string(), to_tera(&view.template)));

        let mut tera = Tera::default();
        tera.add_raw_templates(templates).map_err(|e| template_error(&e))?;

        let context = Context::from_value(view.data.clone()).map_err(|e| template_error(&e))?;
        tera.render(ROOT_TEMPLATE, &context).map_err(|e| template_error(&e))
    }
}

impl ScriptEngine for TeraHost {
    fn eval(&mut self, script: &str) -> Result<Option<String>, EngineError> {
        let mut last = None;
        for statement in parser::parse(script)? {
            last = self.execute(statement)?;
        }
        Ok(last)
    }

    fn name(&self) -> &str {
        "tera"
    }

    fn registered_partials(&self) -> Vec<String> {
        self.globals.keys().cloned().collect()
    }
}

fn build_view(options: Vec<(String, Value)>) -> Result<View, EngineError> {
    let mut view = View {
        template: String::new(),
        data: Json::Object(Map::new()),
        partials: BTreeMap::new(),
    };

    for (key, value) in options {
        match key.as_str() {
            "template" => view.template = expect_str(&key, value)?,
            "data" => view.data = to_json(value)?,
            "partials" => {
                let Value::Object(entries) = value else {
                    return Err(type_error("partials must be an object"));
                };
                for (name, body) in entries {
                    let body = expect_str(&name, body)?;
                    view.partials.insert(name, body);
                }
            }
            // Options the view does not use are accepted and ignored
            _ => {}
        }
    }

    if !view.data.is_object() {
        return Err(type_error("data must be an object"));
    }
    Ok(view)
}

fn expect_str(key: &str, value: Value) -> Result<String, EngineError> {
    match value {
        Value::Str(text) => Ok(text),
        _ => Err(type_error(format!("{key} must be a string"))),
    }
}

fn to_json(value: Value) -> Result<Json, EngineError> {
    match value {
        Value::Str(text) => Ok(Json::String(text)),
        Value::JsonParse(text) => serde_json::from_str(&text).map_err(|e| EngineError::Syntax {
            message: format!("JSON.parse: {e}"),
            offset: 0,
        }),
        Value::Object(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key, to_json(value)?);
            }
            Ok(Json::Object(map))
        }
    }
}

fn type_error(message: impl Into<String>) -> EngineError {
    EngineError::Type {
        message: message.into(),
    }
}

fn template_name(partial: &str) -> String {
    format!("{partial}.html")
}

/// Rewrite partial markers as Tera includes.
fn to_tera(source: &str) -> String {
    replace_markers(source, |name| format!("{{% include \"{}\" %}}", template_name(name)))
}

/// Names of the partials `body` includes, in order of appearance.
fn included_partials(body: &str) -> Vec<String> {
    let mut names = Vec::new();
    replace_markers(body, |name| {
        names.push(name.to_string());
        String::new()
    });
    names
}

/// Reject include cycles and include chains deeper than [`MAX_INCLUDE_DEPTH`]
/// before Tera follows them.
fn check_includes(template: &str, sources: &BTreeMap<String, String>) -> Result<(), EngineError> {
    let mut chain = Vec::new();
    let mut heights = HashMap::new();
    for name in included_partials(template) {
        include_height(&name, sources, &mut chain, &mut heights)?;
    }
    Ok(())
}

/// Length of the longest include chain starting at `name`, `name` included.
///
/// `chain` holds the partials currently being expanded. Names without a source
/// count as zero; Tera reports them when rendering.
fn include_height(
    name: &str,
    sources: &BTreeMap<String, String>,
    chain: &mut Vec<String>,
    heights: &mut HashMap<String, usize>,
) -> Result<usize, EngineError> {
    let height = match heights.get(name).copied() {
        Some(height) => height,
        None => {
            let Some(body) = sources.get(name) else {
                return Ok(0);
            };
            if chain.iter().any(|entry| entry == name) {
                chain.push(name.to_string());
                return Err(EngineError::Template {
                    message: format!("partial cycle: template -> {}", chain.join(" -> ")),
                });
            }
            if chain.len() >= MAX_INCLUDE_DEPTH {
                return Err(too_deep());
            }

            chain.push(name.to_string());
            let mut deepest = 0;
            for child in included_partials(body) {
                deepest = deepest.max(include_height(&child, sources, chain, heights)?);
            }
            chain.pop();

            heights.insert(name.to_string(), deepest + 1);
            deepest + 1
        }
    };

    if chain.len() + height > MAX_INCLUDE_DEPTH {
        return Err(too_deep());
    }
    Ok(height)
}

fn too_deep() -> EngineError {
    EngineError::Template {
        message: format!("partial includes nest deeper than {MAX_INCLUDE_DEPTH} levels"),
    }
}

/// Flatten a Tera error and its causes into one message.
fn template_error(error: &tera::Error) -> EngineError {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    EngineError::Template {
        message: message.replace(ROOT_TEMPLATE, "template"),
    }
}
