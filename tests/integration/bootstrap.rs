use partial_render::config::RenderConfig;
use partial_render::core::RenderError;
use partial_render::engine::{RenderContext, ScriptEngine, TeraHost};
use partial_render::loader::MemoryLoader;
use partial_render::templating::PartialRenderer;
use partial_render::test_utils::ResourceTree;

use super::site;

#[test]
fn test_missing_bootstrap_is_fatal() {
    let tree = ResourceTree::new();
    let err = PartialRenderer::from_config(&tree.config()).unwrap_err();

    match err {
        RenderError::BootstrapFailed {
            resource,
            reason,
        } => {
            assert_eq!(resource, "ractive.js");
            assert!(reason.contains("not found"), "reason: {reason}");
        }
        other => panic!("expected BootstrapFailed, got {other:?}"),
    }
}

#[test]
fn test_bootstrap_syntax_error_is_fatal() {
    let tree = ResourceTree::new().with_file("ractive.js", "var = ;");
    let err = PartialRenderer::from_config(&tree.config()).unwrap_err();

    match err {
        RenderError::BootstrapFailed {
            reason,
            ..
        } => assert!(reason.starts_with("SyntaxError"), "reason: {reason}"),
        other => panic!("expected BootstrapFailed, got {other:?}"),
    }
}

#[test]
fn test_bootstrap_registers_global_partials() {
    let tree = ResourceTree::new()
        .with_file("ractive.js", "// signature shared by every page\nRactive.partials.sig = '<em>{{ author }}</em>';\n")
        .with_file("header.html", "<h1>{{> sig}}</h1>");

    let html = PartialRenderer::from_config(&tree.config())
        .unwrap()
        .render("{{> header}}", r#"{"author":"Ann"}"#)
        .unwrap();
    assert_eq!(html, "<h1><em>Ann</em></h1>");
}

#[test]
fn test_nested_render_reaches_global_partial() {
    let tree = ResourceTree::new()
        .with_file("ractive.js", "Ractive.partials.copyright = '(c) {{ site }}';")
        .with_file("footer/links.html", "<a>Home</a>{{> copyright}}");
    let config = RenderConfig {
        nested_partials: true,
        ..tree.config()
    };

    let renderer = PartialRenderer::from_config(&config).unwrap();
    let invocation = renderer.prepare("{{> footer_links}}", "{}").unwrap();
    assert_eq!(invocation.partials_fragment(), "footer_links: '<a>Home</a>{{> copyright}}'");

    let html = renderer.render("{{> footer_links}}", r#"{"site":"Docs"}"#).unwrap();
    assert_eq!(html, "<a>Home</a>(c) Docs");
}

#[test]
fn test_loaded_partial_overrides_global() {
    let tree = ResourceTree::new()
        .with_file("ractive.js", "Ractive.partials.sig = 'global';")
        .with_file("sig.html", "local");

    let html = PartialRenderer::from_config(&tree.config()).unwrap().render("{{> sig}}", "{}").unwrap();
    assert_eq!(html, "local");
}

#[test]
fn test_custom_view_constructor() {
    let tree = ResourceTree::new().with_file("boot.js", "View.partials.note = 'n';");
    let config = RenderConfig {
        bootstrap: "boot.js".to_string(),
        view_constructor: "View".to_string(),
        ..tree.config()
    };
    let renderer = PartialRenderer::from_config(&config).unwrap();

    let invocation = renderer.prepare("x", "{}").unwrap();
    assert!(invocation.construct_script().starts_with("var ractive = new View({"));
    assert_eq!(renderer.render("x", "{}").unwrap(), "x");
    assert_eq!(renderer.context().bootstrap_resource(), "boot.js");
}

#[test]
fn test_bootstrap_for_other_constructor_fails() {
    let tree = site();
    let config = RenderConfig {
        view_constructor: "View".to_string(),
        ..tree.config()
    };
    std::fs::write(tree.path().join("ractive.js"), "Ractive.partials.a = 'x';").unwrap();

    let err = PartialRenderer::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("ReferenceError: Ractive is not defined"), "got {err}");
}

#[test]
fn test_invalid_config_rejected_before_bootstrap() {
    let tree = ResourceTree::new();
    let config = RenderConfig {
        namespace_separator: '_',
        ..tree.config()
    };
    let err = PartialRenderer::from_config(&config).unwrap_err();
    assert!(matches!(err, RenderError::ConfigError { .. }), "got {err:?}");
}

#[test]
fn test_teardown_returns_engine() {
    let loader = MemoryLoader::new().with("ractive.js", "Ractive.partials.a = 'x';");
    let context = RenderContext::init(Box::new(TeraHost::new()), &loader, "ractive.js").unwrap();

    let engine = context.teardown().unwrap();
    assert_eq!(engine.name(), "tera");
}
