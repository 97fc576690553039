use partial_render::config::RenderConfig;
use partial_render::core::{EngineStage, RenderError};
use partial_render::templating::{PartialRenderer, RenderRequest};
use serde_json::json;

use super::{renderer, site};

#[test]
fn test_render_data_without_partials() {
    let tree = site();
    let html = renderer(&tree).render("Hello {{name}}", r#"{"name":"World"}"#).unwrap();
    assert_eq!(html, "Hello World");
}

#[test]
fn test_render_with_partial() {
    let tree = site().with_file("header.html", "<h1>Hi</h1>");
    let renderer = renderer(&tree);

    let invocation = renderer.prepare("{{> header}}Body", "{}").unwrap();
    assert_eq!(invocation.partials_fragment(), "header: '<h1>Hi</h1>'");
    assert!(invocation.construct_script().contains("partials: {header: '<h1>Hi</h1>'}"));

    assert_eq!(renderer.render("{{> header}}Body", "{}").unwrap(), "<h1>Hi</h1>Body");
}

#[test]
fn test_missing_partial_aborts_render() {
    let tree = site().with_file("header.html", "<h1>Hi</h1>");
    let err = renderer(&tree).render("{{> header}}{{> missing_section}}", "{}").unwrap_err();

    match err {
        RenderError::ResourceNotFound {
            name,
            ..
        } => assert_eq!(name, "missing/section.html"),
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_quote_and_backslash_in_template() {
    let tree = site();
    let renderer = renderer(&tree);
    let template = r"It's a \ test";

    let invocation = renderer.prepare(template, "{}").unwrap();
    assert_eq!(invocation.encoded_template(), r"It\'s a \\ test");

    assert_eq!(renderer.render(template, "{}").unwrap(), template);
}

#[test]
fn test_hostile_partial_content_stays_inert() {
    let tree = site().with_file("evil.html", "'); Ractive.partials.x = ('<b>");
    let html = renderer(&tree).render("[{{> evil}}]", "{}").unwrap();
    assert_eq!(html, "['); Ractive.partials.x = ('<b>]");
}

#[test]
fn test_multiline_template_is_flattened() {
    let tree = site().with_file("footer/links.html", "<ul>\n  <li>Home</li>\n</ul>\n");
    let html = renderer(&tree).render("<main>\n{{> footer_links}}\n</main>", "{}").unwrap();
    assert_eq!(html, "<main><ul>  <li>Home</li></ul></main>");
}

#[test]
fn test_data_is_html_escaped() {
    let tree = site();
    let html = renderer(&tree).render("<p>{{ v }}</p>", r#"{"v":"<script>"}"#).unwrap();
    assert_eq!(html, "<p>&lt;script&gt;</p>");
}

#[test]
fn test_quotes_in_data_survive() {
    let tree = site();
    let html = renderer(&tree).render("{{ a }}|{{ b }}", r#"{"a":"it's","b":"back\\slash"}"#).unwrap();
    assert_eq!(html, r"it&#x27;s|back\slash");
}

#[test]
fn test_invalid_data_payload() {
    let tree = site();
    let err = renderer(&tree).render("Hello", "{not json").unwrap_err();
    assert!(matches!(err, RenderError::InvalidDataPayload { .. }), "got {err:?}");
}

#[test]
fn test_non_object_data_is_an_engine_error() {
    let tree = site();
    let err = renderer(&tree).render("Hello", "[1, 2]").unwrap_err();
    assert!(
        matches!(err, RenderError::RenderEngineError { stage: EngineStage::Construct, .. }),
        "got {err:?}"
    );
}

#[test]
fn test_undefined_variable_is_a_render_error() {
    let tree = site();
    let err = renderer(&tree).render("{{ nope }}", "{}").unwrap_err();
    match err {
        RenderError::RenderEngineError {
            stage,
            diagnostic,
        } => {
            assert_eq!(stage, EngineStage::Render);
            assert!(diagnostic.contains("nope"), "diagnostic: {diagnostic}");
        }
        other => panic!("expected RenderEngineError, got {other:?}"),
    }
}

#[test]
fn test_partials_are_reloaded_every_render() {
    let tree = site().with_file("header.html", "v1");
    let renderer = renderer(&tree);
    assert_eq!(renderer.render("{{> header}}", "{}").unwrap(), "v1");

    std::fs::write(tree.path().join("header.html"), "v2").unwrap();
    assert_eq!(renderer.render("{{> header}}", "{}").unwrap(), "v2");
}

#[test]
fn test_render_resource() {
    let tree = site()
        .with_file("pages/home.html", "{{> header}}<p>{{ body }}</p>")
        .with_file("header.html", "<h1>{{ title }}</h1>");
    let html = renderer(&tree)
        .render_resource("pages/home.html", r#"{"title":"Home","body":"Welcome"}"#)
        .unwrap();
    assert_eq!(html, "<h1>Home</h1><p>Welcome</p>");
}

#[test]
fn test_nested_partials_need_opt_in() {
    let tree = site()
        .with_file("layout.html", "<main>{{> nav}}</main>")
        .with_file("nav.html", "<nav>{{> layout}}</nav>")
        .with_file("page.html", "{{> layout}}");

    let err = renderer(&tree).render_resource("page.html", "{}").unwrap_err();
    assert!(matches!(err, RenderError::RenderEngineError { stage: EngineStage::Render, .. }));

    let config = RenderConfig {
        nested_partials: true,
        ..tree.config()
    };
    let renderer = PartialRenderer::from_config(&config).unwrap();
    let invocation = renderer.prepare("{{> layout}}", "{}").unwrap();
    assert_eq!(
        invocation.partials_fragment(),
        "layout: '<main>{{> nav}}</main>', nav: '<nav>{{> layout}}</nav>'"
    );
}

#[test]
fn test_nested_partials_render() {
    let tree = site()
        .with_file("layout.html", "<main>{{> nav_main}}</main>")
        .with_file("nav/main.html", "<nav>{{ site }}</nav>");
    let config = RenderConfig {
        nested_partials: true,
        ..tree.config()
    };

    let html = PartialRenderer::from_config(&config)
        .unwrap()
        .render("{{> layout}}", r#"{"site":"Docs"}"#)
        .unwrap();
    assert_eq!(html, "<main><nav>Docs</nav></main>");
}

#[test]
fn test_render_request_with_inline_partial() {
    let tree = site().with_file("header.html", "from disk");
    let request = RenderRequest::new("{{> header}}|{{> aside}}", json!({"n": 1}))
        .with_partial("header", "inline {{ n }}")
        .with_partial("aside", "side");

    let html = renderer(&tree).render_request(&request).unwrap();
    assert_eq!(html, "inline 1|side");
}

#[test]
fn test_custom_separator_and_extension() {
    let tree = site().with_file("footer-links.mustache", "links");
    let config = RenderConfig {
        namespace_separator: '-',
        partial_extension: ".mustache".to_string(),
        ..tree.config()
    };

    let html = PartialRenderer::from_config(&config).unwrap().render("{{> footer_links}}", "{}").unwrap();
    assert_eq!(html, "links");
}

#[test]
fn test_self_including_partial_fails_cleanly() {
    let tree = site().with_file("a.html", "x{{> a}}");
    let err = renderer(&tree).render("{{> a}}", "{}").unwrap_err();
    match err {
        RenderError::RenderEngineError {
            stage,
            diagnostic,
        } => {
            assert_eq!(stage, EngineStage::Render);
            assert!(diagnostic.contains("cycle"), "diagnostic: {diagnostic}");
        }
        other => panic!("expected RenderEngineError, got {other:?}"),
    }
}

#[test]
fn test_mutually_including_partials_fail_cleanly() {
    let tree = site()
        .with_file("layout.html", "<main>{{> nav}}</main>")
        .with_file("nav.html", "<nav>{{> layout}}</nav>");
    let config = RenderConfig {
        nested_partials: true,
        ..tree.config()
    };

    let err = PartialRenderer::from_config(&config).unwrap().render("{{> layout}}", "{}").unwrap_err();
    assert!(matches!(
        err,
        RenderError::RenderEngineError { stage: EngineStage::Render, ref diagnostic }
            if diagnostic.contains("layout -> nav -> layout")
    ));
}
