use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use partial_render::core::{EngineStage, RenderError};
use partial_render::engine::{EngineError, RenderContext};
use partial_render::loader::{MemoryLoader, ResourceLoader};
use partial_render::templating::PartialRenderer;
use partial_render::test_utils::RecordingEngine;

use super::{renderer, site};

fn recording_renderer(engine: &RecordingEngine) -> PartialRenderer {
    let loader: Arc<dyn ResourceLoader> =
        Arc::new(MemoryLoader::new().with("ractive.js", "// library"));
    let context =
        RenderContext::init(Box::new(engine.clone()), loader.as_ref(), "ractive.js").unwrap();
    PartialRenderer::new(Arc::new(context), loader)
}

#[test]
fn test_bootstrap_runs_once() {
    let engine = RecordingEngine::new();
    let renderer = recording_renderer(&engine);

    renderer.render("a", "{}").unwrap();
    renderer.render("b", "{}").unwrap();

    let scripts = engine.scripts();
    assert_eq!(scripts.len(), 5);
    assert_eq!(scripts[0], "// library");
    assert_eq!(scripts.iter().filter(|s| s.as_str() == "// library").count(), 1);
}

#[test]
fn test_construct_and_render_are_never_interleaved() {
    let engine = RecordingEngine::new().with_delay(Duration::from_millis(2));
    let renderer = recording_renderer(&engine);

    let outputs: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let renderer = renderer.clone();
                scope.spawn(move || {
                    (0..3)
                        .map(|j| renderer.render(&format!("t{i}-{j}"), "{}").unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    assert!(!engine.overlapped(), "two evaluations ran at once");

    let scripts = engine.scripts();
    assert_eq!(scripts.len(), 1 + 2 * 24);
    for pair in scripts[1..].chunks(2) {
        assert!(pair[0].starts_with("var ractive = new Ractive({ template: 't"), "{pair:?}");
        assert_eq!(pair[1], "ractive.toHtml()");
    }

    let distinct: HashSet<&String> = outputs.iter().collect();
    assert_eq!(distinct.len(), 24);
}

#[test]
fn test_shared_engine_keeps_renders_apart() {
    let tree = site().with_file("row.html", "<td>{{ n }}</td>");
    let renderer = renderer(&tree);

    thread::scope(|scope| {
        for i in 0..6 {
            let renderer = renderer.clone();
            scope.spawn(move || {
                for _ in 0..10 {
                    let html = renderer.render("{{> row}}", &format!(r#"{{"n":{i}}}"#)).unwrap();
                    assert_eq!(html, format!("<td>{i}</td>"));
                }
            });
        }
    });
}

#[test]
fn test_engine_failure_carries_diagnostic() {
    let engine = RecordingEngine::new().failing_on("toHtml", EngineError::Template {
        message: "boom".to_string(),
    });
    let err = recording_renderer(&engine).render("x", "{}").unwrap_err();

    match err {
        RenderError::RenderEngineError {
            stage,
            diagnostic,
        } => {
            assert_eq!(stage, EngineStage::Render);
            assert_eq!(diagnostic, "TemplateError: boom");
        }
        other => panic!("expected RenderEngineError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_render_timeout() {
    let engine = RecordingEngine::new().with_delay(Duration::from_millis(300));
    let renderer = recording_renderer(&engine);

    let err = renderer
        .render_with_timeout("slow".to_string(), "{}".to_string(), Duration::from_millis(20))
        .await
        .unwrap_err();

    match err {
        RenderError::EngineTimeout {
            after,
        } => assert_eq!(after, Duration::from_millis(20)),
        other => panic!("expected EngineTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_render_within_timeout() {
    let tree = site().with_file("header.html", "<h1>{{ t }}</h1>");
    let html = renderer(&tree)
        .render_with_timeout("{{> header}}".to_string(), r#"{"t":"ok"}"#.to_string(), Duration::from_secs(10))
        .await
        .unwrap();
    assert_eq!(html, "<h1>ok</h1>");
}
