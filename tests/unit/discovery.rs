use std::sync::Arc;

use partial_render::loader::MemoryLoader;
use partial_render::templating::{
    PartialAssembler, PartialPathResolver, PartialScanner, PartialSet, encode, resolve_partial_path,
    scan_partials,
};

use super::CORPUS;

#[test]
fn test_marker_name_resolves_through_resolver() {
    for surrounding in CORPUS {
        let template = format!("{surrounding}{{{{> foo_bar}}}}{surrounding}");
        let partials = scan_partials(&encode(&template));
        assert_eq!(partials.path_of("foo_bar"), Some("foo/bar.html"), "in {template:?}");
    }
}

#[test]
fn test_templates_without_markers_scan_empty() {
    for raw in CORPUS.iter().filter(|raw| !raw.contains("{{>")) {
        assert!(scan_partials(&encode(raw)).is_empty(), "markers found in {raw:?}");
    }
}

#[test]
fn test_duplicates_collapse() {
    let partials = scan_partials("{{> nav}} {{> nav}} {{>nav}} {{> nav }}");
    assert_eq!(partials.len(), 1);
}

#[test]
fn test_scan_before_and_after_encoding_agree() {
    let raw = "it's {{> header}}\n<p class=\"x\">{{> footer_links}}</p> \\ {{>nav}}";
    assert_eq!(scan_partials(raw), scan_partials(&encode(raw)));
}

#[test]
fn test_resolve_is_total() {
    assert_eq!(resolve_partial_path("a_b_c"), "a/b/c.html");
    assert_eq!(resolve_partial_path(""), ".html");
    assert_eq!(resolve_partial_path("___"), "///.html");
}

#[test]
fn test_custom_resolver() {
    let scanner = PartialScanner::new(PartialPathResolver::new('-', ".mustache"));
    let partials = scanner.scan("{{> footer_links}}");
    assert_eq!(partials.path_of("footer_links"), Some("footer-links.mustache"));
}

#[test]
fn test_assemble_empty_set() {
    let assembler = PartialAssembler::new(Arc::new(MemoryLoader::new()));
    assert_eq!(assembler.assemble(&PartialSet::new()).unwrap(), "");
}

#[test]
fn test_assemble_every_name_once() {
    let loader = MemoryLoader::new()
        .with("header.html", "<h1>it's</h1>")
        .with("footer/links.html", "<a>\n</a>");
    let assembler = PartialAssembler::new(Arc::new(loader));

    let fragment =
        assembler.assemble(&scan_partials("{{> header}}{{> footer_links}}{{> header}}")).unwrap();
    assert_eq!(fragment, "footer_links: '<a></a>', header: '<h1>it\\'s</h1>'");
}
