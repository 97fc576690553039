use assert_cmd::Command;
use partial_render::test_utils::ResourceTree;
use predicates::prelude::*;

use super::site;

/// `prender --quiet` isolated from the user's configuration.
fn prender(tree: &ResourceTree) -> Command {
    let mut cmd = Command::cargo_bin("prender").unwrap();
    cmd.current_dir(tree.path())
        .env("HOME", tree.path())
        .env_remove("PARTIAL_RENDER_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--quiet");
    cmd
}

fn page_site() -> ResourceTree {
    site()
        .with_file("page.html", "{{> header}}<p>Body</p>\n")
        .with_file("header.html", "<h1>{{ title }}</h1>")
}

#[test]
fn test_render_to_stdout() {
    let tree = page_site();
    prender(&tree)
        .args(["render", "page.html", "--json", r#"{"title":"Home"}"#])
        .assert()
        .success()
        .stdout("<h1>Home</h1><p>Body</p>\n");
}

#[test]
fn test_render_data_file_to_output() {
    let tree = page_site().with_file("data.json", r#"{"title":"From file"}"#);
    prender(&tree)
        .args(["render", "page.html", "--data", "data.json", "--output", "out/page.html"])
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(tree.path().join("out/page.html")).unwrap();
    assert_eq!(written, "<h1>From file</h1><p>Body</p>");
}

#[test]
fn test_render_data_from_stdin() {
    let tree = page_site();
    prender(&tree)
        .args(["render", "page.html", "--data", "-"])
        .write_stdin(r#"{"title":"Piped"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Piped</h1>"));
}

#[test]
fn test_render_missing_partial_fails() {
    let tree = site().with_file("page.html", "{{> missing_section}}");
    prender(&tree)
        .args(["render", "page.html"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Resource not found: missing/section.html"));
}

#[test]
fn test_render_invalid_payload_fails() {
    let tree = page_site();
    prender(&tree)
        .args(["render", "page.html", "--json", "{title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid data payload"));
}

#[test]
fn test_data_and_json_conflict() {
    let tree = page_site();
    prender(&tree)
        .args(["render", "page.html", "--json", "{}", "--data", "data.json"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_sets_resource_root() {
    let tree = ResourceTree::new()
        .with_file("partial-render.toml", "resource_root = \"site\"\nbootstrap = \"lib/boot.js\"\n")
        .with_file("site/lib/boot.js", "")
        .with_file("site/page.html", "{{> footer_links}}")
        .with_file("site/footer/links.html", "<a>Home</a>");

    prender(&tree).args(["render", "page.html"]).assert().success().stdout("<a>Home</a>\n");
}

#[test]
fn test_root_flag_overrides_config() {
    let tree = ResourceTree::new()
        .with_file("partial-render.toml", "resource_root = \"missing\"\n")
        .with_file("other/ractive.js", "")
        .with_file("other/page.html", "other root");

    prender(&tree)
        .args(["render", "page.html", "--root", "other"])
        .assert()
        .success()
        .stdout("other root\n");
}

#[test]
fn test_unknown_config_key_fails() {
    let tree = page_site().with_file("partial-render.toml", "colour = \"blue\"\n");
    prender(&tree)
        .args(["render", "page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let tree = page_site();
    prender(&tree)
        .args(["--config", "nope.toml", "render", "page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_partials_listing() {
    let tree = page_site().with_file("page.html", "{{> header}}{{> footer_links}}");
    prender(&tree)
        .args(["partials", "page.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("header       -> header.html"))
        .stdout(predicate::str::contains("footer_links -> footer/links.html"))
        .stdout(predicate::str::contains("(missing)"));
}

#[test]
fn test_partials_json() {
    let tree = page_site().with_file("page.html", "{{> header}}{{> footer_links}}");
    let output = prender(&tree).args(["partials", "page.html", "--json"]).output().unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([
            {"name": "footer_links", "path": "footer/links.html", "found": false},
            {"name": "header", "path": "header.html", "found": true}
        ])
    );
}

#[test]
fn test_partials_nested() {
    let tree = site()
        .with_file("page.html", "{{> layout}}")
        .with_file("layout.html", "{{> nav}}")
        .with_file("nav.html", "<nav/>");
    prender(&tree)
        .args(["partials", "page.html", "--nested"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nav    -> nav.html"))
        .stdout(predicate::str::contains("(missing)").not());
}

/// A footer that pulls in a partial only the bootstrap script defines.
fn global_partial_site() -> ResourceTree {
    ResourceTree::new()
        .with_file("ractive.js", "Ractive.partials.copyright = '(c) {{ site }}';")
        .with_file("page.html", "{{> footer_links}}")
        .with_file("footer/links.html", "<a>Home</a>{{> copyright}}")
}

#[test]
fn test_render_nested_with_global_partial() {
    let tree = global_partial_site();
    prender(&tree)
        .args(["render", "page.html", "--nested", "--json", r#"{"site":"Docs"}"#])
        .assert()
        .success()
        .stdout("<a>Home</a>(c) Docs\n");
}

#[test]
fn test_partials_nested_marks_global_partial() {
    let tree = global_partial_site();
    prender(&tree)
        .args(["partials", "page.html", "--nested"])
        .assert()
        .success()
        .stdout(predicate::str::contains("copyright    -> copyright.html"))
        .stdout(predicate::str::contains("(engine)"))
        .stdout(predicate::str::contains("(missing)").not());
}

#[test]
fn test_partials_none() {
    let tree = site().with_file("plain.html", "Hello {{ name }}");
    prender(&tree)
        .args(["partials", "plain.html"])
        .assert()
        .success()
        .stdout("No partials referenced by plain.html\n");
}

#[test]
fn test_invocation_output() {
    let tree = page_site().with_file("header.html", "<h1>It's</h1>");
    prender(&tree)
        .args(["invocation", "page.html", "--json", r#"{"title": "Home"}"#])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "var ractive = new Ractive({ template: '{{> header}}<p>Body</p>', data: JSON.parse('{\\\"title\\\":\\\"Home\\\"}'), partials: {header: '<h1>It\\'s</h1>'} });",
        ))
        .stdout(predicate::str::ends_with("ractive.toHtml();\n"));
}
