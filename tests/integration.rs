use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_externgen")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- stdin mode --

#[test]
fn stdin_mode_prints_declarations() {
    let input = std::fs::read_to_string(fixture_path("api.html")).unwrap();

    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("declare namespace sublime {"))
        .stdout(predicate::str::contains("class Region {"))
        .stdout(predicate::str::contains("const DIALOG_CANCEL: number;"));
}

// -- source mode --

#[test]
fn source_mode_writes_one_file_per_declaration() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("api.html"))
        .assert()
        .success();

    let module = std::fs::read_to_string(dir.path().join("sublime.d.ts")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("sublime.expected.d.ts")).unwrap();
    assert_eq!(module, expected);

    let region = std::fs::read_to_string(dir.path().join("sublime/Region.d.ts")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("region.expected.d.ts")).unwrap();
    assert_eq!(region, expected);

    assert!(dir.path().join("sublime/Window.d.ts").is_file());
    assert!(dir.path().join("sublime/View.d.ts").is_file());
}

#[test]
fn forward_reference_resolves_to_later_class() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("api.html"))
        .assert()
        .success();

    // `active_view()` is documented before the View class section.
    let window = std::fs::read_to_string(dir.path().join("sublime/Window.d.ts")).unwrap();
    assert!(window.contains("active_view(): sublime.View | null;"));
}

#[test]
fn json_format_writes_structured_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "json"])
        .arg(fixture_path("api.html"))
        .assert()
        .success();

    let raw = std::fs::read_to_string(dir.path().join("sublime.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["name"], "sublime");
    assert_eq!(parsed["kind"], "Module");
}

// -- error handling --

#[test]
fn missing_output_dir_is_an_error() {
    cmd()
        .arg(fixture_path("api.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unknown_format_is_rejected() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-f", "yaml"])
        .arg(fixture_path("api.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn malformed_signature_aborts_the_run() {
    let html = r#"<h2>broken Module</h2>
        <table>
        <tr><th>Methods</th><th>Return Value</th><th>Description</th></tr>
        <tr><td>not a signature</td><td>int</td><td>Broken row.</td></tr>
        </table>"#;

    cmd()
        .write_stdin(html)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse method signature"));
}

#[test]
fn unrecognized_titles_warn_but_do_not_abort() {
    let html = r#"<h2>Changelog</h2>
        <h2>tiny Module</h2>
        <table>
        <tr><th>Methods</th><th>Return Value</th><th>Description</th></tr>
        <tr><td>ping()</td><td>bool</td><td>Liveness check.</td></tr>
        </table>"#;

    cmd()
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("function ping(): boolean;"))
        .stderr(predicate::str::contains("warning: skipping section"));
}
