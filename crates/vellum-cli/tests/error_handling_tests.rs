//! Tests for error messages, suggestions and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

fn vellum() -> Command {
    let mut cmd = Command::cargo_bin("vellum").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("VELLUM__ASSETS__DIR");
    cmd
}

#[test]
fn test_unknown_page_is_not_found() {
    vellum()
        .args(["render", "contact"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Asset not found: pages/contact.tmpl"))
        .stderr(predicate::str::contains("vellum list"));
}

#[test]
fn test_page_name_with_separator_is_user_error() {
    vellum()
        .args(["render", "../base"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid page name"));
}

#[test]
fn test_invalid_context_json_is_user_error() {
    vellum()
        .args(["render", "about", "--context", "{"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_missing_asset_for_cat() {
    vellum()
        .args(["cat", "pages/missing.tmpl"])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_block_is_template_error() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("pages")).unwrap();
    std::fs::write(
        temp.path().join("base.tmpl"),
        "{{template \"title\" .}}\n{{template \"content\" .}}",
    )
    .unwrap();
    std::fs::write(
        temp.path().join("pages/stub.tmpl"),
        "{{define \"title\"}}Stub{{end}}",
    )
    .unwrap();

    vellum()
        .arg("--assets-dir")
        .arg(temp.path())
        .args(["render", "stub"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains(
            "template: base.tmpl:2: template \"content\" is referenced but never defined",
        ));
}

#[test]
fn test_field_on_null_context_is_template_error() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("pages")).unwrap();
    std::fs::write(temp.path().join("base.tmpl"), "{{template \"content\" .}}").unwrap();
    std::fs::write(
        temp.path().join("pages/user.tmpl"),
        "{{define \"content\"}}{{.User}}{{end}}",
    )
    .unwrap();

    vellum()
        .arg("--assets-dir")
        .arg(temp.path())
        .args(["render", "user"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("nil data"));
}

#[test]
fn test_missing_assets_dir() {
    vellum()
        .args(["--assets-dir", "/definitely/not/here", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_missing_explicit_config_file() {
    vellum()
        .args(["--config", "/definitely/not/here.toml", "list"])
        .assert()
        .code(4);
}

#[test]
fn test_unknown_subcommand_exits_2() {
    vellum().arg("frobnicate").assert().code(2);
}
