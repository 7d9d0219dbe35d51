use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn catalogue() -> Command {
    Command::cargo_bin("catalogue").expect("catalogue binary")
}

#[test]
fn valid_records_pass() {
    let dir = TempDir::new().unwrap();
    let workflow = dir.path().join("ndvi.json");
    fs::write(
        &workflow,
        r#"{"id": "ndvi", "properties": {"type": "workflow"}, "links": [{"rel": "application", "type": "application/cwl+yaml", "href": "https://host/ndvi.cwl"}]}"#,
    )
    .unwrap();
    let notebook = dir.path().join("flood.json");
    fs::write(
        &notebook,
        r#"{"id": "flood", "properties": {"type": "notebook"}}"#,
    )
    .unwrap();

    catalogue()
        .arg("validate")
        .arg("--files")
        .arg(&workflow)
        .arg(&notebook)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS").and(predicate::str::contains(
            "All 2 file(s) passed validation.",
        )));
}

#[test]
fn invalid_record_fails_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    let renamed = dir.path().join("renamed.json");
    fs::write(
        &renamed,
        r#"{"id": "ndvi", "properties": {"type": "workflow"}}"#,
    )
    .unwrap();

    catalogue()
        .arg("validate")
        .arg("--files")
        .arg(&renamed)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stderr(predicate::str::contains("1 file(s) failed validation"));
}

#[test]
fn collection_descriptor_is_skipped() {
    let dir = TempDir::new().unwrap();
    let descriptor = dir.path().join("catalog.json");
    fs::write(&descriptor, r#"{"title": "EODH catalogue"}"#).unwrap();

    catalogue()
        .arg("validate")
        .arg("--files")
        .arg(&descriptor)
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIP").and(predicate::str::contains(
            "All 0 file(s) passed validation.",
        )));
}
