//! End-to-end pipeline runs against the scripted transport.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use catalogue_core::{Batch, EodhSettings, RecordId, Settings};
use catalogue_sync::testing::MockTransport;
use catalogue_sync::{pipeline, Method, OutcomeStatus, RunOptions, Stage, SyncError};

const TOKEN_URL: &str = "https://eodh.test/keycloak/realms/eodhp/protocol/openid-connect/token";
const SESSIONS_URL: &str = "https://eodh.test/api/workspaces/wf-workspace/me/sessions";
const REGISTER_URL: &str = "https://catalogue.test/api/v1.0/register";
const PROCESSES_URL: &str = "https://eodh.test/ades/wf-workspace/ogc-api/processes";
const DATA_LOADER_URL: &str = "https://eodh.test/api/workspaces/wf-workspace/data-loader";
const HARVEST_URL: &str = "https://eodh.test/workspaces/wf-workspace/harvest";
const CWL_URL: &str = "https://raw.test/ndvi.cwl";

fn test_settings() -> Settings {
    Settings {
        catalogue_api_url: "https://catalogue.test".to_owned(),
        eodh: EodhSettings {
            base_url: "https://eodh.test".to_owned(),
            realm: "eodhp".to_owned(),
            username: "svc-account".to_owned(),
            password: "secret".to_owned(),
            client_id: "catalogue-cd".to_owned(),
            workspace_services_endpoint_path: "/api/workspaces".to_owned(),
            ades_endpoint_path: "/ades".to_owned(),
            workspace_name: Some("wf-workspace".to_owned()),
        },
    }
}

fn write_workflow_record(dir: &TempDir, id: &str, cwl_href: Option<&str>) -> PathBuf {
    let links = match cwl_href {
        Some(href) => format!(
            r#"[{{"rel": "application", "type": "application/cwl+yaml", "href": "{href}"}}]"#
        ),
        None => "[]".to_owned(),
    };
    let path = dir.path().join(format!("{id}.json"));
    fs::write(
        &path,
        format!(r#"{{"id": "{id}", "properties": {{"type": "workflow"}}, "links": {links}}}"#),
    )
    .unwrap();
    path
}

fn write_notebook_record(dir: &TempDir, id: &str) -> PathBuf {
    let path = dir.path().join(format!("{id}.json"));
    fs::write(
        &path,
        format!(r#"{{"id": "{id}", "properties": {{"type": "notebook"}}}}"#),
    )
    .unwrap();
    path
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn script_identity(transport: &MockTransport) {
    transport.respond(Method::Post, TOKEN_URL, 200, r#"{"access_token": "idtok"}"#);
}

fn script_workspace(transport: &MockTransport) {
    transport.respond(Method::Post, SESSIONS_URL, 200, r#"{"access": "wstok"}"#);
}

#[test]
fn full_workflow_run_records_four_outcomes() {
    init_logs();
    let dir = TempDir::new().unwrap();
    let record = write_workflow_record(&dir, "ndvi", Some(CWL_URL));

    let transport = MockTransport::new();
    script_identity(&transport);
    script_workspace(&transport);
    transport.respond(Method::Post, REGISTER_URL, 201, "");
    transport.respond(Method::Get, CWL_URL, 200, "cwlVersion: v1.0");
    transport.respond(
        Method::Delete,
        format!("{PROCESSES_URL}/ndvi"),
        403,
        "no such process",
    );
    transport.respond(Method::Post, PROCESSES_URL, 201, "");
    transport.respond(Method::Post, DATA_LOADER_URL, 200, "");
    transport.respond(Method::Post, HARVEST_URL, 200, "");

    let batch = Batch::from_paths(&[record], vec![]);
    let report = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap();

    assert!(report.success());
    assert!(report.degraded.is_none());
    let stages: Vec<Stage> = report.outcomes.iter().map(|o| o.stage).collect();
    assert_eq!(
        stages,
        vec![
            Stage::Register,
            Stage::Ades,
            Stage::PublishPolicy,
            Stage::PublishHarvest,
        ]
    );
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == OutcomeStatus::Succeeded));
}

#[test]
fn missing_identity_token_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let record = write_workflow_record(&dir, "ndvi", None);

    // Nothing scripted at all: the token request fails as a network error.
    let transport = MockTransport::new();
    let batch = Batch::from_paths(&[record], vec![]);

    let err = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SyncError::Auth(_)));
    // Only the token endpoint was ever contacted.
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn workspace_token_failure_degrades_but_registers() {
    let dir = TempDir::new().unwrap();
    let record = write_workflow_record(&dir, "ndvi", Some(CWL_URL));

    let transport = MockTransport::new();
    script_identity(&transport);
    transport.respond(Method::Post, SESSIONS_URL, 500, "session backend down");
    transport.respond(Method::Post, REGISTER_URL, 201, "");

    let batch = Batch::from_paths(&[record], vec![]);
    let report = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap();

    // Registration completed; ADES and publish stages attempted nothing.
    assert!(report.success());
    assert!(report.degraded.is_some());
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].stage, Stage::Register);
    assert_eq!(transport.count(Method::Get, CWL_URL), 0);
    assert_eq!(transport.count(Method::Post, DATA_LOADER_URL), 0);
}

#[test]
fn missing_workspace_name_skips_workspace_stages() {
    let dir = TempDir::new().unwrap();
    let record = write_workflow_record(&dir, "ndvi", Some(CWL_URL));

    let mut settings = test_settings();
    settings.eodh.workspace_name = None;

    let transport = MockTransport::new();
    script_identity(&transport);
    transport.respond(Method::Post, REGISTER_URL, 201, "");

    let batch = Batch::from_paths(&[record], vec![]);
    let report = pipeline::run(&transport, &settings, &batch, RunOptions::default()).unwrap();

    assert!(report.success());
    assert!(report.degraded.is_some());
    assert_eq!(transport.count(Method::Post, SESSIONS_URL), 0);
}

#[test]
fn skip_flags_disable_workspace_token_and_stages() {
    let dir = TempDir::new().unwrap();
    let record = write_workflow_record(&dir, "ndvi", Some(CWL_URL));

    let transport = MockTransport::new();
    script_identity(&transport);
    transport.respond(Method::Post, REGISTER_URL, 201, "");

    let batch = Batch::from_paths(&[record], vec![]);
    let options = RunOptions {
        skip_ades: true,
        skip_publish: true,
    };
    let report = pipeline::run(&transport, &test_settings(), &batch, options).unwrap();

    assert!(report.success());
    assert!(report.degraded.is_none());
    assert_eq!(report.outcomes.len(), 1);
    // With both stages skipped no workspace token is requested.
    assert_eq!(transport.count(Method::Post, SESSIONS_URL), 0);
}

#[test]
fn deletion_only_batch_needs_no_workspace_token() {
    let transport = MockTransport::new();
    script_identity(&transport);
    transport.respond(
        Method::Delete,
        "https://catalogue.test/api/v1.0/register/old-workflow",
        204,
        "",
    );
    transport.respond(
        Method::Delete,
        "https://catalogue.test/api/v1.0/register/older-workflow",
        404,
        "",
    );

    let batch = Batch::from_paths(
        &[],
        vec![
            RecordId::new("old-workflow").unwrap(),
            RecordId::new("older-workflow").unwrap(),
        ],
    );
    let report = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap();

    assert!(report.success());
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes.iter().all(|o| o.stage == Stage::Delete));
    assert_eq!(transport.count(Method::Post, SESSIONS_URL), 0);
}

#[test]
fn notebook_records_skip_ades_and_publish() {
    let dir = TempDir::new().unwrap();
    let notebook = write_notebook_record(&dir, "flood-mapping");

    let transport = MockTransport::new();
    script_identity(&transport);
    script_workspace(&transport);
    transport.respond(Method::Post, REGISTER_URL, 201, "");

    let batch = Batch::from_paths(&[notebook], vec![]);
    let report = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap();

    assert!(report.success());
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].stage, Stage::Register);
}

#[test]
fn unloadable_file_fails_that_item_and_run_continues() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    let good = write_workflow_record(&dir, "ndvi", None);

    let transport = MockTransport::new();
    script_identity(&transport);
    script_workspace(&transport);
    transport.respond(Method::Post, REGISTER_URL, 201, "");

    let batch = Batch::from_paths(&[broken, good], vec![]);
    let report = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap();

    assert!(!report.success());
    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].key.ends_with("broken.json"));
    // The good record was still registered, and its empty link list shows
    // up as a skipped ADES outcome.
    assert!(report
        .outcomes
        .iter()
        .any(|o| o.stage == Stage::Register && o.status == OutcomeStatus::Succeeded));
    assert!(report
        .outcomes
        .iter()
        .any(|o| o.stage == Stage::Ades && o.status == OutcomeStatus::Skipped));
}

#[test]
fn item_failures_do_not_stop_later_items() {
    let dir = TempDir::new().unwrap();
    let first = write_workflow_record(&dir, "first-wf", None);
    let second = write_workflow_record(&dir, "second-wf", None);

    let transport = MockTransport::new();
    script_identity(&transport);
    script_workspace(&transport);
    transport.respond(Method::Post, REGISTER_URL, 500, "backend down");
    transport.respond(Method::Post, REGISTER_URL, 201, "");

    let batch = Batch::from_paths(&[first, second], vec![]);
    let report = pipeline::run(
        &transport,
        &test_settings(),
        &batch,
        RunOptions::default(),
    )
    .unwrap();

    assert!(!report.success());
    let register: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.stage == Stage::Register)
        .collect();
    assert_eq!(register.len(), 2);
    assert_eq!(register[0].status, OutcomeStatus::Failed);
    assert_eq!(register[1].status, OutcomeStatus::Succeeded);
}
