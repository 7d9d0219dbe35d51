//! Workflow publishing: access-policy upload followed by a harvest trigger.

use catalogue_core::{RecordId, Settings};
use serde_json::json;

use crate::http::{HttpRequest, Transport};
use crate::outcome::{Outcome, Stage};

/// Name under which the access-policy document is uploaded.
const POLICY_FILE_NAME: &str = "access-policy.json";

/// Publish one workflow: upload a public access policy to the workspace's
/// data loader, then trigger a harvest.
///
/// Returns one outcome per step; the harvest is not attempted when the
/// upload fails.
pub fn publish_workflow(
    transport: &dyn Transport,
    settings: &Settings,
    workspace_token: &str,
    workspace: &str,
    id: &RecordId,
) -> Vec<Outcome> {
    let mut workflows = serde_json::Map::new();
    workflows.insert(id.to_string(), json!({ "access": "public" }));
    let policy = json!({ "workflows": workflows }).to_string();

    let upload = HttpRequest::post(settings.eodh.data_loader_url(workspace))
        .bearer(workspace_token)
        .header("Accept", "application/json")
        .json(json!({ "fileContent": policy, "fileName": POLICY_FILE_NAME }));

    let policy_outcome = match transport.send(&upload) {
        Ok(response) if response.is_success() => Outcome::succeeded(
            Stage::PublishPolicy,
            id.as_str(),
            format!("access policy uploaded for '{id}'"),
        ),
        Ok(response) => Outcome::failed(
            Stage::PublishPolicy,
            id.as_str(),
            format!(
                "access policy upload failed for '{id}': {} {}",
                response.status,
                response.body_text()
            ),
        ),
        Err(e) => Outcome::failed(Stage::PublishPolicy, id.as_str(), e.to_string()),
    };
    if policy_outcome.is_failed() {
        tracing::warn!("{}", policy_outcome.message);
        return vec![policy_outcome];
    }

    let harvest = HttpRequest::post(settings.eodh.harvest_url(workspace))
        .bearer(workspace_token)
        .header("Accept", "application/json");
    let harvest_outcome = match transport.send(&harvest) {
        Ok(response) if response.is_success() => Outcome::succeeded(
            Stage::PublishHarvest,
            id.as_str(),
            format!("harvest triggered for '{id}'"),
        ),
        Ok(response) => Outcome::failed(
            Stage::PublishHarvest,
            id.as_str(),
            format!(
                "harvest trigger failed for '{id}': {} {}",
                response.status,
                response.body_text()
            ),
        ),
        Err(e) => Outcome::failed(Stage::PublishHarvest, id.as_str(), e.to_string()),
    };
    if harvest_outcome.is_failed() {
        tracing::warn!("{}", harvest_outcome.message);
    }

    vec![policy_outcome, harvest_outcome]
}
