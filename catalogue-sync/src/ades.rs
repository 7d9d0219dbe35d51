//! ADES process registration for workflow records.

use catalogue_core::{Record, Settings};

use crate::http::{HttpRequest, Transport};
use crate::outcome::{Outcome, Stage};

/// Media type of the process definitions POSTed to the execution backend.
const CWL_CONTENT_TYPE: &str = "application/cwl+yaml";

/// (Re)register every CWL process link of `record` with the execution
/// backend.
///
/// Each link is fetched, any existing process of the record's ID
/// unregistered, and the definition POSTed. A failed link does not stop the
/// remaining links; the record outcome fails if any link failed.
pub fn register_processes(
    transport: &dyn Transport,
    settings: &Settings,
    workspace_token: &str,
    workspace: &str,
    key: &str,
    record: &Record,
) -> Outcome {
    let links = record.process_links();
    if links.is_empty() {
        return Outcome::skipped(Stage::Ades, key, "no CWL application link");
    }

    let id = record.id();
    let processes_url = settings.eodh.ades_processes_url(workspace);
    let mut ok = true;

    for link in &links {
        tracing::debug!("fetching CWL: {}", link.href);
        let definition = match transport.send(&HttpRequest::get(&link.href)) {
            Ok(response) if response.is_success() => response.body,
            Ok(response) => {
                tracing::warn!(
                    "could not fetch CWL {}: status {}",
                    link.href,
                    response.status
                );
                ok = false;
                continue;
            }
            Err(e) => {
                tracing::warn!("could not fetch CWL {}: {e}", link.href);
                ok = false;
                continue;
            }
        };

        // Unregister any existing process first. The backend signals "does
        // not exist" with 403 rather than 404; both mean no conflicting
        // process remains.
        let unregister = HttpRequest::delete(format!("{processes_url}/{id}"))
            .bearer(workspace_token)
            .header("Accept", "application/json");
        match transport.send(&unregister) {
            Ok(response) if matches!(response.status, 200 | 204 | 403 | 404) => {}
            Ok(response) => {
                tracing::warn!("unregister returned {} for '{id}'", response.status);
            }
            Err(e) => tracing::warn!("unregister failed for '{id}': {e}"),
        }

        let register = HttpRequest::post(&processes_url)
            .bearer(workspace_token)
            .header("Accept", "application/json")
            .bytes(CWL_CONTENT_TYPE, definition);
        match transport.send(&register) {
            Ok(response) if matches!(response.status, 200 | 201) => {
                tracing::info!("ADES process registered for '{id}'");
            }
            // Conflict after the explicit unregister: the process resurfaced
            // in between. Tolerated as a race, not an error.
            Ok(response) if response.status == 409 => {
                tracing::warn!("ADES process '{id}' already exists (409 after unregister)");
            }
            Ok(response) => {
                tracing::warn!(
                    "ADES registration failed for '{id}': {} {}",
                    response.status,
                    response.body_text()
                );
                ok = false;
            }
            Err(e) => {
                tracing::warn!("ADES registration failed for '{id}': {e}");
                ok = false;
            }
        }
    }

    if ok {
        Outcome::succeeded(Stage::Ades, key, format!("processes registered for '{id}'"))
    } else {
        Outcome::failed(
            Stage::Ades,
            key,
            format!("one or more process links failed for '{id}'"),
        )
    }
}
