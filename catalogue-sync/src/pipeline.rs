//! Synchronization pipeline entrypoint.
//!
//! Stage order is strict: authenticate, register additions, delete
//! removals, register ADES processes, publish workflows. Each stage drains
//! the whole batch before the next starts, and a per-item failure never
//! stops the run; only a missing identity credential does.

use catalogue_core::{Batch, Record, Settings};
use chrono::Utc;

use crate::error::SyncError;
use crate::http::Transport;
use crate::outcome::{Outcome, RunReport, Stage};
use crate::{ades, auth, publish, registrar};

/// Stage toggles for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip ADES process registration.
    pub skip_ades: bool,
    /// Skip access-policy publishing.
    pub skip_publish: bool,
}

/// Execute one synchronization run over `batch`.
///
/// This is the canonical entrypoint for `catalogue sync`. Fatal only when
/// the identity credential cannot be obtained; everything else is collected
/// as per-item outcomes on the returned report.
pub fn run(
    transport: &dyn Transport,
    settings: &Settings,
    batch: &Batch,
    options: RunOptions,
) -> Result<RunReport, SyncError> {
    let started_at = Utc::now();
    let mut outcomes = Vec::new();

    let identity = auth::identity_token(transport, settings)?;
    tracing::info!("identity token obtained");

    // Additions are read once up front; a file that cannot be loaded is a
    // failed register outcome and takes no further part in the run.
    let mut additions: Vec<(String, Record)> = Vec::new();
    for path in &batch.additions {
        let key = path.display().to_string();
        match Record::from_path(path) {
            Ok(record) => additions.push((key, record)),
            Err(e) => outcomes.push(Outcome::failed(Stage::Register, key, e.to_string())),
        }
    }

    let workspace_stages_wanted =
        !batch.additions.is_empty() && (!options.skip_ades || !options.skip_publish);
    let mut degraded = None;
    let mut workspace_session: Option<(String, String)> = None;
    if workspace_stages_wanted {
        match settings.eodh.workspace_name.as_deref() {
            None => {
                degraded = Some(
                    "no workspace configured; ADES registration and publishing skipped"
                        .to_owned(),
                );
            }
            Some(workspace) => {
                match auth::workspace_token(transport, settings, &identity, workspace) {
                    Ok(token) => {
                        tracing::info!("workspace token obtained");
                        workspace_session = Some((workspace.to_owned(), token));
                    }
                    Err(e) => {
                        tracing::warn!("could not get workspace token: {e}");
                        degraded = Some(format!(
                            "workspace token unavailable ({e}); ADES registration and publishing skipped"
                        ));
                    }
                }
            }
        }
    }

    for (key, record) in &additions {
        outcomes.push(registrar::register_record(
            transport, settings, &identity, key, record,
        ));
    }

    for id in &batch.deletions {
        outcomes.push(registrar::delete_record(transport, settings, &identity, id));
    }

    if let Some((workspace, token)) = &workspace_session {
        if !options.skip_ades {
            for (key, record) in &additions {
                if record.is_workflow() {
                    outcomes.push(ades::register_processes(
                        transport, settings, token, workspace, key, record,
                    ));
                }
            }
        }

        if !options.skip_publish {
            for (_, record) in &additions {
                if record.is_workflow() {
                    outcomes.extend(publish::publish_workflow(
                        transport,
                        settings,
                        token,
                        workspace,
                        record.id(),
                    ));
                }
            }
        }
    }

    Ok(RunReport {
        outcomes,
        started_at,
        finished_at: Utc::now(),
        degraded,
    })
}
