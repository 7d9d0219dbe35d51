//! Conflict-aware record registration and idempotent deletion against the
//! catalogue service.

use catalogue_core::{Record, RecordId, Settings};

use crate::http::{HttpRequest, Transport};
use crate::outcome::{Outcome, Stage};

/// Upsert one record.
///
/// POSTs the document; on 409 the existing record is deleted (404 on that
/// delete counts as already gone) and the POST retried exactly once. A
/// second conflict is a failure, never a loop.
pub fn register_record(
    transport: &dyn Transport,
    settings: &Settings,
    token: &str,
    key: &str,
    record: &Record,
) -> Outcome {
    let id = record.id();
    let post = HttpRequest::post(settings.register_url())
        .bearer(token)
        .json(record.body().clone());

    let mut response = match transport.send(&post) {
        Ok(response) => response,
        Err(e) => return Outcome::failed(Stage::Register, key, e.to_string()),
    };

    if response.status == 409 {
        tracing::info!("record '{id}' already exists, deleting and re-registering");
        let delete = HttpRequest::delete(settings.record_url(id)).bearer(token);
        match transport.send(&delete) {
            Ok(del) if matches!(del.status, 204 | 404) => {}
            Ok(del) => {
                return Outcome::failed(
                    Stage::Register,
                    key,
                    format!(
                        "could not delete existing '{id}': {} {}",
                        del.status,
                        del.body_text()
                    ),
                )
            }
            Err(e) => return Outcome::failed(Stage::Register, key, e.to_string()),
        }

        response = match transport.send(&post) {
            Ok(response) => response,
            Err(e) => return Outcome::failed(Stage::Register, key, e.to_string()),
        };
    }

    if response.status == 201 {
        return Outcome::succeeded(Stage::Register, key, format!("registered '{id}'"));
    }
    Outcome::failed(
        Stage::Register,
        key,
        format!(
            "could not register '{id}': {} {}",
            response.status,
            response.body_text()
        ),
    )
}

/// Delete one record by ID. Not-found counts as success: deletion is
/// idempotent and "already gone" is not an error.
pub fn delete_record(
    transport: &dyn Transport,
    settings: &Settings,
    token: &str,
    id: &RecordId,
) -> Outcome {
    let request = HttpRequest::delete(settings.record_url(id)).bearer(token);
    match transport.send(&request) {
        Ok(response) if response.status == 204 => {
            Outcome::succeeded(Stage::Delete, id.as_str(), format!("deleted '{id}'"))
        }
        Ok(response) if response.status == 404 => Outcome::succeeded(
            Stage::Delete,
            id.as_str(),
            format!("'{id}' not found (already deleted)"),
        ),
        Ok(response) => Outcome::failed(
            Stage::Delete,
            id.as_str(),
            format!(
                "could not delete '{id}': {} {}",
                response.status,
                response.body_text()
            ),
        ),
        Err(e) => Outcome::failed(Stage::Delete, id.as_str(), e.to_string()),
    }
}
