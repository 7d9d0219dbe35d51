//! Credential acquisition: identity token and workspace session exchange.

use catalogue_core::Settings;
use serde_json::Value;

use crate::error::AuthError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Obtain an identity bearer token via the password grant.
///
/// Failure here is fatal to a synchronization run.
pub fn identity_token(
    transport: &dyn Transport,
    settings: &Settings,
) -> Result<String, AuthError> {
    let request = HttpRequest::post(settings.eodh.token_url()).form(&[
        ("client_id", settings.eodh.client_id.as_str()),
        ("username", settings.eodh.username.as_str()),
        ("password", settings.eodh.password.as_str()),
        ("grant_type", "password"),
        ("scope", "openid"),
    ]);

    let response = transport.send(&request)?;
    if !response.is_success() {
        return Err(AuthError::Status {
            status: response.status,
            body: response.body_text(),
        });
    }
    token_field(&response, "access_token")
}

/// Exchange an identity token for a session scoped to `workspace`.
///
/// Failure here is non-fatal: the caller downgrades the dependent stages to
/// skipped instead of aborting the run.
pub fn workspace_token(
    transport: &dyn Transport,
    settings: &Settings,
    identity: &str,
    workspace: &str,
) -> Result<String, AuthError> {
    let request = HttpRequest::post(settings.eodh.workspace_sessions_url(workspace))
        .bearer(identity)
        .header("Accept", "application/json");

    let response = transport.send(&request)?;
    if !response.is_success() {
        return Err(AuthError::Status {
            status: response.status,
            body: response.body_text(),
        });
    }
    token_field(&response, "access")
}

fn token_field(response: &HttpResponse, field: &'static str) -> Result<String, AuthError> {
    response
        .json()
        .as_ref()
        .and_then(|body| body.get(field))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(AuthError::MalformedResponse { field })
}
