//! Application settings.
//!
//! [`Settings`] is built once at process start (from the environment, at the
//! CLI boundary) and passed by reference into every component; no component
//! reads ambient global state directly. URL helpers centralize endpoint
//! construction so call sites never concatenate paths by hand.

use std::env;

use crate::error::ConfigError;
use crate::types::RecordId;

/// OGC API path under the workspace-scoped ADES root.
pub const OGC_PROCESSES_PATH: &str = "ogc-api/processes";

/// EO Data Hub platform settings.
#[derive(Debug, Clone)]
pub struct EodhSettings {
    pub base_url: String,
    pub realm: String,
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub workspace_services_endpoint_path: String,
    pub ades_endpoint_path: String,
    /// Publishing workspace. Absent means ADES registration and publishing
    /// are skipped for the whole run.
    pub workspace_name: Option<String>,
}

impl EodhSettings {
    /// Keycloak password-grant token endpoint.
    pub fn token_url(&self) -> String {
        join_url(
            &self.base_url,
            &format!("keycloak/realms/{}/protocol/openid-connect/token", self.realm),
        )
    }

    /// Session endpoint exchanging an identity token for a workspace token.
    pub fn workspace_sessions_url(&self, workspace: &str) -> String {
        let path = format!(
            "{}/{workspace}/me/sessions",
            self.workspace_services_endpoint_path.trim_matches('/')
        );
        join_url(&self.base_url, &path)
    }

    /// Process collection endpoint of the workspace-scoped ADES.
    pub fn ades_processes_url(&self, workspace: &str) -> String {
        let ades_url = join_url(&self.base_url, self.ades_endpoint_path.trim_matches('/'));
        format!("{ades_url}/{workspace}/{OGC_PROCESSES_PATH}")
    }

    /// Data-loader endpoint accepting access-policy uploads.
    pub fn data_loader_url(&self, workspace: &str) -> String {
        join_url(&self.base_url, &format!("api/workspaces/{workspace}/data-loader"))
    }

    /// Harvest trigger endpoint for the workspace.
    pub fn harvest_url(&self, workspace: &str) -> String {
        join_url(&self.base_url, &format!("workspaces/{workspace}/harvest"))
    }
}

/// Application settings for one process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// wf-catalogue-service base URL.
    pub catalogue_api_url: String,
    pub eodh: EodhSettings,
}

impl Settings {
    /// Build settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build settings from an explicit variable lookup.
    ///
    /// The testable form of [`Settings::from_env`]; tests pass a map-backed
    /// closure instead of mutating the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(ConfigError::MissingVar { name }),
            }
        };

        Ok(Self {
            catalogue_api_url: require("WF_CATALOGUE_API_URL")?,
            eodh: EodhSettings {
                base_url: require("EODH__BASE_URL")?,
                realm: require("EODH__REALM")?,
                username: require("EODH__USERNAME")?,
                password: require("EODH__PASSWORD")?,
                client_id: require("EODH__CLIENT_ID")?,
                workspace_services_endpoint_path: require(
                    "EODH__WORKSPACE_SERVICES_ENDPOINT_PATH",
                )?,
                ades_endpoint_path: require("EODH__ADES_ENDPOINT_PATH")?,
                workspace_name: lookup("EODH__WORKSPACE_NAME").filter(|v| !v.is_empty()),
            },
        })
    }

    /// Record creation endpoint of the catalogue service.
    pub fn register_url(&self) -> String {
        format!(
            "{}/api/v1.0/register",
            self.catalogue_api_url.trim_end_matches('/')
        )
    }

    /// Per-record endpoint of the catalogue service.
    pub fn record_url(&self, id: &RecordId) -> String {
        format!("{}/{id}", self.register_url())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
