//! Per-item outcomes and the aggregate run report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Pipeline stage that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Register,
    Delete,
    Ades,
    PublishPolicy,
    PublishHarvest,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Register => "register",
            Stage::Delete => "delete",
            Stage::Ades => "ades",
            Stage::PublishPolicy => "publish-policy",
            Stage::PublishHarvest => "publish-harvest",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// Result of one stage applied to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub stage: Stage,
    /// Identifying key: file path (register/ades) or record ID
    /// (delete/publish).
    pub key: String,
    pub status: OutcomeStatus,
    /// Human-readable context; carries the raw status/body on failure.
    pub message: String,
}

impl Outcome {
    pub fn succeeded(stage: Stage, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(stage, key, OutcomeStatus::Succeeded, message)
    }

    pub fn failed(stage: Stage, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(stage, key, OutcomeStatus::Failed, message)
    }

    pub fn skipped(stage: Stage, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(stage, key, OutcomeStatus::Skipped, message)
    }

    fn new(
        stage: Stage,
        key: impl Into<String>,
        status: OutcomeStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            key: key.into(),
            status,
            message: message.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

/// Aggregate report of one synchronization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Append-only: outcomes in the order the stages produced them.
    pub outcomes: Vec<Outcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when the workspace stages were skipped for the whole run
    /// (workspace credential unavailable or no workspace configured).
    pub degraded: Option<String>,
}

impl RunReport {
    /// A run succeeds iff nothing failed; skips are not failures.
    pub fn success(&self) -> bool {
        !self.outcomes.iter().any(Outcome::is_failed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn report_with(outcomes: Vec<Outcome>) -> RunReport {
        let now = Utc::now();
        RunReport {
            outcomes,
            started_at: now,
            finished_at: now,
            degraded: None,
        }
    }

    #[test]
    fn skips_do_not_count_as_failures() {
        let report = report_with(vec![
            Outcome::succeeded(Stage::Register, "a.json", "registered 'a'"),
            Outcome::skipped(Stage::Ades, "a.json", "no CWL application link"),
        ]);
        assert!(report.success());
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn any_failure_fails_the_run() {
        let report = report_with(vec![
            Outcome::succeeded(Stage::Register, "a.json", "registered 'a'"),
            Outcome::failed(Stage::Delete, "old", "could not delete 'old': 500"),
        ]);
        assert!(!report.success());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn stage_labels_match_error_keys() {
        assert_eq!(Stage::Register.to_string(), "register");
        assert_eq!(Stage::PublishHarvest.to_string(), "publish-harvest");
    }
}
