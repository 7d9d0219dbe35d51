//! Domain types for the catalogue record pipeline.
//!
//! A [`Record`] is immutable once loaded: the full JSON document is kept
//! as-is (it is the exact body POSTed to the catalogue service) and
//! introspected through lenient accessors that return empty/none on absent
//! fields instead of erroring.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RecordError;

/// Reserved basename of the collection-level descriptor. Never part of a
/// per-record batch.
pub const CATALOG_DESCRIPTOR: &str = "catalog.json";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A validated catalogue record identifier.
///
/// Construction enforces the catalogue ID contract: non-empty, ASCII
/// alphanumeric plus hyphen and underscore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Result<Self, RecordError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RecordError::InvalidId { id });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The `properties.type` discriminator of a catalogue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Workflow,
    Notebook,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Workflow => write!(f, "workflow"),
            RecordType::Notebook => write!(f, "notebook"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A CWL application link carried by a workflow record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessLink {
    /// URL of the externally hosted process definition.
    pub href: String,
    /// Media type of the link (contains the CWL marker).
    pub media_type: String,
}

/// A catalogue record: validated ID plus the full JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    body: Value,
}

impl Record {
    /// Build a record from an already-parsed document.
    ///
    /// Requires a JSON object with a valid string `id`; everything else is
    /// inspected lazily through the accessors.
    pub fn from_value(body: Value) -> Result<Self, RecordError> {
        let Some(object) = body.as_object() else {
            return Err(RecordError::NotAnObject);
        };
        let id = match object.get("id") {
            Some(Value::String(id)) => RecordId::new(id.clone())?,
            _ => return Err(RecordError::MissingId),
        };
        Ok(Self { id, body })
    }

    /// Read and parse a UTF-8 JSON record file.
    pub fn from_path(path: &Path) -> Result<Self, RecordError> {
        let contents = std::fs::read_to_string(path).map_err(|e| RecordError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value = serde_json::from_str(&contents).map_err(|e| RecordError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_value(value)
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// The full document, exactly as loaded.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The `properties.type` discriminator; `None` when absent or unknown.
    pub fn record_type(&self) -> Option<RecordType> {
        let value = self.body.pointer("/properties/type")?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn is_workflow(&self) -> bool {
        self.record_type() == Some(RecordType::Workflow)
    }

    /// CWL application links: `links` entries with `rel == "application"`
    /// and a media type containing `cwl`. Empty for records without links.
    pub fn process_links(&self) -> Vec<ProcessLink> {
        let Some(links) = self.body.get("links").and_then(Value::as_array) else {
            return Vec::new();
        };
        links
            .iter()
            .filter_map(|link| {
                let rel = link.get("rel").and_then(Value::as_str)?;
                let media_type = link.get("type").and_then(Value::as_str).unwrap_or("");
                if rel != "application" || !media_type.contains("cwl") {
                    return None;
                }
                let href = link.get("href").and_then(Value::as_str)?;
                Some(ProcessLink {
                    href: href.to_owned(),
                    media_type: media_type.to_owned(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// The unit of work for one synchronization run: add/update record files in
/// order, plus bare record IDs whose backing files were removed.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub additions: Vec<PathBuf>,
    pub deletions: Vec<RecordId>,
}

impl Batch {
    /// Build a batch from candidate paths, applying the filename contract:
    /// only existing `*.json` files, the reserved [`CATALOG_DESCRIPTOR`]
    /// excluded.
    pub fn from_paths(files: &[PathBuf], deletions: Vec<RecordId>) -> Self {
        let additions = files
            .iter()
            .filter(|path| is_record_file(path))
            .cloned()
            .collect();
        Self {
            additions,
            deletions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty()
    }
}

fn is_record_file(path: &Path) -> bool {
    let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
    let is_descriptor = path
        .file_name()
        .map(|name| name == CATALOG_DESCRIPTOR)
        .unwrap_or(false);
    is_json && !is_descriptor && path.exists()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
