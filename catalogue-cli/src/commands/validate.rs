//! `catalogue validate` — structural validation of record files.
//!
//! Checks the contract every record must satisfy before it can be
//! synchronized: parseable JSON object, valid `id` matching the filename
//! stem, known `properties.type`, well-formed `links` entries. Field-level
//! schema validation stays with the catalogue's schema tooling.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use catalogue_core::{Record, CATALOG_DESCRIPTOR};

/// Arguments for `catalogue validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Catalogue JSON record files to check.
    #[arg(long, num_args = 1.., value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let mut checked = 0usize;
        let mut failed = 0usize;

        for path in &self.files {
            let is_descriptor = path
                .file_name()
                .map(|name| name == CATALOG_DESCRIPTOR)
                .unwrap_or(false);
            if is_descriptor {
                println!(
                    "  {} {} (collection descriptor)",
                    "SKIP".yellow(),
                    path.display()
                );
                continue;
            }

            checked += 1;
            match validate_record(path) {
                Ok(()) => println!("  {} {}", "PASS".green().bold(), path.display()),
                Err(reason) => {
                    println!("  {} {}: {reason}", "FAIL".red().bold(), path.display());
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            bail!("{failed} file(s) failed validation");
        }
        println!("All {checked} file(s) passed validation.");
        Ok(())
    }
}

fn validate_record(path: &Path) -> Result<(), String> {
    let record = Record::from_path(path).map_err(|e| e.to_string())?;

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    if record.id().as_str() != stem {
        return Err(format!(
            "filename '{stem}' does not match record id '{}'",
            record.id()
        ));
    }

    if record.record_type().is_none() {
        return Err("unknown or missing record type (expected 'workflow' or 'notebook')".to_owned());
    }

    if let Some(links) = record.body().get("links") {
        let Some(entries) = links.as_array() else {
            return Err("'links' is not an array".to_owned());
        };
        for (index, entry) in entries.iter().enumerate() {
            let href = entry.get("href").and_then(|v| v.as_str()).unwrap_or_default();
            let rel = entry.get("rel").and_then(|v| v.as_str()).unwrap_or_default();
            if href.is_empty() || rel.is_empty() {
                return Err(format!("links[{index}] is missing 'href' or 'rel'"));
            }
        }
    }

    Ok(())
}
