//! Validate command handler.

use std::path::PathBuf;
use std::process::ExitCode;

use color_eyre::Result;
use serde::Serialize;

use crate::config::Config;
use crate::services::{validate_all, SchemaViolation};
use crate::source::ContentSource;

use super::{print_json, App};

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    files: Vec<PathBuf>,
    entities: usize,
    categories: usize,
    violations: Vec<SchemaViolation>,
}

impl App {
    /// Run the validate command: read content, check every rule, report.
    pub fn run_validate(&self, config: &Config) -> Result<ExitCode> {
        let paths = config.content.effective_paths();
        tracing::info!(paths = ?paths, "Validating content");

        let source = ContentSource::from_paths(&paths)?;
        let violations = validate_all(&source.taxonomy, &source.entities);

        if violations.is_empty() {
            tracing::info!(entities = source.entities.len(), "Content is valid");
        } else {
            for violation in &violations {
                tracing::warn!(%violation, "Schema violation");
            }
        }

        let report = ValidationReport {
            valid: violations.is_empty(),
            files: source.files,
            entities: source.entities.len(),
            categories: source.taxonomy.len(),
            violations,
        };
        print_json(&report)?;

        Ok(if report.valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
