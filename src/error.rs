//! Application error types with stable machine codes.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ComplexityLevel;
use crate::services::SchemaViolation;

/// Application-level errors for Vademecum.
#[derive(Error, Debug)]
pub enum AppError {
    // Lookup errors
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Level {requested} not found (valid range {})", format_range(.valid_range))]
    LevelNotFound { requested: i64, valid_range: [u8; 2] },

    #[error("Unknown level '{0}'. Use a rank 1-5 or one of: child, patient, nursing, student, physician")]
    UnknownLevel(String),

    // Load-time errors
    #[error("Duplicate id '{id}' (entries #{first} and #{second})")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("Schema validation failed with {}", describe_violations(.0))]
    Schema(Vec<SchemaViolation>),

    #[error("Invalid content in {}: {message}", .path.display())]
    Content { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Out-of-range level request against the fixed 1-5 tiers.
    pub fn level_not_found(requested: i64) -> Self {
        AppError::LevelNotFound {
            requested,
            valid_range: ComplexityLevel::valid_range(),
        }
    }

    /// Stable code for callers that branch on the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            AppError::LevelNotFound { .. } => "LEVEL_NOT_FOUND",
            AppError::UnknownLevel(_) => "UNKNOWN_LEVEL",
            AppError::DuplicateId { .. } => "DUPLICATE_ID",
            AppError::Schema(_) => "SCHEMA_VIOLATION",
            AppError::Content { .. } => "CONTENT_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the error is an expected "no content" outcome rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::EntityNotFound(_) | AppError::LevelNotFound { .. }
        )
    }
}

fn format_range(range: &[u8; 2]) -> String {
    format!("{}-{}", range[0], range[1])
}

fn describe_violations(violations: &[SchemaViolation]) -> String {
    let lines: Vec<String> = violations.iter().map(|v| format!("  - {v}")).collect();
    format!("{} violation(s):\n{}", violations.len(), lines.join("\n"))
}
