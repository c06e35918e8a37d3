//! Error types for the configuration engine
//!
//! Validation problems are never errors: validators and the integrity checker
//! return [`ValidationIssue`] lists. `EngineError` covers the storage boundary
//! and the orchestration layer that sits on top of it.

use thiserror::Error;

use crate::dependency::Dependents;
use crate::issue::{EntityType, ValidationIssue};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Tenant configuration not found: {tenant}")]
    NotFound { tenant: String },

    #[error("Version conflict for tenant {tenant}: expected {expected}, stored {actual}")]
    Conflict {
        tenant: String,
        expected: String,
        actual: String,
    },

    #[error("Validation failed with {} issue(s)", issues.len())]
    Validation { issues: Vec<ValidationIssue> },

    #[error(
        "Cannot delete {entity_type} '{entity_id}': {} dependent(s) still reference it",
        dependents.len()
    )]
    DeletionBlocked {
        entity_type: EntityType,
        entity_id: String,
        dependents: Dependents,
    },

    #[error("Entity not found: {entity_type} '{entity_id}'")]
    EntityNotFound {
        entity_type: EntityType,
        entity_id: String,
    },

    #[error("Invalid tenant key: {0}")]
    InvalidTenantKey(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
