//! Tenant Config Engine
//!
//! Validation and safe-merge engine for per-tenant chatbot configuration
//! documents. Editors change programs, forms, CTAs and conversation branches;
//! the engine makes sure those edits cannot break the document.
//!
//! ## Features
//!
//! - **Entity Schemas**: field-level and whole-entity validation with normalization
//! - **Referential Integrity**: every cross-entity id must resolve
//! - **Safe Delete**: one-hop dependents of any entity
//! - **Section Merge**: edits touch editable sections only, read-only ones survive
//! - **Diff**: per-section added/removed/modified summary
//!
//! ## Architecture
//!
//! ```text
//! edited ──► merge ──► schema ──► integrity ──► diff ──► ConfigStore::save
//!              ▲                      │
//!    ConfigStore::load            dependency (safe delete)
//! ```
//!
//! Everything but [`store`] and [`pipeline`] is pure and synchronous.

pub mod checksum;
pub mod config;
pub mod dependency;
pub mod diff;
pub mod document;
pub mod error;
pub mod integrity;
pub mod issue;
pub mod merge;
pub mod pipeline;
pub mod schema;
pub mod store;
pub mod version;

pub use checksum::Checksum;
pub use config::EngineConfig;
pub use dependency::{can_delete, dependents, DependencyGraph, Dependents, EntityRef};
pub use diff::{diff, ConfigDiff};
pub use document::{Document, TenantConfig};
pub use error::{EngineError, Result};
pub use integrity::{check_references, ReferenceChecker};
pub use issue::{EntityType, Severity, ValidationIssue, ValidationReport};
pub use merge::{extract_editable, merge, merge_multiple_section_updates, MergeOutcome};
pub use pipeline::{validate_document, ConfigEditor, SaveRequest};
pub use schema::{validate, validate_tenant_config};
pub use store::{BackupInfo, ConfigStore, FileStore, MemoryStore};
pub use version::ConfigVersion;
