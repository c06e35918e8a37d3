//! Load → merge → validate → save
//!
//! [`ConfigEditor`] ties the pure engine to a [`ConfigStore`]. It re-loads the
//! base on every call and compares stored versions so a stale editor gets a
//! [`EngineError::Conflict`] instead of silently overwriting someone else's
//! save. It takes no locks: callers serialize writes per tenant.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ValidationConfig;
use crate::dependency::{DependencyGraph, Dependents, EntityRef};
use crate::diff::{diff, ConfigDiff};
use crate::document::{Document, TenantConfig};
use crate::error::{EngineError, Result};
use crate::integrity::ReferenceChecker;
use crate::issue::{EntityType, ValidationIssue, ValidationReport};
use crate::merge::{merge, MergeOutcome};
use crate::schema::validate_tenant_config;
use crate::store::ConfigStore;
use crate::version::ConfigVersion;

/// Run the entity validators and, if they pass, the integrity checker.
///
/// Returns the typed view when the document is structurally valid.
pub fn validate_document(
    document: &Document,
    suggest_fixes: bool,
) -> (Option<TenantConfig>, ValidationReport) {
    match validate_tenant_config(document) {
        Ok(config) => {
            let issues = ReferenceChecker::new(&config).suggest_fixes(suggest_fixes).check();
            (Some(config), ValidationReport::from_issues(issues))
        }
        Err(issues) => (None, ValidationReport::from_issues(issues)),
    }
}

/// An edit to persist
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub tenant: String,
    pub edited: Document,
    /// Version the editor started from; a mismatch is a conflict
    pub expected_version: Option<String>,
    /// Bump the minor version of the merged document
    pub bump: bool,
}

impl SaveRequest {
    pub fn new(tenant: impl Into<String>, edited: Document) -> Self {
        Self {
            tenant: tenant.into(),
            edited,
            expected_version: None,
            bump: false,
        }
    }

    pub fn expect_version(mut self, version: impl Into<String>) -> Self {
        self.expected_version = Some(version.into());
        self
    }

    pub fn bump_version(mut self) -> Self {
        self.bump = true;
        self
    }
}

/// Result of a dry run; nothing is persisted
#[derive(Debug, Clone, Serialize)]
pub struct DryRun {
    pub document: Document,
    pub report: ValidationReport,
    pub diff: ConfigDiff,
    pub ignored_read_only: Vec<String>,
}

/// Result of a successful save
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub document: Document,
    pub version: Option<String>,
    /// Non-blocking issues
    pub warnings: Vec<ValidationIssue>,
    pub diff: ConfigDiff,
    pub ignored_read_only: Vec<String>,
}

pub struct ConfigEditor<S: ConfigStore> {
    store: S,
    validation: ValidationConfig,
}

impl<S: ConfigStore> ConfigEditor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            validation: ValidationConfig::default(),
        }
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge and validate without saving
    pub fn dry_run(&self, tenant: &str, edited: &Document) -> Result<DryRun> {
        let base = self.store.load(tenant)?;
        let (outcome, report) = self.merge_and_validate(&base, edited);
        let diff = diff(&base, &outcome.document);
        debug!(
            tenant,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "dry run complete"
        );
        Ok(DryRun {
            document: outcome.document,
            report,
            diff,
            ignored_read_only: outcome.ignored_read_only,
        })
    }

    /// Merge, validate and persist an edit
    pub fn save(&self, request: SaveRequest) -> Result<SaveOutcome> {
        let tenant = request.tenant.as_str();
        let base = self.store.load(tenant)?;
        self.check_version(tenant, &base, request.expected_version.as_deref())?;

        let (outcome, report) = self.merge_and_validate(&base, &request.edited);
        if report.blocks_save(self.validation.fail_on_warnings) {
            warn!(
                tenant,
                errors = report.error_count(),
                warnings = report.warning_count(),
                "save rejected"
            );
            return Err(EngineError::Validation {
                issues: report.into_issues(),
            });
        }

        let mut document = outcome.document;
        if request.bump {
            let current = document.version().unwrap_or_default();
            let next = ConfigVersion::parse(current)?.bump_minor();
            info!(tenant, from = current, to = %next, "bumping version");
            document.insert("version".to_string(), Value::String(next.to_string()));
        }

        let diff = diff(&base, &document);
        diff.log(tenant);
        self.store.save(tenant, &document)?;

        Ok(SaveOutcome {
            version: document.version().map(str::to_string),
            document,
            warnings: report.warnings().cloned().collect(),
            diff,
            ignored_read_only: outcome.ignored_read_only,
        })
    }

    /// One-hop dependents of an entity in the stored document
    pub fn dependents(
        &self,
        tenant: &str,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Dependents> {
        let config = self.load_valid(tenant)?.1;
        Ok(DependencyGraph::build(&config).dependents(&EntityRef::new(entity_type, entity_id)))
    }

    /// Remove an entity nothing references
    pub fn delete_entity(
        &self,
        tenant: &str,
        entity_type: EntityType,
        entity_id: &str,
        expected_version: Option<&str>,
    ) -> Result<Document> {
        let (base, config) = self.load_valid(tenant)?;
        self.check_version(tenant, &base, expected_version)?;

        let not_found = || EngineError::EntityNotFound {
            entity_type,
            entity_id: entity_id.to_string(),
        };
        if !config.contains(entity_type, entity_id) {
            return Err(not_found());
        }

        let dependents =
            DependencyGraph::build(&config).dependents(&EntityRef::new(entity_type, entity_id));
        if !dependents.is_empty() {
            warn!(
                tenant,
                entity = %entity_type,
                id = entity_id,
                dependents = dependents.len(),
                "delete blocked"
            );
            return Err(EngineError::DeletionBlocked {
                entity_type,
                entity_id: entity_id.to_string(),
                dependents,
            });
        }

        let key = entity_type.collection_key().ok_or_else(not_found)?;
        let mut collection = base.collection(entity_type).cloned().unwrap_or_default();
        collection.remove(entity_id);
        let mut edit = Document::new();
        edit.insert(key.to_string(), Value::Object(collection));

        let (outcome, report) = self.merge_and_validate(&base, &edit);
        if report.has_errors() {
            return Err(EngineError::Validation {
                issues: report.into_issues(),
            });
        }

        self.store.save(tenant, &outcome.document)?;
        info!(tenant, entity = %entity_type, id = entity_id, "deleted entity");
        Ok(outcome.document)
    }

    fn merge_and_validate(
        &self,
        base: &Document,
        edited: &Document,
    ) -> (MergeOutcome, ValidationReport) {
        let outcome = merge(base, edited);
        let (_, mut report) = validate_document(&outcome.document, self.validation.suggest_fixes);
        report.extend(outcome.unknown_sections.iter().cloned());
        report.sort();
        (outcome, report)
    }

    fn load_valid(&self, tenant: &str) -> Result<(Document, TenantConfig)> {
        let base = self.store.load(tenant)?;
        let config =
            validate_tenant_config(&base).map_err(|issues| EngineError::Validation { issues })?;
        Ok((base, config))
    }

    fn check_version(&self, tenant: &str, base: &Document, expected: Option<&str>) -> Result<()> {
        let Some(expected) = expected else {
            return Ok(());
        };
        let actual = base.version().unwrap_or_default();
        if actual != expected {
            warn!(tenant, expected, actual, "version conflict");
            return Err(EngineError::Conflict {
                tenant: tenant.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}
