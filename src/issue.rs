//! Validation issues
//!
//! Every check in the engine reports problems as [`ValidationIssue`] records
//! instead of failing. Callers decide whether a save may proceed: any
//! `error` blocks, `warning`s never do (unless the caller opts in).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Severity
// =============================================================================

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Entity Type
// =============================================================================

/// Kind of entity an issue is attached to.
///
/// The declaration order is the stable output order of the integrity checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// The root document (tenant id, version, envelope shape)
    Tenant,
    /// A top-level section key (unknown sections during merge)
    Section,
    Program,
    Form,
    Field,
    Cta,
    Branch,
    /// A feature flag inside the `features` section
    Feature,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Section => "section",
            Self::Program => "program",
            Self::Form => "form",
            Self::Field => "field",
            Self::Cta => "cta",
            Self::Branch => "branch",
            Self::Feature => "feature",
        }
    }

    /// Top-level collection key holding entities of this type, if any
    pub fn collection_key(&self) -> Option<&'static str> {
        match self {
            Self::Program => Some("programs"),
            Self::Form => Some("conversational_forms"),
            Self::Cta => Some("cta_definitions"),
            Self::Branch => Some("conversation_branches"),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tenant" => Ok(Self::Tenant),
            "section" => Ok(Self::Section),
            "program" | "programs" => Ok(Self::Program),
            "form" | "forms" | "conversational_form" | "conversational_forms" => Ok(Self::Form),
            "field" | "form_field" => Ok(Self::Field),
            "cta" | "ctas" | "cta_definition" | "cta_definitions" => Ok(Self::Cta),
            "branch" | "branches" | "conversation_branch" | "conversation_branches" => {
                Ok(Self::Branch)
            }
            "feature" => Ok(Self::Feature),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}

// =============================================================================
// Validation Issue
// =============================================================================

/// A single problem found in a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub entity_type: EntityType,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            entity_type,
            entity_id: entity_id.into(),
            field: None,
            message: message.into(),
            suggested_fix: None,
        }
    }

    pub fn error(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, entity_type, entity_id, message)
    }

    pub fn warning(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, entity_type, entity_id, message)
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_suggestion(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Sort key: entity type, then entity id, then field
    fn sort_key(&self) -> (EntityType, &str, &str) {
        (
            self.entity_type,
            self.entity_id.as_str(),
            self.field.as_deref().unwrap_or(""),
        )
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} '{}'", self.severity, self.entity_type, self.entity_id)?;
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Stable sort of issues by entity type, entity id, then field.
///
/// Issues sharing a key keep their emission order.
pub fn sort_issues(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

// =============================================================================
// Validation Report
// =============================================================================

/// Collection of issues from one or more validation passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Whether a save must be refused
    pub fn blocks_save(&self, fail_on_warnings: bool) -> bool {
        self.has_errors() || (fail_on_warnings && self.warning_count() > 0)
    }

    pub fn all(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn sort(&mut self) {
        sort_issues(&mut self.issues);
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationIssue;
    type IntoIter = std::slice::Iter<'a, ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
