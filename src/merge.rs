//! Section Merge Engine
//!
//! Folds an edited (possibly partial) document into the stored base so
//! editors can only touch what they own. Every top-level key falls into
//! one of three classes:
//!
//! | Class | Behaviour |
//! |-------|-----------|
//! | editable | replaced wholesale by the edited value |
//! | metadata | scalar overwrite |
//! | read-only | always kept from the base |
//!
//! Keys outside all three are dropped with a warning. Merge never fails.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{keys, Document};
use crate::issue::{EntityType, ValidationIssue};

pub const EDITABLE_SECTIONS: &[&str] = &[
    "programs",
    "conversational_forms",
    "cta_definitions",
    "conversation_branches",
    "content_showcase",
    "cta_settings",
    "bedrock_instructions",
    "action_chips",
];

pub const METADATA_FIELDS: &[&str] = &[
    "tenant_id",
    "tenant_hash",
    "version",
    "chat_title",
    "company_name",
    "last_updated",
    "generated_at",
    "tone_prompt",
    "welcome_message",
    "callout_text",
    "model_id",
    "subscription_tier",
];

pub const READ_ONLY_SECTIONS: &[&str] = &[
    "branding",
    "features",
    "quick_help",
    "widget_behavior",
    "aws",
    "card_inventory",
];

/// Merge class of a top-level key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Editable,
    Metadata,
    ReadOnly,
    Unknown,
}

pub fn classify(key: &str) -> SectionKind {
    if EDITABLE_SECTIONS.contains(&key) {
        SectionKind::Editable
    } else if METADATA_FIELDS.contains(&key) {
        SectionKind::Metadata
    } else if READ_ONLY_SECTIONS.contains(&key) {
        SectionKind::ReadOnly
    } else {
        SectionKind::Unknown
    }
}

/// Result of one or more merges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub document: Document,
    /// Read-only keys the edit tried to change
    pub ignored_read_only: Vec<String>,
    /// One warning per unrecognized top-level key
    pub unknown_sections: Vec<ValidationIssue>,
}

impl MergeOutcome {
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Merge `edited` into `base`, stamping `last_updated` with the current time
pub fn merge(base: &Document, edited: &Document) -> MergeOutcome {
    merge_at(base, edited, Utc::now())
}

/// Merge with an explicit timestamp
pub fn merge_at(base: &Document, edited: &Document, now: DateTime<Utc>) -> MergeOutcome {
    let mut merged = base.clone();
    let mut ignored_read_only = Vec::new();
    let mut unknown_sections = Vec::new();

    for (key, value) in edited.iter() {
        match classify(key) {
            SectionKind::Editable | SectionKind::Metadata => {
                merged.insert(key.clone(), value.clone());
            }
            SectionKind::ReadOnly => {
                info!(section = %key, "ignoring edit to read-only section");
                ignored_read_only.push(key.clone());
            }
            SectionKind::Unknown => {
                warn!(section = %key, "ignoring unknown section");
                unknown_sections.push(
                    ValidationIssue::warning(
                        EntityType::Section,
                        key.clone(),
                        "unknown section ignored during merge",
                    )
                    .with_suggestion(format!(
                        "remove '{}' or move it into an editable section",
                        key
                    )),
                );
            }
        }
    }

    // Tenant identity always comes from the stored document
    match base.get(keys::TENANT_ID) {
        Some(tenant_id) => {
            merged.insert(keys::TENANT_ID.to_string(), tenant_id.clone());
        }
        None => {
            merged.remove(keys::TENANT_ID);
        }
    }

    merged.insert(
        keys::LAST_UPDATED.to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    debug!(
        edited_keys = edited.len(),
        ignored = ignored_read_only.len(),
        unknown = unknown_sections.len(),
        "merged document"
    );

    MergeOutcome {
        document: merged,
        ignored_read_only,
        unknown_sections,
    }
}

/// Apply several partial edits in order; later edits win
pub fn merge_multiple_section_updates(base: &Document, updates: &[Document]) -> MergeOutcome {
    merge_multiple_section_updates_at(base, updates, Utc::now())
}

pub fn merge_multiple_section_updates_at(
    base: &Document,
    updates: &[Document],
    now: DateTime<Utc>,
) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        document: base.clone(),
        ignored_read_only: Vec::new(),
        unknown_sections: Vec::new(),
    };

    for update in updates {
        let step = merge_at(&outcome.document, update, now);
        outcome.document = step.document;
        for key in step.ignored_read_only {
            if !outcome.ignored_read_only.contains(&key) {
                outcome.ignored_read_only.push(key);
            }
        }
        outcome.unknown_sections.extend(step.unknown_sections);
    }

    outcome
}

/// Only the editable sections of a document
pub fn extract_editable(document: &Document) -> Document {
    document
        .iter()
        .filter(|(key, _)| classify(key) == SectionKind::Editable)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<serde_json::Map<String, Value>>()
        .into()
}
