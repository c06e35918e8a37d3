//! Diff Reporter
//!
//! Human-oriented summary of what changed between two documents. The
//! result is informational only: nothing in the engine branches on it.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use tracing::info;

use crate::document::{keys, Document};
use crate::merge::METADATA_FIELDS;

/// Restamped by every merge, so never reported
const IGNORED_METADATA: &[&str] = &[keys::LAST_UPDATED, keys::GENERATED_AT];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub old: Option<Value>,
    pub new: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionChange {
    pub old_count: usize,
    pub new_count: usize,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl SectionChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigDiff {
    pub metadata_changes: BTreeMap<String, FieldChange>,
    pub section_changes: BTreeMap<String, SectionChange>,
    pub has_changes: bool,
}

/// Compare two documents.
///
/// Metadata fields compare by value. Every other top-level key is treated as
/// a collection: objects by key, arrays by element `id` (index when absent),
/// and scalars as a single item named after the section.
pub fn diff(old: &Document, new: &Document) -> ConfigDiff {
    let mut result = ConfigDiff::default();

    for field in METADATA_FIELDS {
        if IGNORED_METADATA.contains(field) {
            continue;
        }
        let before = old.get(*field);
        let after = new.get(*field);
        if before != after {
            result.metadata_changes.insert(
                field.to_string(),
                FieldChange {
                    old: before.cloned(),
                    new: after.cloned(),
                },
            );
        }
    }

    let sections: BTreeSet<&String> = old
        .keys()
        .chain(new.keys())
        .filter(|key| !METADATA_FIELDS.contains(&key.as_str()))
        .collect();

    for section in sections {
        let before = items(section, old.get(section.as_str()));
        let after = items(section, new.get(section.as_str()));
        let change = compare(&before, &after);
        if !change.is_empty() {
            result.section_changes.insert(section.clone(), change);
        }
    }

    result.has_changes =
        !result.metadata_changes.is_empty() || !result.section_changes.is_empty();
    result
}

/// Flatten a section into id-keyed items. A repeated id gets an `#n` suffix
fn items<'a>(section: &str, value: Option<&'a Value>) -> BTreeMap<String, &'a Value> {
    match value {
        None => BTreeMap::new(),
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Some(Value::Array(list)) => {
            let mut seen: BTreeMap<String, usize> = BTreeMap::new();
            list.iter()
                .enumerate()
                .map(|(index, item)| {
                    let key = element_key(item, index);
                    let occurrence = seen.entry(key.clone()).or_insert(0);
                    let key = match *occurrence {
                        0 => key,
                        n => format!("{}#{}", key, n),
                    };
                    *occurrence += 1;
                    (key, item)
                })
                .collect()
        }
        Some(scalar) => BTreeMap::from([(section.to_string(), scalar)]),
    }
}

fn element_key(item: &Value, index: usize) -> String {
    match item.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("[{}]", index),
    }
}

fn compare(
    before: &BTreeMap<String, &Value>,
    after: &BTreeMap<String, &Value>,
) -> SectionChange {
    let mut change = SectionChange {
        old_count: before.len(),
        new_count: after.len(),
        ..Default::default()
    };

    for (key, new_value) in after {
        match before.get(key) {
            None => change.added.push(key.clone()),
            Some(old_value) if old_value != new_value => change.modified.push(key.clone()),
            Some(_) => {}
        }
    }
    change.removed = before
        .keys()
        .filter(|key| !after.contains_key(*key))
        .cloned()
        .collect();
    change
}

impl ConfigDiff {
    /// Emit the diff through `tracing`
    pub fn log(&self, tenant: &str) {
        if !self.has_changes {
            info!(tenant, "no changes");
            return;
        }
        for (field, change) in &self.metadata_changes {
            info!(
                tenant,
                field = %field,
                old = %render(&change.old),
                new = %render(&change.new),
                "metadata changed"
            );
        }
        for (section, change) in &self.section_changes {
            info!(
                tenant,
                section = %section,
                old_count = change.old_count,
                new_count = change.new_count,
                added = ?change.added,
                removed = ?change.removed,
                modified = ?change.modified,
                "section changed"
            );
        }
    }

    /// Multi-line plain text summary
    pub fn summary(&self) -> String {
        if !self.has_changes {
            return "no changes".to_string();
        }

        let mut out = String::new();
        for (field, change) in &self.metadata_changes {
            let _ = writeln!(
                out,
                "{}: {} -> {}",
                field,
                render(&change.old),
                render(&change.new)
            );
        }
        for (section, change) in &self.section_changes {
            let _ = write!(out, "{}: {} -> {}", section, change.old_count, change.new_count);
            let groups = [
                ("+", &change.added),
                ("-", &change.removed),
                ("~", &change.modified),
            ];
            for (label, ids) in groups {
                if !ids.is_empty() {
                    let _ = write!(out, " {}[{}]", label, ids.join(", "));
                }
            }
            out.push('\n');
        }
        out
    }
}

fn render(value: &Option<Value>) -> String {
    match value {
        None => "(unset)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
