//! Configuration document types
//!
//! A tenant configuration travels as a JSON object ([`Document`]). The engine
//! merges and diffs documents directly so that sections it does not
//! understand survive byte-for-byte. [`TenantConfig`] is the typed view the
//! entity validators produce; the integrity checker and the dependency graph
//! work on it.
//!
//! ## Layout
//!
//! ```text
//! {
//!   "tenant_id": "acme",
//!   "version": "1.3",
//!   "programs":              { "<id>": Program, ... },
//!   "conversational_forms":  { "<id>": ConversationalForm, ... },
//!   "cta_definitions":       { "<id>": CtaDefinition, ... },
//!   "conversation_branches": { "<id>": ConversationBranch, ... },
//!   "features": { "conversational_forms": true, ... },
//!   "branding": { ... }, "aws": { ... }, ...
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::error::EngineError;
use crate::issue::EntityType;

/// Top-level document keys the engine reads
pub mod keys {
    pub const TENANT_ID: &str = "tenant_id";
    pub const VERSION: &str = "version";
    pub const LAST_UPDATED: &str = "last_updated";
    pub const GENERATED_AT: &str = "generated_at";
    pub const PROGRAMS: &str = "programs";
    pub const FORMS: &str = "conversational_forms";
    pub const CTAS: &str = "cta_definitions";
    pub const BRANCHES: &str = "conversation_branches";
    pub const FEATURES: &str = "features";

    /// Keys holding entity collections, in entity-type order
    pub const ENTITY_COLLECTIONS: &[&str] = &[PROGRAMS, FORMS, CTAS, BRANCHES];
}

// =============================================================================
// Document
// =============================================================================

/// Raw configuration document: a JSON object, full or partial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; anything but an object is rejected
    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(EngineError::InvalidDocument(format!(
                "expected a JSON object at the document root, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.0.get(keys::TENANT_ID).and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.0.get(keys::VERSION).and_then(Value::as_str)
    }

    /// Entity collection for a type, if present and an object
    pub fn collection(&self, entity_type: EntityType) -> Option<&Map<String, Value>> {
        let key = entity_type.collection_key()?;
        self.0.get(key).and_then(Value::as_object)
    }

    pub fn collection_mut(&mut self, entity_type: EntityType) -> Option<&mut Map<String, Value>> {
        let key = entity_type.collection_key()?;
        self.0.get_mut(key).and_then(Value::as_object_mut)
    }
}

impl Deref for Document {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = EngineError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Human name of a JSON value's kind, for messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Entities
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Input type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Select,
    Textarea,
    Number,
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Select,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Date => "date",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub prompt: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Answer decides eligibility; only meaningful on `select` fields
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub eligibility_gate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalForm {
    pub id: String,
    pub program_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub trigger_phrases: Vec<String>,
    pub fields: Vec<FormField>,
}

/// What a CTA button does when pressed. Each action owns only its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CtaAction {
    StartForm {
        #[serde(rename = "formId")]
        form_id: String,
    },
    ExternalLink {
        url: String,
    },
    SendQuery {
        query: String,
    },
    ShowInfo {
        prompt: String,
    },
}

impl CtaAction {
    /// All action tags with the payload field each one owns
    pub const PAYLOADS: [(&'static str, &'static str); 4] = [
        ("start_form", "formId"),
        ("external_link", "url"),
        ("send_query", "query"),
        ("show_info", "prompt"),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CtaAction::StartForm { .. } => "start_form",
            CtaAction::ExternalLink { .. } => "external_link",
            CtaAction::SendQuery { .. } => "send_query",
            CtaAction::ShowInfo { .. } => "show_info",
        }
    }

    /// Form this action opens, if any
    pub fn target_form(&self) -> Option<&str> {
        match self {
            CtaAction::StartForm { form_id } => Some(form_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaDefinition {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub action: CtaAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationBranch {
    pub id: String,
    pub detection_keywords: Vec<String>,
    pub primary_cta: String,
    #[serde(default)]
    pub secondary_ctas: Vec<String>,
}

impl ConversationBranch {
    /// Primary CTA first, then secondaries in order
    pub fn cta_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_cta.as_str())
            .chain(self.secondary_ctas.iter().map(String::as_str))
    }
}

// =============================================================================
// Tenant Config
// =============================================================================

/// Typed, validated view of a tenant document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantConfig {
    pub tenant_id: String,
    pub version: String,
    pub programs: BTreeMap<String, Program>,
    pub forms: BTreeMap<String, ConversationalForm>,
    pub ctas: BTreeMap<String, CtaDefinition>,
    pub branches: BTreeMap<String, ConversationBranch>,
    /// Feature flags; only boolean values are ever read
    pub features: Map<String, Value>,
    /// Every other top-level key, uninterpreted
    pub other: Map<String, Value>,
}

impl TenantConfig {
    pub fn new(tenant_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    /// A flag counts as enabled only when it is literally `true`
    pub fn feature_enabled(&self, flag: &str) -> bool {
        self.features.get(flag).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn contains(&self, entity_type: EntityType, id: &str) -> bool {
        match entity_type {
            EntityType::Program => self.programs.contains_key(id),
            EntityType::Form => self.forms.contains_key(id),
            EntityType::Cta => self.ctas.contains_key(id),
            EntityType::Branch => self.branches.contains_key(id),
            _ => false,
        }
    }

    /// Sorted ids of one entity collection
    pub fn ids(&self, entity_type: EntityType) -> Vec<&str> {
        match entity_type {
            EntityType::Program => self.programs.keys().map(String::as_str).collect(),
            EntityType::Form => self.forms.keys().map(String::as_str).collect(),
            EntityType::Cta => self.ctas.keys().map(String::as_str).collect(),
            EntityType::Branch => self.branches.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn collection_len(&self, entity_type: EntityType) -> usize {
        match entity_type {
            EntityType::Program => self.programs.len(),
            EntityType::Form => self.forms.len(),
            EntityType::Cta => self.ctas.len(),
            EntityType::Branch => self.branches.len(),
            _ => 0,
        }
    }

    /// Serialize back into a document with the normalized entities
    pub fn to_document(&self) -> serde_json::Result<Document> {
        let mut map = self.other.clone();
        map.insert(keys::TENANT_ID.to_string(), Value::String(self.tenant_id.clone()));
        map.insert(keys::VERSION.to_string(), Value::String(self.version.clone()));
        map.insert(keys::PROGRAMS.to_string(), serde_json::to_value(&self.programs)?);
        map.insert(keys::FORMS.to_string(), serde_json::to_value(&self.forms)?);
        map.insert(keys::CTAS.to_string(), serde_json::to_value(&self.ctas)?);
        map.insert(keys::BRANCHES.to_string(), serde_json::to_value(&self.branches)?);
        if !self.features.is_empty() {
            map.insert(keys::FEATURES.to_string(), Value::Object(self.features.clone()));
        }
        Ok(Document(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_rejects_non_object() {
        assert!(Document::from_value(json!([1, 2])).is_err());
        let doc = Document::from_value(json!({"tenant_id": "acme", "version": "1.0"})).unwrap();
        assert_eq!(doc.tenant_id(), Some("acme"));
        assert_eq!(doc.version(), Some("1.0"));
    }

    #[test]
    fn test_cta_serializes_tagged() {
        let cta = CtaDefinition {
            id: "apply_now".into(),
            label: "Apply".into(),
            color: None,
            action: CtaAction::StartForm { form_id: "apply".into() },
        };
        let value = serde_json::to_value(&cta).unwrap();
        assert_eq!(
            value,
            json!({"id": "apply_now", "label": "Apply", "action": "start_form", "formId": "apply"})
        );

        let back: CtaDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(back, cta);
    }

    #[test]
    fn test_feature_enabled_requires_true() {
        let mut config = TenantConfig::new("acme", "1.0");
        config.features.insert("a".into(), json!(true));
        config.features.insert("b".into(), json!("true"));
        assert!(config.feature_enabled("a"));
        assert!(!config.feature_enabled("b"));
        assert!(!config.feature_enabled("missing"));
    }

    #[test]
    fn test_to_document_keeps_other_sections() {
        let mut config = TenantConfig::new("acme", "1.2");
        config.other.insert("branding".into(), json!({"primary_color": "#000"}));
        let doc = config.to_document().unwrap();
        assert_eq!(doc["branding"], json!({"primary_color": "#000"}));
        assert_eq!(doc["programs"], json!({}));
        assert!(doc.get("features").is_none());
    }
}
