//! Entity Schemas
//!
//! One validator per entity type. Validators are pure: they look at a single
//! raw JSON value, collect every problem they find (field checks first, then
//! whole-entity rules) and either return the normalized entity or the full
//! issue list. Nothing here knows about other entities; cross-references are
//! the integrity checker's job.
//!
//! Normalization trims surrounding whitespace from strings, fills defaults
//! for absent optional collections and drops keys no entity defines. A
//! normalized entity serializes back into a value that validates cleanly.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};

use crate::document::{
    json_kind, keys, ConversationBranch, ConversationalForm, CtaAction, CtaDefinition, Document,
    FieldType, FormField, Program, SelectOption, TenantConfig,
};
use crate::issue::{sort_issues, EntityType, ValidationIssue};

pub const MAX_ID_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_PROMPT_LEN: usize = 500;
pub const MAX_CTA_LABEL_LEN: usize = 60;
pub const MAX_DETECTION_KEYWORDS: usize = 20;
/// A branch shows at most three buttons: one primary plus secondaries
pub const MAX_BRANCH_CTAS: usize = 3;
pub const MAX_SECONDARY_CTAS: usize = MAX_BRANCH_CTAS - 1;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .unwrap()
});

static HEX_COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Shape of the document root. Presence of `tenant_id`/`version` is checked
/// by hand so the issue can name the field.
static ENVELOPE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "tenant_id": { "type": "string", "minLength": 1 },
            "version": { "type": "string", "pattern": r"^\d+\.\d+(\.\d+)?$" },
            "programs": { "type": "object" },
            "conversational_forms": { "type": "object" },
            "cta_definitions": { "type": "object" },
            "conversation_branches": { "type": "object" },
            "features": { "type": "object" }
        }
    })
});

static ENVELOPE_VALIDATOR: Lazy<JSONSchema> =
    Lazy::new(|| JSONSchema::compile(&ENVELOPE_SCHEMA).expect("envelope schema is valid"));

/// Whether `id` is a well-formed entity id
pub fn is_valid_id(id: &str) -> bool {
    id.len() <= MAX_ID_LEN && ID_PATTERN.is_match(id)
}

pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR_PATTERN.is_match(color)
}

// =============================================================================
// Normalized entities
// =============================================================================

/// Output of a successful [`validate`] call
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedEntity {
    Program(Program),
    Form(ConversationalForm),
    Field(FormField),
    Cta(CtaDefinition),
    Branch(ConversationBranch),
    Tenant(Box<TenantConfig>),
}

impl NormalizedEntity {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Program(_) => EntityType::Program,
            Self::Form(_) => EntityType::Form,
            Self::Field(_) => EntityType::Field,
            Self::Cta(_) => EntityType::Cta,
            Self::Branch(_) => EntityType::Branch,
            Self::Tenant(_) => EntityType::Tenant,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::Program(p) => serde_json::to_value(p),
            Self::Form(f) => serde_json::to_value(f),
            Self::Field(f) => serde_json::to_value(f),
            Self::Cta(c) => serde_json::to_value(c),
            Self::Branch(b) => serde_json::to_value(b),
            Self::Tenant(t) => t.to_document().map(Document::into_value),
        }
    }
}

/// Validate one raw entity of the given type
pub fn validate(
    entity_type: EntityType,
    raw: &Value,
) -> Result<NormalizedEntity, Vec<ValidationIssue>> {
    match entity_type {
        EntityType::Program => validate_program(raw).map(NormalizedEntity::Program),
        EntityType::Form => validate_form(raw).map(NormalizedEntity::Form),
        EntityType::Field => validate_form_field(raw).map(NormalizedEntity::Field),
        EntityType::Cta => validate_cta(raw).map(NormalizedEntity::Cta),
        EntityType::Branch => validate_branch(raw).map(NormalizedEntity::Branch),
        EntityType::Tenant => match raw {
            Value::Object(map) => validate_tenant_config(&Document::from(map.clone()))
                .map(|config| NormalizedEntity::Tenant(Box::new(config))),
            other => Err(vec![ValidationIssue::error(
                EntityType::Tenant,
                "",
                format!("expected an object, found {}", json_kind(other)),
            )]),
        },
        EntityType::Section | EntityType::Feature => Err(vec![ValidationIssue::error(
            entity_type,
            "",
            format!("no schema is defined for {} values", entity_type),
        )]),
    }
}

// =============================================================================
// Field checker
// =============================================================================

/// Accumulates issues for one entity while reading its fields
struct FieldChecker<'a> {
    entity_type: EntityType,
    entity_id: String,
    object: &'a Map<String, Value>,
    issues: Vec<ValidationIssue>,
}

impl<'a> FieldChecker<'a> {
    fn new(entity_type: EntityType, raw: &'a Value) -> Result<Self, Vec<ValidationIssue>> {
        let Some(object) = raw.as_object() else {
            return Err(vec![ValidationIssue::error(
                entity_type,
                "",
                format!("expected an object, found {}", json_kind(raw)),
            )]);
        };
        let entity_id = object
            .get("id")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        Ok(Self {
            entity_type,
            entity_id,
            object,
            issues: Vec::new(),
        })
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(
            ValidationIssue::error(self.entity_type, self.entity_id.clone(), message)
                .with_field(field),
        );
    }

    /// Field value, treating `null` as absent
    fn present(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|v| !v.is_null())
    }

    fn string(&mut self, field: &str, min: usize, max: usize) -> Option<String> {
        match self.present(field) {
            None => {
                self.error(field, format!("{} is required", field));
                None
            }
            Some(Value::String(s)) => self.check_length(field, s.trim(), min, max),
            Some(other) => {
                self.error(field, format!("expected a string, found {}", json_kind(other)));
                None
            }
        }
    }

    fn optional_string(&mut self, field: &str, max: usize) -> Option<String> {
        match self.present(field) {
            None => None,
            Some(Value::String(s)) => self.check_length(field, s.trim(), 0, max),
            Some(other) => {
                self.error(field, format!("expected a string, found {}", json_kind(other)));
                None
            }
        }
    }

    fn check_length(&mut self, field: &str, value: &str, min: usize, max: usize) -> Option<String> {
        let len = value.chars().count();
        if len < min {
            if min == 1 {
                self.error(field, format!("{} must not be empty", field));
            } else {
                self.error(field, format!("{} must be at least {} characters", field, min));
            }
            return None;
        }
        if len > max {
            self.error(field, format!("{} must be at most {} characters", field, max));
            return None;
        }
        Some(value.to_string())
    }

    fn id(&mut self, field: &str) -> Option<String> {
        let value = self.string(field, 1, MAX_ID_LEN)?;
        self.check_id(field, &value).then_some(value)
    }

    fn check_id(&mut self, field: &str, value: &str) -> bool {
        if is_valid_id(value) {
            return true;
        }
        self.error(
            field,
            format!(
                "'{}' is not a valid id (lowercase letters, digits and underscores, starting with a letter, at most {} characters)",
                value, MAX_ID_LEN
            ),
        );
        false
    }

    fn bool(&mut self, field: &str) -> Option<bool> {
        match self.present(field) {
            None => {
                self.error(field, format!("{} is required", field));
                None
            }
            Some(value) => self.check_bool(field, value),
        }
    }

    fn optional_bool(&mut self, field: &str) -> Option<bool> {
        self.present(field).and_then(|value| self.check_bool(field, value))
    }

    fn check_bool(&mut self, field: &str, value: &Value) -> Option<bool> {
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.error(field, format!("expected a boolean, found {}", json_kind(value)));
                None
            }
        }
    }

    fn array(&mut self, field: &str, required: bool) -> Option<&'a Vec<Value>> {
        match self.present(field) {
            None => {
                if required {
                    self.error(field, format!("{} is required", field));
                }
                None
            }
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                self.error(field, format!("expected an array, found {}", json_kind(other)));
                None
            }
        }
    }

    /// Array of non-empty trimmed strings; element problems are reported on `field`
    fn string_array(&mut self, field: &str, required: bool) -> Option<Vec<String>> {
        let items = self.array(field, required)?;
        let mut values = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item.as_str().map(str::trim) {
                Some("") => {
                    self.error(field, format!("{}[{}] must not be empty", field, i));
                    ok = false;
                }
                Some(s) => values.push(s.to_string()),
                None => {
                    self.error(
                        field,
                        format!("{}[{}] must be a string, found {}", field, i, json_kind(item)),
                    );
                    ok = false;
                }
            }
        }
        ok.then_some(values)
    }

    fn finish<T>(self, build: impl FnOnce() -> T) -> Result<T, Vec<ValidationIssue>> {
        if self.issues.is_empty() {
            Ok(build())
        } else {
            Err(self.issues)
        }
    }
}

// =============================================================================
// Program
// =============================================================================

pub fn validate_program(raw: &Value) -> Result<Program, Vec<ValidationIssue>> {
    let mut c = FieldChecker::new(EntityType::Program, raw)?;

    let id = c.id("id");
    let name = c.string("name", 1, MAX_NAME_LEN);
    let description = c
        .optional_string("description", MAX_DESCRIPTION_LEN)
        .filter(|d| !d.is_empty());

    c.finish(|| Program {
        id: id.unwrap_or_default(),
        name: name.unwrap_or_default(),
        description,
    })
}

// =============================================================================
// Form field
// =============================================================================

pub fn validate_form_field(raw: &Value) -> Result<FormField, Vec<ValidationIssue>> {
    let mut c = FieldChecker::new(EntityType::Field, raw)?;

    let id = c.id("id");
    let field_type = match c.string("type", 1, 32) {
        Some(t) => {
            let parsed = FieldType::parse(&t);
            if parsed.is_none() {
                let allowed: Vec<&str> = FieldType::ALL.iter().map(FieldType::as_str).collect();
                c.error(
                    "type",
                    format!("unknown field type '{}'; expected one of {}", t, allowed.join(", ")),
                );
            }
            parsed
        }
        None => None,
    };
    let label = c.string("label", 1, MAX_NAME_LEN);
    let prompt = c.string("prompt", 1, MAX_PROMPT_LEN);
    let required = c.bool("required");
    let options = read_options(&mut c);
    let eligibility_gate = c.optional_bool("eligibilityGate");
    let failure_message = c
        .optional_string("failureMessage", MAX_PROMPT_LEN)
        .filter(|m| !m.is_empty());

    // Whole-field rules, only once the inputs they depend on parsed
    if let Some(field_type) = field_type {
        let is_select = field_type == FieldType::Select;
        if let Some(options) = &options {
            if is_select && options.is_empty() {
                c.error("options", "select fields require at least one option");
            }
            if !is_select && !options.is_empty() {
                c.error(
                    "options",
                    format!(
                        "options are only allowed on select fields, not {}",
                        field_type.as_str()
                    ),
                );
            }
        }
        if eligibility_gate == Some(true) && !is_select {
            c.error("eligibilityGate", "eligibility gates are only valid on select fields");
        }
    }
    let gated = eligibility_gate == Some(true);
    if gated && failure_message.is_none() {
        match c.present("failureMessage") {
            None => c.error(
                "failureMessage",
                "failureMessage is required when eligibilityGate is true",
            ),
            // blank text; a non-string was already reported
            Some(Value::String(_)) => c.error("failureMessage", "failureMessage must not be empty"),
            Some(_) => {}
        }
    } else if !gated && failure_message.is_some() {
        c.error("failureMessage", "failureMessage is only allowed when eligibilityGate is true");
    }

    c.finish(|| FormField {
        id: id.unwrap_or_default(),
        field_type: field_type.unwrap_or(FieldType::Text),
        label: label.unwrap_or_default(),
        prompt: prompt.unwrap_or_default(),
        required: required.unwrap_or_default(),
        options: options.unwrap_or_default(),
        eligibility_gate: eligibility_gate.unwrap_or(false),
        failure_message,
    })
}

/// `Some(vec![])` when absent, `None` when malformed
fn read_options(c: &mut FieldChecker<'_>) -> Option<Vec<SelectOption>> {
    let Some(items) = c.array("options", false) else {
        return c.present("options").is_none().then(Vec::new);
    };

    let mut options = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    let mut ok = true;
    for (i, item) in items.iter().enumerate() {
        let value = item.get("value").and_then(Value::as_str).map(str::trim).unwrap_or("");
        let label = item.get("label").and_then(Value::as_str).map(str::trim).unwrap_or("");
        if value.is_empty() || label.is_empty() {
            c.error("options", format!("options[{}] needs a non-empty value and label", i));
            ok = false;
            continue;
        }
        if !seen.insert(value.to_string()) {
            c.error("options", format!("duplicate option value '{}'", value));
            ok = false;
            continue;
        }
        options.push(SelectOption {
            value: value.to_string(),
            label: label.to_string(),
        });
    }
    ok.then_some(options)
}

// =============================================================================
// Conversational form
// =============================================================================

pub fn validate_form(raw: &Value) -> Result<ConversationalForm, Vec<ValidationIssue>> {
    let mut c = FieldChecker::new(EntityType::Form, raw)?;

    let id = c.id("id");
    let program_id = c.id("programId");
    let title = c.string("title", 1, MAX_NAME_LEN);
    let description = c.optional_string("description", MAX_DESCRIPTION_LEN);
    let trigger_phrases = c.string_array("triggerPhrases", true);
    if let Some(phrases) = &trigger_phrases {
        if phrases.is_empty() {
            c.error("triggerPhrases", "at least one trigger phrase is required");
        }
    }

    let mut fields = Vec::new();
    if let Some(items) = c.array("fields", true) {
        if items.is_empty() {
            c.error("fields", "at least one field is required");
        }
        let mut seen = HashSet::new();
        for (i, item) in items.iter().enumerate() {
            match validate_form_field(item) {
                Ok(field) => {
                    if !seen.insert(field.id.clone()) {
                        c.error("fields", format!("duplicate field id '{}'", field.id));
                    }
                    fields.push(field);
                }
                Err(nested) => {
                    for issue in nested {
                        let path = match &issue.field {
                            Some(f) => format!("fields[{}].{}", i, f),
                            None => format!("fields[{}]", i),
                        };
                        c.error(&path, issue.message);
                    }
                }
            }
        }
    }

    c.finish(|| ConversationalForm {
        id: id.unwrap_or_default(),
        program_id: program_id.unwrap_or_default(),
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        trigger_phrases: trigger_phrases.unwrap_or_default(),
        fields,
    })
}

// =============================================================================
// CTA definition
// =============================================================================

pub fn validate_cta(raw: &Value) -> Result<CtaDefinition, Vec<ValidationIssue>> {
    let mut c = FieldChecker::new(EntityType::Cta, raw)?;

    let id = c.id("id");
    let label = c.string("label", 1, MAX_CTA_LABEL_LEN);
    let color = c.optional_string("color", 16).filter(|s| !s.is_empty());
    if let Some(color) = &color {
        if !is_hex_color(color) {
            c.error("color", format!("'{}' is not a hex color (#RGB or #RRGGBB)", color));
        }
    }

    let action = match c.string("action", 1, 32) {
        Some(tag) => read_action(&mut c, &tag),
        None => None,
    };

    c.finish(|| CtaDefinition {
        id: id.unwrap_or_default(),
        label: label.unwrap_or_default(),
        color,
        action: action.unwrap_or(CtaAction::ShowInfo { prompt: String::new() }),
    })
}

fn read_action(c: &mut FieldChecker<'_>, tag: &str) -> Option<CtaAction> {
    let Some(&(_, payload)) = CtaAction::PAYLOADS.iter().find(|(name, _)| *name == tag) else {
        let allowed: Vec<&str> = CtaAction::PAYLOADS.iter().map(|(name, _)| *name).collect();
        c.error(
            "action",
            format!("unknown action '{}'; expected one of {}", tag, allowed.join(", ")),
        );
        return None;
    };

    // Payload fields owned by other actions must not appear
    for &(other_tag, other_payload) in CtaAction::PAYLOADS.iter() {
        if other_payload != payload && c.present(other_payload).is_some() {
            c.error(
                other_payload,
                format!(
                    "{} belongs to action {} and is not allowed for {}",
                    other_payload, other_tag, tag
                ),
            );
        }
    }

    match tag {
        "start_form" => c.id(payload).map(|form_id| CtaAction::StartForm { form_id }),
        "external_link" => {
            let url = c.string(payload, 1, 2048)?;
            if !is_valid_url(&url) {
                c.error(payload, format!("'{}' is not a well-formed http(s) URL", url));
                return None;
            }
            Some(CtaAction::ExternalLink { url })
        }
        "send_query" => c
            .string(payload, 1, MAX_PROMPT_LEN)
            .map(|query| CtaAction::SendQuery { query }),
        _ => c.string(payload, 1, MAX_PROMPT_LEN).map(|prompt| CtaAction::ShowInfo { prompt }),
    }
}

// =============================================================================
// Conversation branch
// =============================================================================

pub fn validate_branch(raw: &Value) -> Result<ConversationBranch, Vec<ValidationIssue>> {
    let mut c = FieldChecker::new(EntityType::Branch, raw)?;

    let id = c.id("id");

    let keywords = c.string_array("detectionKeywords", true);
    if let Some(keywords) = &keywords {
        if keywords.is_empty() {
            c.error("detectionKeywords", "at least one detection keyword is required");
        }
        if keywords.len() > MAX_DETECTION_KEYWORDS {
            c.error(
                "detectionKeywords",
                format!(
                    "at most {} detection keywords are allowed, found {}",
                    MAX_DETECTION_KEYWORDS,
                    keywords.len()
                ),
            );
        }
        let mut seen = HashSet::new();
        for keyword in keywords {
            if *keyword != keyword.to_lowercase() {
                c.error("detectionKeywords", format!("keyword '{}' must be lowercase", keyword));
            }
            if !seen.insert(keyword.as_str()) {
                c.error("detectionKeywords", format!("duplicate keyword '{}'", keyword));
            }
        }
    }

    let primary = c.id("primaryCta");

    let secondaries = c.string_array("secondaryCtas", false);
    if let Some(secondaries) = &secondaries {
        for s in secondaries {
            c.check_id("secondaryCtas", s);
        }
        if secondaries.len() > MAX_SECONDARY_CTAS {
            c.error(
                "secondaryCtas",
                format!(
                    "at most {} secondary CTAs are allowed, found {}",
                    MAX_SECONDARY_CTAS,
                    secondaries.len()
                ),
            );
        }
        let mut seen = HashSet::new();
        for s in secondaries {
            if !seen.insert(s.as_str()) {
                c.error("secondaryCtas", format!("duplicate secondary CTA '{}'", s));
            }
        }
        if let Some(primary) = &primary {
            if secondaries.contains(primary) {
                c.error("secondaryCtas", "primary cannot also be secondary");
            }
        }
    }

    c.finish(|| ConversationBranch {
        id: id.unwrap_or_default(),
        detection_keywords: keywords.unwrap_or_default(),
        primary_cta: primary.unwrap_or_default(),
        secondary_ctas: secondaries.unwrap_or_default(),
    })
}

// =============================================================================
// Tenant config
// =============================================================================

/// Validate a whole document and build its typed view.
///
/// Checks the envelope (tenant id, version, section shapes) and then every
/// entity of every collection. Issues come back sorted.
pub fn validate_tenant_config(document: &Document) -> Result<TenantConfig, Vec<ValidationIssue>> {
    let tenant_id = document.tenant_id().unwrap_or("").to_string();
    let mut issues = Vec::new();

    for required in [keys::TENANT_ID, keys::VERSION] {
        if document.get(required).map_or(true, Value::is_null) {
            issues.push(
                ValidationIssue::error(
                    EntityType::Tenant,
                    tenant_id.clone(),
                    format!("{} is required", required),
                )
                .with_field(required),
            );
        }
    }

    let root = Value::Object(document.as_map().clone());
    if let Err(errors) = ENVELOPE_VALIDATOR.validate(&root) {
        for error in errors {
            let path = error.instance_path.to_string();
            let field = path.trim_start_matches('/').replace('/', ".");
            let mut issue =
                ValidationIssue::error(EntityType::Tenant, tenant_id.clone(), error.to_string());
            if !field.is_empty() {
                issue = issue.with_field(field);
            }
            issues.push(issue);
        }
    }

    let mut config = TenantConfig::new(tenant_id, document.version().unwrap_or(""));
    collect_entities(
        document,
        EntityType::Program,
        validate_program,
        &mut config.programs,
        &mut issues,
    );
    collect_entities(
        document,
        EntityType::Form,
        validate_form,
        &mut config.forms,
        &mut issues,
    );
    collect_entities(
        document,
        EntityType::Cta,
        validate_cta,
        &mut config.ctas,
        &mut issues,
    );
    collect_entities(
        document,
        EntityType::Branch,
        validate_branch,
        &mut config.branches,
        &mut issues,
    );

    if let Some(features) = document.get(keys::FEATURES).and_then(Value::as_object) {
        config.features = features.clone();
    }
    let typed: HashSet<&str> = [keys::TENANT_ID, keys::VERSION, keys::FEATURES]
        .into_iter()
        .chain(keys::ENTITY_COLLECTIONS.iter().copied())
        .collect();
    for (key, value) in document.iter() {
        if !typed.contains(key.as_str()) {
            config.other.insert(key.clone(), value.clone());
        }
    }

    if issues.is_empty() {
        Ok(config)
    } else {
        sort_issues(&mut issues);
        Err(issues)
    }
}

/// Validate one collection. The map key is the entity id: a missing `id` is
/// filled from it, a different `id` is an error.
fn collect_entities<T>(
    document: &Document,
    entity_type: EntityType,
    validator: fn(&Value) -> Result<T, Vec<ValidationIssue>>,
    into: &mut BTreeMap<String, T>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(collection) = document.collection(entity_type) else {
        return;
    };

    for (key, raw) in collection {
        let raw = match raw {
            Value::Object(object) => match object.get("id") {
                None | Some(Value::Null) => {
                    let mut with_id = object.clone();
                    with_id.insert("id".to_string(), Value::String(key.clone()));
                    Value::Object(with_id)
                }
                Some(Value::String(id)) if id.trim() != key => {
                    issues.push(
                        ValidationIssue::error(
                            entity_type,
                            key.clone(),
                            format!("id '{}' does not match its collection key '{}'", id, key),
                        )
                        .with_field("id"),
                    );
                    continue;
                }
                Some(_) => raw.clone(),
            },
            other => other.clone(),
        };

        match validator(&raw) {
            Ok(entity) => {
                into.insert(key.clone(), entity);
            }
            Err(mut nested) => {
                for issue in &mut nested {
                    if issue.entity_id.is_empty() {
                        issue.entity_id = key.clone();
                    }
                }
                issues.extend(nested);
            }
        }
    }
}
