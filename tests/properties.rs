//! Property tests for merge, integrity and safe delete

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use tenant_config_engine::merge::{EDITABLE_SECTIONS, READ_ONLY_SECTIONS};
use tenant_config_engine::schema::{validate_program, MAX_SECONDARY_CTAS};
use tenant_config_engine::{
    can_delete, check_references, extract_editable, merge, validate, validate_tenant_config,
    Document, EntityType,
};

const FIXTURE: &str = include_str!("fixtures/tenant_config.json");

const PROGRAM_IDS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z ]{0,12}".prop_map(Value::String),
        Just(Value::Null),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

/// A partial edit drawn from editable, read-only, metadata and unknown keys
fn arb_edit() -> impl Strategy<Value = Document> {
    let keys = prop_oneof![
        prop::sample::select(EDITABLE_SECTIONS),
        prop::sample::select(READ_ONLY_SECTIONS),
        Just("chat_title"),
        Just("mystery"),
    ];
    prop::collection::btree_map(keys, arb_json(), 0..6).prop_map(|m| {
        Document::from(
            m.into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<Map<String, Value>>(),
        )
    })
}

fn form(program_id: &str) -> Value {
    json!({
        "programId": program_id,
        "title": "Form",
        "triggerPhrases": ["start"],
        "fields": [{"id": "q", "type": "text", "label": "Q", "prompt": "Q?", "required": true}]
    })
}

/// Programs present, and one program reference per form
fn arb_program_graph() -> impl Strategy<Value = (BTreeSet<&'static str>, Vec<&'static str>)> {
    (
        prop::sample::subsequence(PROGRAM_IDS.to_vec(), 0..=PROGRAM_IDS.len()),
        prop::collection::vec(prop::sample::select(PROGRAM_IDS.to_vec()), 0..6),
    )
        .prop_map(|(present, refs)| (present.into_iter().collect(), refs))
}

fn program_document(present: &BTreeSet<&str>, refs: &[&str]) -> Document {
    let programs: Map<String, Value> = present
        .iter()
        .map(|id| (id.to_string(), json!({"id": id, "name": id.to_uppercase()})))
        .collect();
    let forms: Map<String, Value> = refs
        .iter()
        .enumerate()
        .map(|(i, program)| (format!("form_{}", i), form(program)))
        .collect();
    Document::from_value(json!({
        "tenant_id": "acme",
        "version": "1.0",
        "programs": programs,
        "conversational_forms": forms
    }))
    .unwrap()
}

/// Forms, start_form CTAs and branches whose references index into pools
/// that are larger than what is present, so some of them dangle
#[derive(Debug, Clone)]
struct ReferenceGraph {
    programs: BTreeSet<&'static str>,
    form_programs: Vec<&'static str>,
    cta_forms: Vec<usize>,
    branch_ctas: Vec<(usize, BTreeSet<usize>)>,
}

const POOL: usize = 5;

impl ReferenceGraph {
    fn dangling(&self) -> usize {
        let forms = self
            .form_programs
            .iter()
            .filter(|p| !self.programs.contains(*p))
            .count();
        let ctas = self
            .cta_forms
            .iter()
            .filter(|f| **f >= self.form_programs.len())
            .count();
        let branches: usize = self
            .branch_ctas
            .iter()
            .map(|(primary, secondaries)| {
                std::iter::once(primary)
                    .chain(secondaries)
                    .filter(|c| **c >= self.cta_forms.len())
                    .count()
            })
            .sum();
        forms + ctas + branches
    }

    fn document(&self) -> Document {
        let mut document = program_document(&self.programs, &self.form_programs);
        let ctas: Map<String, Value> = self
            .cta_forms
            .iter()
            .enumerate()
            .map(|(i, form)| {
                (
                    format!("cta_{}", i),
                    json!({
                        "label": "Start",
                        "action": "start_form",
                        "formId": format!("form_{}", form)
                    }),
                )
            })
            .collect();
        let branches: Map<String, Value> = self
            .branch_ctas
            .iter()
            .enumerate()
            .map(|(i, (primary, secondaries))| {
                let secondaries: Vec<String> =
                    secondaries.iter().map(|c| format!("cta_{}", c)).collect();
                (
                    format!("branch_{}", i),
                    json!({
                        "detectionKeywords": ["help"],
                        "primaryCta": format!("cta_{}", primary),
                        "secondaryCtas": secondaries
                    }),
                )
            })
            .collect();
        document.insert("cta_definitions".to_string(), Value::Object(ctas));
        document.insert("conversation_branches".to_string(), Value::Object(branches));
        document
    }
}

fn arb_branch() -> impl Strategy<Value = (usize, BTreeSet<usize>)> {
    (
        0..POOL,
        prop::collection::btree_set(0..POOL, 0..=MAX_SECONDARY_CTAS),
    )
        .prop_map(|(primary, mut secondaries)| {
            secondaries.remove(&primary);
            (primary, secondaries)
        })
}

fn arb_reference_graph() -> impl Strategy<Value = ReferenceGraph> {
    (
        arb_program_graph(),
        prop::collection::vec(0..POOL, 0..POOL),
        prop::collection::vec(arb_branch(), 0..4),
    )
        .prop_map(|((programs, form_programs), cta_forms, branch_ctas)| ReferenceGraph {
            programs,
            form_programs,
            cta_forms,
            branch_ctas,
        })
}

proptest! {
    #[test]
    fn prop_read_only_sections_survive_merge(edit in arb_edit()) {
        let base = Document::from_json_str(FIXTURE).unwrap();
        let merged = merge(&base, &edit).document;
        for key in READ_ONLY_SECTIONS {
            prop_assert_eq!(merged.get(*key), base.get(*key));
        }
        prop_assert!(merged.get("mystery").is_none());
        prop_assert_eq!(merged.get("tenant_id"), base.get("tenant_id"));
    }

    #[test]
    fn prop_editable_sections_round_trip(edit in arb_edit()) {
        let base = Document::from_json_str(FIXTURE).unwrap();
        let extracted = extract_editable(&merge(&base, &edit).document);
        for (key, value) in edit.iter() {
            if EDITABLE_SECTIONS.contains(&key.as_str()) {
                prop_assert_eq!(extracted.get(key), Some(value));
            }
        }
    }

    #[test]
    fn prop_one_error_per_dangling_reference((present, refs) in arb_program_graph()) {
        let document = program_document(&present, &refs);
        let config = validate_tenant_config(&document).unwrap();
        let dangling = refs.iter().filter(|r| !present.contains(*r)).count();
        prop_assert_eq!(check_references(&config).len(), dangling);
    }

    #[test]
    fn prop_one_error_per_dangling_edge_of_any_type(graph in arb_reference_graph()) {
        let config = validate_tenant_config(&graph.document()).unwrap();
        let issues = check_references(&config);
        prop_assert!(issues.iter().all(|i| i.is_error()));
        prop_assert!(issues.iter().all(|i| i.message.starts_with("references non-existent")));
        prop_assert_eq!(issues.len(), graph.dangling());
    }

    #[test]
    fn prop_safe_delete_is_sound((present, refs) in arb_program_graph()) {
        let document = program_document(&present, &refs);
        let config = validate_tenant_config(&document).unwrap();
        for program in PROGRAM_IDS {
            let referenced = refs.contains(&program);
            prop_assert_eq!(can_delete(&config, EntityType::Program, program), !referenced);
        }
    }

    #[test]
    fn prop_normalized_program_validates_again(
        id in "[a-z][a-z0-9_]{0,20}",
        name in "[A-Za-z ]{1,40}",
        padding in "[ ]{0,3}",
    ) {
        prop_assume!(!name.trim().is_empty());
        let raw = json!({"id": id, "name": format!("{}{}{}", padding, name, padding)});
        let program = validate_program(&raw).unwrap();
        let again =
            validate(EntityType::Program, &serde_json::to_value(&program).unwrap()).unwrap();
        prop_assert_eq!(again.to_value().unwrap(), serde_json::to_value(&program).unwrap());
    }
}
