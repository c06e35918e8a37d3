//! ConfigEditor against a FileStore on disk

use serde_json::json;
use tempfile::TempDir;
use tenant_config_engine::config::ValidationConfig;
use tenant_config_engine::{
    ConfigEditor, ConfigStore, Document, EngineError, EntityType, FileStore, SaveRequest,
};

const FIXTURE: &str = include_str!("fixtures/tenant_config.json");

fn setup(max_backups: usize) -> (TempDir, ConfigEditor<FileStore>) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path(), max_backups);
    store.save("riverside", &Document::from_json_str(FIXTURE).unwrap()).unwrap();
    (dir, ConfigEditor::new(store))
}

fn edit(value: serde_json::Value) -> Document {
    Document::from_value(value).unwrap()
}

#[test]
fn test_save_writes_document_and_backup() {
    let (dir, editor) = setup(10);
    let outcome = editor
        .save(
            SaveRequest::new(
                "riverside",
                edit(json!({"chat_title": "Riverside Help", "aws": {"region": "eu-west-1"}})),
            )
            .expect_version("1.3")
            .bump_version(),
        )
        .unwrap();

    assert_eq!(outcome.version.as_deref(), Some("1.4"));
    assert_eq!(outcome.ignored_read_only, vec!["aws"]);
    assert!(outcome.diff.metadata_changes.contains_key("chat_title"));

    let stored = editor.store().load("riverside").unwrap();
    assert_eq!(stored["version"], "1.4");
    assert_eq!(stored["aws"]["region"], "us-east-1");
    assert!(dir.path().join("riverside/config.json").exists());

    let backups = editor.store().list_backups("riverside").unwrap();
    assert_eq!(backups.len(), 1);
    let previous = editor.store().load_backup("riverside", &backups[0].key).unwrap();
    assert_eq!(previous.version(), Some("1.3"));
}

#[test]
fn test_concurrent_editors_conflict() {
    let (_dir, editor) = setup(10);

    // Both editors opened version 1.3; the first one wins
    editor
        .save(
            SaveRequest::new("riverside", edit(json!({"chat_title": "First"})))
                .expect_version("1.3")
                .bump_version(),
        )
        .unwrap();
    let err = editor
        .save(
            SaveRequest::new("riverside", edit(json!({"chat_title": "Second"})))
                .expect_version("1.3"),
        )
        .unwrap_err();

    match err {
        EngineError::Conflict { expected, actual, .. } => {
            assert_eq!(expected, "1.3");
            assert_eq!(actual, "1.4");
        }
        other => panic!("expected conflict, got {other}"),
    }
    assert_eq!(editor.store().load("riverside").unwrap()["chat_title"], "First");
}

#[test]
fn test_invalid_edit_is_not_persisted() {
    let (_dir, editor) = setup(10);
    let err = editor
        .save(SaveRequest::new("riverside", edit(json!({"programs": {}}))))
        .unwrap_err();

    let EngineError::Validation { issues } = err else {
        panic!("expected validation failure");
    };
    let ids: Vec<&str> = issues.iter().map(|i| i.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["mentor_application", "pantry_signup"]);
    assert!(editor.store().list_backups("riverside").unwrap().is_empty());
}

#[test]
fn test_dry_run_does_not_write() {
    let (_dir, editor) = setup(10);
    let run = editor
        .dry_run("riverside", &edit(json!({"cta_definitions": {}, "unknown_block": true})))
        .unwrap();

    assert!(run.report.has_errors());
    assert!(run.report.warnings().any(|w| w.entity_type == EntityType::Section));
    let stored = editor.store().load("riverside").unwrap();
    assert_eq!(stored["cta_definitions"]["hours"]["action"], "send_query");
}

#[test]
fn test_delete_respects_dependents() {
    let (_dir, editor) = setup(10);

    let err = editor
        .delete_entity("riverside", EntityType::Cta, "visit_site", None)
        .unwrap_err();
    match err {
        EngineError::DeletionBlocked { dependents, .. } => {
            assert_eq!(dependents.branches, vec!["food_help", "mentoring_interest"]);
        }
        other => panic!("expected blocked delete, got {other}"),
    }

    // Bottom-up: branch, then its CTA
    editor.delete_entity("riverside", EntityType::Branch, "food_help", None).unwrap();
    assert!(editor.dependents("riverside", EntityType::Cta, "hours").unwrap().is_empty());
    editor.delete_entity("riverside", EntityType::Cta, "hours", None).unwrap();

    let stored = editor.store().load("riverside").unwrap();
    assert!(stored["cta_definitions"].get("hours").is_none());
    assert!(stored["conversation_branches"].get("food_help").is_none());
}

#[test]
fn test_backups_are_pruned() {
    let (_dir, editor) = setup(2);
    for title in ["one", "two", "three", "four"] {
        editor
            .save(SaveRequest::new("riverside", edit(json!({"chat_title": title}))))
            .unwrap();
    }
    let backups = editor.store().list_backups("riverside").unwrap();
    assert_eq!(backups.len(), 2);
    assert!(backups[0].key > backups[1].key);
}

#[test]
fn test_warnings_block_when_configured() {
    let (_dir, editor) = setup(10);
    let editor = editor.with_validation(ValidationConfig {
        fail_on_warnings: true,
        suggest_fixes: false,
    });
    let result = editor.save(SaveRequest::new(
        "riverside",
        edit(json!({
            "conversational_forms": {},
            "cta_definitions": {},
            "conversation_branches": {}
        })),
    ));
    let Err(EngineError::Validation { issues }) = result else {
        panic!("expected warnings to block the save");
    };
    assert!(issues.iter().all(|i| !i.is_error()));
    assert_eq!(issues.len(), 3);
}

#[test]
fn test_unknown_tenant() {
    let (_dir, editor) = setup(10);
    assert!(matches!(
        editor.dry_run("nobody", &Document::new()),
        Err(EngineError::NotFound { .. })
    ));
    assert!(matches!(
        editor.dry_run("../riverside", &Document::new()),
        Err(EngineError::InvalidTenantKey(_))
    ));
}
