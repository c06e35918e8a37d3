//! Tenant Config CLI
//!
//! Validate, merge, diff and save tenant configuration documents. Results are
//! printed as JSON on stdout; logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tenant_config_engine::{
    diff, merge, validate_document, ConfigEditor, ConfigStore, DependencyGraph, Document,
    EngineConfig, EngineError, EntityRef, EntityType, FileStore, SaveRequest,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tenant-config")]
#[command(about = "Validate and safely merge tenant chatbot configurations")]
struct Cli {
    /// Engine config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the store root directory
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a full tenant document
    Validate {
        file: PathBuf,
    },

    /// Merge an edited document into a base and validate the result
    Merge {
        base: PathBuf,
        edited: PathBuf,
        /// Write the merged document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize changes between two documents
    Diff {
        old: PathBuf,
        new: PathBuf,
        /// Plain text instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// List entities that reference the given entity
    Dependents {
        file: PathBuf,
        /// program, form, cta or branch
        entity_type: EntityType,
        id: String,
    },

    /// Merge an edit into the stored tenant document and save it
    Save {
        tenant: String,
        edited: PathBuf,
        /// Refuse to save unless the stored version matches
        #[arg(long)]
        expected_version: Option<String>,
        /// Bump the minor version
        #[arg(long)]
        bump: bool,
    },

    /// List stored backups for a tenant, newest first
    Backups {
        tenant: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match EngineConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded without validation errors
fn run(cli: Cli, mut config: EngineConfig) -> anyhow::Result<bool> {
    if let Some(root) = cli.store {
        config.store.root = root;
    }
    let suggest = config.validation.suggest_fixes;

    match cli.command {
        Commands::Validate { file } => {
            let document = read_document(&file)?;
            let (_, report) = validate_document(&document, suggest);
            print_json(&json!({
                "valid": !report.has_errors(),
                "errors": report.error_count(),
                "warnings": report.warning_count(),
                "issues": report.all(),
            }))?;
            Ok(!report.has_errors())
        }

        Commands::Merge { base, edited, output } => {
            let base = read_document(&base)?;
            let edited = read_document(&edited)?;
            let outcome = merge(&base, &edited);
            let (_, mut report) = validate_document(&outcome.document, suggest);
            report.extend(outcome.unknown_sections.iter().cloned());
            report.sort();

            match output {
                Some(path) => {
                    std::fs::write(&path, serde_json::to_string_pretty(&outcome.document)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                    print_json(&json!({
                        "output": path,
                        "ignored_read_only": outcome.ignored_read_only,
                        "issues": report.all(),
                    }))?;
                }
                None => print_json(&json!({
                    "document": outcome.document,
                    "ignored_read_only": outcome.ignored_read_only,
                    "issues": report.all(),
                }))?,
            }
            Ok(!report.has_errors())
        }

        Commands::Diff { old, new, summary } => {
            let changes = diff(&read_document(&old)?, &read_document(&new)?);
            if summary {
                print!("{}", changes.summary());
                if !changes.has_changes {
                    println!();
                }
            } else {
                print_json(&changes)?;
            }
            Ok(true)
        }

        Commands::Dependents { file, entity_type, id } => {
            let document = read_document(&file)?;
            let (typed, report) = validate_document(&document, suggest);
            let Some(typed) = typed else {
                print_json(&json!({ "issues": report.all() }))?;
                return Ok(false);
            };

            let graph = DependencyGraph::build(&typed);
            let target = EntityRef::new(entity_type, id);
            let dependents = graph.dependents(&target);
            print_json(&json!({
                "entity": target.to_string(),
                "exists": typed.contains(entity_type, &target.id),
                "can_delete": dependents.is_empty(),
                "dependents": dependents,
                "transitive": graph.transitive_dependents(&target),
            }))?;
            Ok(true)
        }

        Commands::Save { tenant, edited, expected_version, bump } => {
            let editor = ConfigEditor::new(FileStore::from_config(&config.store))
                .with_validation(config.validation);
            let mut request = SaveRequest::new(tenant, read_document(&edited)?);
            request.expected_version = expected_version;
            request.bump = bump;

            match editor.save(request) {
                Ok(outcome) => {
                    print_json(&json!({
                        "version": outcome.version,
                        "warnings": outcome.warnings,
                        "ignored_read_only": outcome.ignored_read_only,
                        "diff": outcome.diff,
                    }))?;
                    Ok(true)
                }
                Err(EngineError::Validation { issues }) => {
                    print_json(&json!({ "saved": false, "issues": issues }))?;
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        }

        Commands::Backups { tenant } => {
            let store = FileStore::from_config(&config.store);
            print_json(&store.list_backups(&tenant)?)?;
            Ok(true)
        }
    }
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Document::from_json_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
