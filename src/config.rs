//! Engine configuration
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (tenant-config.toml)
//! - Environment variables (TENANT_CONFIG__*)
//!
//! ## Example config file (tenant-config.toml):
//! ```toml
//! [store]
//! root = "./tenants"
//! max_backups = 20
//!
//! [validation]
//! fail_on_warnings = false
//! suggest_fixes = true
//!
//! [logging]
//! filter = "info"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the engine and the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// File store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per tenant
    #[serde(default = "default_store_root")]
    pub root: PathBuf,

    /// Backups kept per tenant; older ones are pruned on save
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

/// Save gating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Refuse saves that produce warnings as well as errors
    #[serde(default)]
    pub fail_on_warnings: bool,

    /// Attach "did you mean" hints to dangling references
    #[serde(default = "default_true")]
    pub suggest_fixes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default value functions
fn default_store_root() -> PathBuf {
    PathBuf::from("./tenants")
}

fn default_max_backups() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            max_backups: default_max_backups(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            fail_on_warnings: false,
            suggest_fixes: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "tenant-config.toml",
            ".tenant-config.toml",
            "config/tenant-config.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "tenant", "tenant-config") {
            let xdg_config = dirs.config_dir().join("tenant-config.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // TENANT_CONFIG__STORE__MAX_BACKUPS=5
        builder = builder.add_source(
            Environment::with_prefix("TENANT_CONFIG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Store root, resolved against the current directory when relative
    pub fn store_root(&self) -> PathBuf {
        if self.store.root.is_absolute() {
            self.store.root.clone()
        } else {
            std::env::current_dir().unwrap_or_default().join(&self.store.root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.store.max_backups, 20);
        assert_eq!(config.store.root, PathBuf::from("./tenants"));
        assert!(!config.validation.fail_on_warnings);
        assert!(config.validation.suggest_fixes);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_serialize_config() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[validation]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "[store]\nmax_backups = 3\n").unwrap();

        let config = EngineConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.store.max_backups, 3);
        assert_eq!(config.store.root, PathBuf::from("./tenants"));
        assert!(config.validation.suggest_fixes);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = EngineConfig::default();
        config.validation.fail_on_warnings = true;
        config.save(&path).unwrap();

        let loaded = EngineConfig::load_from(Some(&path)).unwrap();
        assert!(loaded.validation.fail_on_warnings);
    }
}
