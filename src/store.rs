//! Storage seam
//!
//! The engine itself never does I/O. [`ConfigStore`] is the boundary the
//! orchestration layer talks to: load the current document, save a new one
//! (keeping a backup of the previous), and list or read backups.
//!
//! ## File layout
//!
//! ```text
//! <root>/
//! └── acme/
//!     ├── config.json
//!     └── backups/
//!         ├── 20260301T120000.000000Z.json
//!         ├── 20260301T120000.000000Z.sha256
//!         └── ...
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::checksum::Checksum;
use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::{EngineError, Result};
use crate::schema::is_valid_id;

const CONFIG_FILE: &str = "config.json";
const BACKUP_DIR: &str = "backups";
const CHECKSUM_EXT: &str = "sha256";

/// Metadata for one stored backup, newest first in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub checksum: Checksum,
}

/// Persistence boundary for tenant documents
pub trait ConfigStore {
    /// Current document for a tenant
    fn load(&self, tenant: &str) -> Result<Document>;

    /// Replace the current document, backing up the previous one
    fn save(&self, tenant: &str, document: &Document) -> Result<()>;

    /// Backups for a tenant, newest first
    fn list_backups(&self, tenant: &str) -> Result<Vec<BackupInfo>>;

    /// Read one backup, verifying its checksum
    fn load_backup(&self, tenant: &str, key: &str) -> Result<Document>;
}

fn check_tenant_key(tenant: &str) -> Result<()> {
    if is_valid_id(tenant) {
        Ok(())
    } else {
        Err(EngineError::InvalidTenantKey(tenant.to_string()))
    }
}

fn backup_key(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%S%.6fZ").to_string()
}

// =============================================================================
// Memory Store
// =============================================================================

/// Serialized snapshot, checked against `info.checksum` on read
struct StoredBackup {
    info: BackupInfo,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct TenantSlot {
    current: Option<Document>,
    /// Oldest first
    backups: Vec<StoredBackup>,
    next_backup: u64,
}

/// In-process store, mainly for tests and dry runs
pub struct MemoryStore {
    tenants: RwLock<HashMap<String, TenantSlot>>,
    max_backups: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_max_backups(StoreConfig::default().max_backups)
    }

    pub fn with_max_backups(max_backups: usize) -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            max_backups,
        }
    }

    /// Seed a tenant document without creating a backup
    pub fn insert(&self, tenant: &str, document: Document) -> Result<()> {
        check_tenant_key(tenant)?;
        let mut tenants = self.tenants.write().unwrap_or_else(PoisonError::into_inner);
        tenants.entry(tenant.to_string()).or_default().current = Some(document);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self, tenant: &str) -> Result<Document> {
        check_tenant_key(tenant)?;
        let tenants = self.tenants.read().unwrap_or_else(PoisonError::into_inner);
        tenants
            .get(tenant)
            .and_then(|slot| slot.current.clone())
            .ok_or_else(|| EngineError::NotFound {
                tenant: tenant.to_string(),
            })
    }

    fn save(&self, tenant: &str, document: &Document) -> Result<()> {
        check_tenant_key(tenant)?;
        let mut tenants = self.tenants.write().unwrap_or_else(PoisonError::into_inner);
        let slot = tenants.entry(tenant.to_string()).or_default();

        if let Some(previous) = slot.current.take() {
            let bytes = serde_json::to_vec(&previous)?;
            slot.next_backup += 1;
            slot.backups.push(StoredBackup {
                info: BackupInfo {
                    key: format!("{:06}", slot.next_backup),
                    created_at: Utc::now(),
                    size_bytes: bytes.len() as u64,
                    checksum: Checksum::from_bytes(&bytes),
                },
                bytes,
            });
            let excess = slot.backups.len().saturating_sub(self.max_backups);
            slot.backups = slot.backups.split_off(excess);
        }

        slot.current = Some(document.clone());
        debug!(tenant, backups = slot.backups.len(), "saved tenant document in memory");
        Ok(())
    }

    fn list_backups(&self, tenant: &str) -> Result<Vec<BackupInfo>> {
        check_tenant_key(tenant)?;
        let tenants = self.tenants.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tenants
            .get(tenant)
            .map(|slot| slot.backups.iter().rev().map(|b| b.info.clone()).collect())
            .unwrap_or_default())
    }

    fn load_backup(&self, tenant: &str, key: &str) -> Result<Document> {
        check_tenant_key(tenant)?;
        let tenants = self.tenants.read().unwrap_or_else(PoisonError::into_inner);
        let backup = tenants
            .get(tenant)
            .and_then(|slot| slot.backups.iter().find(|b| b.info.key == key))
            .ok_or_else(|| EngineError::NotFound {
                tenant: format!("{}@{}", tenant, key),
            })?;
        backup.info.checksum.verify(&backup.bytes)?;
        let value: serde_json::Value = serde_json::from_slice(&backup.bytes)?;
        Document::from_value(value)
    }
}

// =============================================================================
// File Store
// =============================================================================

/// One directory per tenant under a common root
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_backups: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self {
            root: root.into(),
            max_backups,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.root.clone(), config.max_backups)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tenant_dir(&self, tenant: &str) -> Result<PathBuf> {
        check_tenant_key(tenant)?;
        Ok(self.root.join(tenant))
    }

    fn backup_dir(&self, tenant: &str) -> Result<PathBuf> {
        Ok(self.tenant_dir(tenant)?.join(BACKUP_DIR))
    }

    /// Copy the current file aside before it is overwritten
    fn write_backup(&self, tenant: &str, current: &Path) -> Result<()> {
        let bytes = fs::read(current)?;
        let dir = self.backup_dir(tenant)?;
        fs::create_dir_all(&dir)?;

        let base_key = backup_key(Utc::now());
        let mut key = base_key.clone();
        let mut attempt = 0;
        while dir.join(format!("{}.json", key)).exists() {
            attempt += 1;
            key = format!("{}-{}", base_key, attempt);
        }

        fs::write(dir.join(format!("{}.json", key)), &bytes)?;
        fs::write(
            dir.join(format!("{}.{}", key, CHECKSUM_EXT)),
            Checksum::from_bytes(&bytes).as_str(),
        )?;
        debug!(tenant, key = %key, size = bytes.len(), "wrote backup");
        Ok(())
    }

    fn prune_backups(&self, tenant: &str) -> Result<()> {
        let dir = self.backup_dir(tenant)?;
        for stale in self.list_backups(tenant)?.into_iter().skip(self.max_backups) {
            fs::remove_file(dir.join(format!("{}.json", stale.key)))?;
            let sidecar = dir.join(format!("{}.{}", stale.key, CHECKSUM_EXT));
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
            debug!(tenant, key = %stale.key, "pruned backup");
        }
        Ok(())
    }

    fn read_checksum(json_path: &Path, bytes: &[u8]) -> Result<Checksum> {
        let sidecar = json_path.with_extension(CHECKSUM_EXT);
        if sidecar.exists() {
            Ok(Checksum::from(fs::read_to_string(sidecar)?.trim().to_string()))
        } else {
            Ok(Checksum::from_bytes(bytes))
        }
    }
}

impl ConfigStore for FileStore {
    fn load(&self, tenant: &str) -> Result<Document> {
        let path = self.tenant_dir(tenant)?.join(CONFIG_FILE);
        if !path.exists() {
            return Err(EngineError::NotFound {
                tenant: tenant.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        Document::from_json_str(&content)
    }

    fn save(&self, tenant: &str, document: &Document) -> Result<()> {
        let dir = self.tenant_dir(tenant)?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(CONFIG_FILE);

        if path.exists() {
            self.write_backup(tenant, &path)?;
            self.prune_backups(tenant)?;
        }

        // Write-then-rename so readers never see a half-written file
        let tmp = dir.join(format!("{}.tmp", CONFIG_FILE));
        fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
        fs::rename(&tmp, &path)?;

        info!(tenant, path = %path.display(), "saved tenant document");
        Ok(())
    }

    fn list_backups(&self, tenant: &str) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir(tenant)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(key) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };

            let bytes = fs::read(path)?;
            let created_at = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
                Some(modified) => DateTime::<Utc>::from(modified),
                None => {
                    warn!(tenant, key = %key, "backup has no modification time");
                    DateTime::<Utc>::from(std::time::UNIX_EPOCH)
                }
            };

            backups.push(BackupInfo {
                checksum: Self::read_checksum(path, &bytes)?,
                key,
                created_at,
                size_bytes: bytes.len() as u64,
            });
        }

        // Keys are UTC timestamps, so lexical order is chronological
        backups.sort_by(|a, b| b.key.cmp(&a.key));
        Ok(backups)
    }

    fn load_backup(&self, tenant: &str, key: &str) -> Result<Document> {
        if key.is_empty() || key.contains("..") || key.contains(['/', '\\']) {
            return Err(EngineError::NotFound {
                tenant: format!("{}@{}", tenant, key),
            });
        }

        let path = self.backup_dir(tenant)?.join(format!("{}.json", key));
        if !path.exists() {
            return Err(EngineError::NotFound {
                tenant: format!("{}@{}", tenant, key),
            });
        }

        let bytes = fs::read(&path)?;
        Self::read_checksum(&path, &bytes)?.verify(&bytes)?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Document::from_value(value)
    }
}
