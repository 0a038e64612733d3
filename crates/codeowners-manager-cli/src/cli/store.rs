//! JSON-file stores for hosts and ownership records.
//!
//! The host list is read once at startup. The owner store rewrites the whole
//! file on every batch through a staged sibling that is renamed over it;
//! records are keyed by id so identical content overwrites in place. Expiry
//! is logical.

use crate::cli::config::ConfigError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use codeowners_manager_core::error::ManagerError;
use codeowners_manager_core::models::{Host, RepositoryOwnerRecord};
use codeowners_manager_core::store::{HostStore, OwnerStore};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Hosts loaded from a JSON array.
#[derive(Debug)]
pub struct JsonHostStore {
    hosts: Vec<Host>,
}

impl JsonHostStore {
    /// Reads the host list from `path`.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ConfigError::Store(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let hosts: Vec<Host> = serde_json::from_str(&content).map_err(|e| {
            ConfigError::Store(format!("invalid hosts file '{}': {}", path.display(), e))
        })?;
        debug!("Loaded {} host(s) from {}", hosts.len(), path.display());
        Ok(Self { hosts })
    }
}

#[async_trait]
impl HostStore for JsonHostStore {
    async fn get_host(&self, id: &str) -> Result<Option<Host>, ManagerError> {
        Ok(self.hosts.iter().find(|h| h.id == id).cloned())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, ManagerError> {
        Ok(self.hosts.clone())
    }
}

/// Ownership records persisted as a JSON array.
#[derive(Debug)]
pub struct JsonOwnerStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonOwnerStore {
    /// Creates a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, RepositoryOwnerRecord>, ManagerError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ManagerError::store(format!(
                    "failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let records: Vec<RepositoryOwnerRecord> = serde_json::from_str(&content).map_err(|e| {
            ManagerError::store(format!("invalid owner store '{}': {}", self.path.display(), e))
        })?;
        Ok(records.into_iter().map(|r| (r.id.clone(), r)).collect())
    }

    async fn write_all(
        &self,
        records: &BTreeMap<String, RepositoryOwnerRecord>,
    ) -> Result<(), ManagerError> {
        let list: Vec<_> = records.values().collect();
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| ManagerError::store(format!("failed to encode records: {}", e)))?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, json).await.map_err(|e| {
            ManagerError::store(format!("failed to write '{}': {}", staging.display(), e))
        })?;
        tokio::fs::rename(&staging, &self.path).await.map_err(|e| {
            ManagerError::store(format!("failed to replace '{}': {}", self.path.display(), e))
        })
    }

    /// Sibling file each batch is staged in before it replaces the store.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl OwnerStore for JsonOwnerStore {
    async fn get_live_records(
        &self,
        host: &str,
        organization: &str,
        repository: &str,
        not_expired_as_of: DateTime<Utc>,
    ) -> Result<Vec<RepositoryOwnerRecord>, ManagerError> {
        let _guard = self.lock.lock().await;
        let records = self.read_all().await?;
        Ok(records
            .into_values()
            .filter(|r| r.is_for(host, organization, repository))
            .filter(|r| r.is_live_at(not_expired_as_of))
            .collect())
    }

    async fn batch_write(&self, records: Vec<RepositoryOwnerRecord>) -> Result<(), ManagerError> {
        if records.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock().await;
        let mut stored = self.read_all().await?;
        let count = records.len();
        for record in records {
            stored.insert(record.id.clone(), record);
        }
        self.write_all(&stored).await?;
        debug!("Wrote {} record(s) to {}", count, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use codeowners_manager_core::models::{RepositoryOwner, RepositoryRef};
    use std::fs;
    use tempfile::TempDir;

    fn record(repo: &str, owner: &str, expires_at: DateTime<Utc>) -> RepositoryOwnerRecord {
        let rule = RepositoryOwner::new(
            RepositoryRef::new("github", "acme", repo),
            "*",
            vec![owner.to_string()],
            "",
        );
        RepositoryOwnerRecord::from_owner(rule, expires_at - Duration::minutes(60), expires_at)
    }

    #[tokio::test]
    async fn test_load_hosts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.json");
        fs::write(
            &path,
            r###"[
                {"id": "gh", "name": "github", "clientSecretName": "gh-token"},
                {"id": "ghe", "name": "enterprise", "baseUrl": "https://ghe.example.com/api/v3",
                 "hostType": "GitHub Enterprise Server", "authenticationType": "oauth",
                 "clientSecretName": "ghe-token", "parentOwnerLinePattern": "## "}
            ]"###,
        )
        .unwrap();

        let store = JsonHostStore::load(&path).await.unwrap();
        assert_eq!(store.list_hosts().await.unwrap().len(), 2);
        let ghe = store.get_host("ghe").await.unwrap().unwrap();
        assert!(ghe.is_enterprise());
        assert_eq!(ghe.parent_owner_line_pattern, "## ");
        assert!(store.get_host("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_hosts_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonHostStore::load(&path).await,
            Err(ConfigError::Store(_))
        ));
        assert!(JsonHostStore::load(&dir.path().join("missing.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonOwnerStore::new(dir.path().join("owners.json"));
        let live = store
            .get_live_records("github", "acme", "api", Utc::now())
            .await
            .unwrap();
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_write_and_filter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("owners.json");
        let store = JsonOwnerStore::new(&path);
        let now = Utc::now();

        store
            .batch_write(vec![
                record("api", "@live", now + Duration::minutes(5)),
                record("api", "@expired", now - Duration::minutes(5)),
                record("web", "@other", now + Duration::minutes(5)),
            ])
            .await
            .unwrap();

        let live = store.get_live_records("github", "acme", "api", now).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].owners, vec!["@live"]);

        let reopened = JsonOwnerStore::new(&path);
        let live = reopened.get_live_records("github", "acme", "web", now).await.unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn test_same_id_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = JsonOwnerStore::new(dir.path().join("owners.json"));
        let now = Utc::now();

        store
            .batch_write(vec![record("api", "@team", now - Duration::minutes(1))])
            .await
            .unwrap();
        store
            .batch_write(vec![record("api", "@team", now + Duration::minutes(30))])
            .await
            .unwrap();

        let live = store.get_live_records("github", "acme", "api", now).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].expires_at, now + Duration::minutes(30));
    }

    #[tokio::test]
    async fn test_batch_replaces_store_through_staging_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("owners.json");
        let staging = dir.path().join("owners.json.tmp");
        fs::write(&staging, "{half written").unwrap();
        let store = JsonOwnerStore::new(&path);
        let now = Utc::now();

        store
            .batch_write(vec![record("api", "@team", now + Duration::minutes(5))])
            .await
            .unwrap();

        assert!(!staging.exists());
        let stored: Vec<RepositoryOwnerRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].owners, vec!["@team"]);
    }
}
