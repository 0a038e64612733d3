//! In-memory store implementations.
//!
//! Uses `HashMap` behind `std::sync::RwLock` for thread safety. Records are
//! keyed by their derived id, so writing identical content overwrites.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{HostStore, OwnerStore};
use crate::error::ManagerError;
use crate::models::{Host, RepositoryOwnerRecord};

/// Host store backed by a fixed list.
#[derive(Debug, Default)]
pub struct InMemoryHostStore {
    hosts: Vec<Host>,
}

impl InMemoryHostStore {
    pub fn new(hosts: Vec<Host>) -> Self {
        Self { hosts }
    }
}

#[async_trait]
impl HostStore for InMemoryHostStore {
    async fn get_host(&self, id: &str) -> Result<Option<Host>, ManagerError> {
        Ok(self.hosts.iter().find(|h| h.id == id).cloned())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, ManagerError> {
        Ok(self.hosts.clone())
    }
}

/// Ownership record store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryOwnerStore {
    records: RwLock<HashMap<String, RepositoryOwnerRecord>>,
}

impl InMemoryOwnerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with records.
    pub fn with_records(records: Vec<RepositoryOwnerRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    /// Returns every stored record, live or expired.
    pub fn all_records(&self) -> Result<Vec<RepositoryOwnerRecord>, ManagerError> {
        let records = self
            .records
            .read()
            .map_err(|_| ManagerError::store("record lock poisoned"))?;
        Ok(records.values().cloned().collect())
    }
}

#[async_trait]
impl OwnerStore for InMemoryOwnerStore {
    async fn get_live_records(
        &self,
        host: &str,
        organization: &str,
        repository: &str,
        not_expired_as_of: DateTime<Utc>,
    ) -> Result<Vec<RepositoryOwnerRecord>, ManagerError> {
        let records = self
            .records
            .read()
            .map_err(|_| ManagerError::store("record lock poisoned"))?;
        Ok(records
            .values()
            .filter(|r| r.is_for(host, organization, repository))
            .filter(|r| r.is_live_at(not_expired_as_of))
            .cloned()
            .collect())
    }

    async fn batch_write(&self, records: Vec<RepositoryOwnerRecord>) -> Result<(), ManagerError> {
        let mut stored = self
            .records
            .write()
            .map_err(|_| ManagerError::store("record lock poisoned"))?;
        for record in records {
            stored.insert(record.id.clone(), record);
        }
        Ok(())
    }
}
