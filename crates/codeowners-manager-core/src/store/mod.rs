//! Storage abstraction for hosts and cached ownership records.
//!
//! The store traits describe the operations the ownership cache needs,
//! enabling pluggable backends. Expiry is logical: expired records may remain
//! stored but are never returned by [`OwnerStore::get_live_records`].

pub mod memory;

use crate::error::ManagerError;
use crate::models::{Host, RepositoryOwnerRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::trace;
use std::collections::HashSet;

/// Read-only access to configured hosts.
#[async_trait]
pub trait HostStore: Send + Sync {
    /// Fetches a host by identifier. `Ok(None)` if it isn't configured.
    async fn get_host(&self, id: &str) -> Result<Option<Host>, ManagerError>;

    /// Lists every configured host.
    async fn list_hosts(&self) -> Result<Vec<Host>, ManagerError>;
}

/// Persistence for resolved ownership records.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    /// Returns the records for a repository whose expiry is strictly after
    /// `not_expired_as_of`.
    async fn get_live_records(
        &self,
        host: &str,
        organization: &str,
        repository: &str,
        not_expired_as_of: DateTime<Utc>,
    ) -> Result<Vec<RepositoryOwnerRecord>, ManagerError>;

    /// Writes a batch of records, overwriting any with the same id.
    ///
    /// Callers pass batches through [`dedupe_batch`] first.
    async fn batch_write(&self, records: Vec<RepositoryOwnerRecord>) -> Result<(), ManagerError>;
}

/// Drops records whose id already appeared earlier in the batch.
///
/// The first occurrence wins.
pub fn dedupe_batch(records: Vec<RepositoryOwnerRecord>) -> Vec<RepositoryOwnerRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.id.clone());
            if !fresh {
                trace!("Dropping duplicate record {} from batch", record.id);
            }
            fresh
        })
        .collect()
}
