//! Cached access to repository ownership.
//!
//! Single lookups are cache-aside: live records are served as they are, and a
//! miss resolves and stores fresh rules. Bulk loads are write-through: every
//! crawled repository is resolved and written regardless of what the store
//! already holds.

use crate::config::CacheConfig;
use crate::error::{CrawlErrors, ManagerError};
use crate::models::{Host, RepositoryOwner, RepositoryOwnerRecord};
use crate::resolve::{OwnerResolver, OwnerSink};
use crate::store::{HostStore, OwnerStore, dedupe_batch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

/// Ownership lookups backed by a record store and a resolver.
pub struct OwnershipCache {
    hosts: Arc<dyn HostStore>,
    owners: Arc<dyn OwnerStore>,
    resolver: Arc<dyn OwnerResolver>,
    config: CacheConfig,
}

impl OwnershipCache {
    /// Creates a cache with the default configuration.
    pub fn new(
        hosts: Arc<dyn HostStore>,
        owners: Arc<dyn OwnerStore>,
        resolver: Arc<dyn OwnerResolver>,
    ) -> Self {
        Self {
            hosts,
            owners,
            resolver,
            config: CacheConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the rules for a repository, resolving them on a cache miss.
    pub async fn get_repository_owners(
        &self,
        host: &str,
        organization: &str,
        repository: &str,
    ) -> Result<Vec<RepositoryOwner>, ManagerError> {
        self.get_repository_owners_at(host, organization, repository, Utc::now())
            .await
    }

    /// Same as [`get_repository_owners`](Self::get_repository_owners), with an
    /// explicit clock.
    ///
    /// Any live record for the repository counts as a hit, and every live
    /// record is returned. Empty resolutions are not stored.
    pub async fn get_repository_owners_at(
        &self,
        host: &str,
        organization: &str,
        repository: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RepositoryOwner>, ManagerError> {
        for (name, value) in [
            ("host", host),
            ("organization", organization),
            ("repository", repository),
        ] {
            if value.trim().is_empty() {
                return Err(ManagerError::validation(format!("{} is required", name)));
            }
        }

        let host = self.load_host(host).await?;
        let cached = self
            .owners
            .get_live_records(&host.name, organization, repository, now)
            .await?;
        if !cached.is_empty() {
            debug!(
                "Cache hit for {}/{}/{} ({} record(s))",
                host.name,
                organization,
                repository,
                cached.len()
            );
            return Ok(cached
                .into_iter()
                .map(RepositoryOwnerRecord::into_owner)
                .collect());
        }

        info!("Cache miss for {}/{}/{}, resolving", host.name, organization, repository);
        let owners = self
            .resolver
            .resolve_repository_owners(&host, organization, repository)
            .await?;
        if owners.is_empty() {
            return Ok(owners);
        }

        let records = to_records(&owners, now, self.config.expiry_from(now));
        self.owners.batch_write(dedupe_batch(records)).await?;
        Ok(owners)
    }

    /// Crawls and stores the rules of every repository on one host, or on all
    /// configured hosts when `host` is `None`.
    ///
    /// Per-host and per-repository failures do not stop the load. They are
    /// returned together as [`ManagerError::Aggregate`] once every host has
    /// been attempted.
    pub async fn load_repository_owners(
        &self,
        host: Option<&str>,
        organization: Option<&str>,
    ) -> Result<(), ManagerError> {
        let hosts = match host.filter(|id| !id.trim().is_empty()) {
            Some(id) => vec![self.load_host(id).await?],
            None => self.hosts.list_hosts().await?,
        };
        let organization = organization.filter(|org| !org.trim().is_empty());

        let mut errors = CrawlErrors::new();
        let mut written = 0;
        for host in &hosts {
            let mut sink = StoreSink::new(self.owners.as_ref(), self.config);
            match self
                .resolver
                .process_repository_owners(host, organization, &mut sink)
                .await
            {
                Ok(report) => {
                    if !report.is_clean() {
                        warn!(
                            "Loaded {} with {} failure(s)",
                            host.name,
                            report.errors.len()
                        );
                    }
                    errors.extend(report.errors);
                }
                Err(e) => errors.push(format!("host {}", host.id), e),
            }
            written += sink.written;
        }

        info!(
            "Wrote {} ownership record(s) across {} host(s)",
            written,
            hosts.len()
        );
        errors.into_result()
    }

    async fn load_host(&self, id: &str) -> Result<Host, ManagerError> {
        self.hosts
            .get_host(id)
            .await?
            .ok_or_else(|| ManagerError::HostNotFound(id.to_string()))
    }
}

fn to_records(
    owners: &[RepositoryOwner],
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Vec<RepositoryOwnerRecord> {
    owners
        .iter()
        .cloned()
        .map(|owner| RepositoryOwnerRecord::from_owner(owner, created_at, expires_at))
        .collect()
}

/// Writes each crawled repository straight to the store.
struct StoreSink<'a> {
    store: &'a dyn OwnerStore,
    config: CacheConfig,
    written: usize,
}

impl<'a> StoreSink<'a> {
    fn new(store: &'a dyn OwnerStore, config: CacheConfig) -> Self {
        Self {
            store,
            config,
            written: 0,
        }
    }
}

#[async_trait]
impl<'a> OwnerSink for StoreSink<'a> {
    async fn accept(&mut self, owners: Vec<RepositoryOwner>) -> Result<(), ManagerError> {
        let now = Utc::now();
        let records = dedupe_batch(to_records(&owners, now, self.config.expiry_from(now)));
        let count = records.len();
        self.store.batch_write(records).await?;
        self.written += count;
        Ok(())
    }
}
