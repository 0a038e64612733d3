//! Ownership resolution against a code host.
//!
//! A resolver discovers candidate CODEOWNERS files, picks the
//! highest-priority file per scope, and merges repository rules with
//! organization rules:
//!
//! 1. The repository's own file wins when it yields any rule.
//! 2. Otherwise the organization file for the repository is used.
//! 3. Repository rules without a parent inherit the first organization parent.

mod candidates;
mod coalesce;
mod resolver;

pub use candidates::{
    CandidateIndex, discover_candidates, organization_query, repository_query,
};
pub use coalesce::{REPOSITORY_CODEOWNERS_PATHS, coalesce};
pub use resolver::{CodeownersResolver, apply_organization_defaults, select_owners};

use crate::error::{CrawlErrors, ManagerError};
use crate::models::{Host, RepositoryOwner};
use async_trait::async_trait;

/// Resolves ownership rules for one repository or a whole host.
#[async_trait]
pub trait OwnerResolver: Send + Sync {
    /// Resolves the rules for a single repository.
    ///
    /// A repository the host reports as not found yields an empty list.
    async fn resolve_repository_owners(
        &self,
        host: &Host,
        organization: &str,
        repository: &str,
    ) -> Result<Vec<RepositoryOwner>, ManagerError>;

    /// Crawls every reachable organization (or only `organization` when
    /// given) and hands each repository's non-empty rule set to `sink`.
    ///
    /// Failures on individual organizations, pages and repositories are
    /// collected in the report rather than stopping the crawl. An `Err` means
    /// nothing could be crawled at all.
    async fn process_repository_owners(
        &self,
        host: &Host,
        organization: Option<&str>,
        sink: &mut dyn OwnerSink,
    ) -> Result<CrawlReport, ManagerError>;
}

/// Receives the rules of each crawled repository.
#[async_trait]
pub trait OwnerSink: Send {
    /// Accepts the rules of one repository.
    async fn accept(&mut self, owners: Vec<RepositoryOwner>) -> Result<(), ManagerError>;
}

#[async_trait]
impl OwnerSink for Vec<Vec<RepositoryOwner>> {
    async fn accept(&mut self, owners: Vec<RepositoryOwner>) -> Result<(), ManagerError> {
        self.push(owners);
        Ok(())
    }
}

/// Outcome of crawling one host.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Organizations visited.
    pub organizations: usize,
    /// Repositories visited.
    pub repositories: usize,
    /// Repositories that produced at least one rule.
    pub repositories_with_owners: usize,
    /// Failures captured along the way.
    pub errors: CrawlErrors,
}

impl CrawlReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no failure was captured.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
