//! Hosting API client trait abstraction.
//!
//! This module provides a trait-based abstraction for the code-host API calls
//! needed to discover CODEOWNERS files, allowing different implementations
//! (e.g., octocrab, or in-memory mocks for tests).

use crate::models::Host;
use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The result of checking whether a repository exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryLookup {
    /// The repository exists and is accessible.
    Found,
    /// The host reported the repository as not found.
    NotFound,
}

impl fmt::Display for RepositoryLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryLookup::Found => write!(f, "found"),
            RepositoryLookup::NotFound => write!(f, "not_found"),
        }
    }
}

/// An organization on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Numeric identifier, used as the cursor for administrative listing.
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A repository within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A file matched by a code search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSearchHit {
    /// Name of the repository holding the file.
    pub repository: String,
    /// Path of the file inside the repository.
    pub path: String,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The next page number, if the host reported one.
    pub next_page: Option<u32>,
    /// Set when the host could not return every match (search only).
    pub incomplete: bool,
}

impl<T> Page<T> {
    /// Creates a complete page.
    pub fn new(items: Vec<T>, next_page: Option<u32>) -> Self {
        Self {
            items,
            next_page,
            incomplete: false,
        }
    }

    /// Creates a final page with no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Marks the page as incomplete.
    pub fn with_incomplete(mut self, incomplete: bool) -> Self {
        self.incomplete = incomplete;
        self
    }
}

/// Errors that can occur when interacting with the hosting API.
#[derive(Debug, Error)]
pub enum HostingClientError {
    /// An API error occurred.
    #[error("hosting API error: {0}")]
    ApiError(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Authentication failed or the client could not be built.
    #[error("authentication error: {0}")]
    AuthError(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Trait for hosting API client implementations.
///
/// Every listing call takes an explicit page size and returns a [`Page`];
/// callers drive pagination.
#[async_trait]
pub trait HostingClient: Send + Sync {
    /// Fetches a single organization by login.
    async fn get_organization(&self, org: &str) -> Result<Organization, HostingClientError>;

    /// Checks whether a repository exists.
    ///
    /// A "not found" answer from the host is `Ok(RepositoryLookup::NotFound)`,
    /// never an error.
    async fn get_repository(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<RepositoryLookup, HostingClientError>;

    /// Lists every organization on the instance (administrative listing).
    ///
    /// Paginated by cursor: `since` is the id of the last organization seen.
    async fn list_all_organizations(
        &self,
        since: Option<u64>,
        per_page: u8,
    ) -> Result<Page<Organization>, HostingClientError>;

    /// Lists the organizations the authenticated identity belongs to.
    async fn list_member_organizations(
        &self,
        page: u32,
        per_page: u8,
    ) -> Result<Page<Organization>, HostingClientError>;

    /// Lists repositories in an organization, sorted by full name ascending.
    async fn list_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<Repository>, HostingClientError>;

    /// Runs a code search query.
    async fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<CodeSearchHit>, HostingClientError>;

    /// Fetches the decoded text of a file.
    async fn get_file_content(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, HostingClientError>;
}

/// Builds authenticated hosting clients for a host.
pub trait HostingClientFactory: Send + Sync {
    /// Creates a client for `host` using the given credential.
    fn connect(
        &self,
        host: &Host,
        secret: &SecretString,
    ) -> Result<Arc<dyn HostingClient>, HostingClientError>;
}
