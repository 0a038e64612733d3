//! Error types for ownership resolution.
//!
//! Resolution faults propagate as a single [`ManagerError`]. Crawls collect
//! per-item faults into [`CrawlErrors`] and only surface them once the whole
//! reachable scope has been attempted.

use crate::host_client::HostingClientError;
use std::fmt;
use thiserror::Error;

/// An error raised while resolving or caching repository ownership.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Required input was missing or blank.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The requested host is not configured.
    #[error("host '{0}' not found")]
    HostNotFound(String),

    /// The credential for a host could not be retrieved.
    #[error("secret error: {0}")]
    Secret(String),

    /// The hosting API failed.
    #[error(transparent)]
    HostingClient(#[from] HostingClientError),

    /// The ownership or host store failed.
    #[error("store error: {0}")]
    Store(String),

    /// One or more failures collected during a crawl.
    #[error("{0}")]
    Aggregate(CrawlErrors),
}

impl ManagerError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Returns true if this is an input validation fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, ManagerError::Validation(_))
    }
}

/// A single failure captured during a crawl, with the item it belongs to.
#[derive(Debug)]
pub struct CrawlFailure {
    /// What was being processed (host, organization, page or repository).
    pub context: String,
    /// The underlying fault.
    pub error: ManagerError,
}

impl fmt::Display for CrawlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.error)
    }
}

/// Failures collected while crawling a host.
///
/// An empty collection is equivalent to success.
#[derive(Debug, Default)]
pub struct CrawlErrors {
    failures: Vec<CrawlFailure>,
}

impl CrawlErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for the given context.
    pub fn push(&mut self, context: impl Into<String>, error: impl Into<ManagerError>) {
        self.failures.push(CrawlFailure {
            context: context.into(),
            error: error.into(),
        });
    }

    /// Moves every failure from `other` into this collection.
    pub fn extend(&mut self, other: CrawlErrors) {
        self.failures.extend(other.failures);
    }

    /// Returns true if no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of recorded failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Iterates over the recorded failures in the order they occurred.
    pub fn iter(&self) -> impl Iterator<Item = &CrawlFailure> {
        self.failures.iter()
    }

    /// Formats every failure, one per line.
    pub fn format_all(&self) -> String {
        self.failures
            .iter()
            .map(|failure| failure.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Converts into `Ok(())` when empty, or an aggregate error otherwise.
    pub fn into_result(self) -> Result<(), ManagerError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ManagerError::Aggregate(self))
        }
    }
}

impl fmt::Display for CrawlErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failure(s) while processing repository owners:\n{}",
            self.failures.len(),
            self.format_all()
        )
    }
}
