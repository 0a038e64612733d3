//! Ownership rules and their cached, expiring form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifies the repository a rule is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryRef<'a> {
    /// Host display name.
    pub host: &'a str,
    pub organization: &'a str,
    pub repository: &'a str,
}

impl<'a> RepositoryRef<'a> {
    /// Creates a new repository reference.
    pub fn new(host: &'a str, organization: &'a str, repository: &'a str) -> Self {
        Self {
            host,
            organization,
            repository,
        }
    }
}

/// A single resolved pattern-to-owners mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOwner {
    pub host: String,
    pub organization: String,
    pub repository: String,
    /// The file glob pattern.
    pub pattern: String,
    /// Owner identifiers in file order. Empty means unspecified.
    pub owners: Vec<String>,
    /// Parent owner group; empty when ungrouped.
    pub parent: String,
}

impl RepositoryOwner {
    /// Creates a rule for the given repository.
    pub fn new(
        target: RepositoryRef<'_>,
        pattern: impl Into<String>,
        owners: Vec<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            host: target.host.to_string(),
            organization: target.organization.to_string(),
            repository: target.repository.to_string(),
            pattern: pattern.into(),
            owners,
            parent: parent.into(),
        }
    }

    /// Creates the catch-all rule synthesized for a parent group with no rules.
    pub fn catch_all(target: RepositoryRef<'_>, parent: impl Into<String>) -> Self {
        Self::new(target, "*", Vec::new(), parent)
    }

    /// Returns a copy of this rule under a different parent group.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Returns the deterministic storage identifier for this rule.
    pub fn record_id(&self) -> String {
        derive_record_id(
            &self.host,
            &self.organization,
            &self.repository,
            &self.pattern,
            &self.parent,
            &self.owners,
        )
    }
}

/// Derives the storage identifier of a rule from its content.
///
/// Owners are concatenated before hashing, so the identifier depends on owner
/// order. Fields are separated by a unit separator so that shifting text
/// between adjacent fields changes the identifier.
pub fn derive_record_id(
    host: &str,
    organization: &str,
    repository: &str,
    pattern: &str,
    parent: &str,
    owners: &[String],
) -> String {
    let mut hasher = Sha256::new();
    for field in [host, organization, repository, pattern, parent] {
        hasher.update(field.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.update(owners.concat().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A rule persisted in the ownership store with an expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOwnerRecord {
    /// Identifier derived from the rule content.
    pub id: String,
    pub host: String,
    pub organization: String,
    pub repository: String,
    pub pattern: String,
    pub owners: Vec<String>,
    pub parent: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RepositoryOwnerRecord {
    /// Wraps a resolved rule for storage.
    pub fn from_owner(
        owner: RepositoryOwner,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let id = owner.record_id();
        Self {
            id,
            host: owner.host,
            organization: owner.organization,
            repository: owner.repository,
            pattern: owner.pattern,
            owners: owner.owners,
            parent: owner.parent,
            created_at,
            expires_at,
        }
    }

    /// Unwraps the stored rule.
    pub fn into_owner(self) -> RepositoryOwner {
        RepositoryOwner {
            host: self.host,
            organization: self.organization,
            repository: self.repository,
            pattern: self.pattern,
            owners: self.owners,
            parent: self.parent,
        }
    }

    /// Returns true while `now` is strictly before the expiry.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Returns true if this record belongs to the given repository.
    pub fn is_for(&self, host: &str, organization: &str, repository: &str) -> bool {
        self.host == host && self.organization == organization && self.repository == repository
    }
}
