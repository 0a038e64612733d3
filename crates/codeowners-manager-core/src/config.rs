//! Configuration for ownership resolution and caching.

use chrono::{DateTime, Duration, Utc};

/// Default name of the organization-wide ownership repository.
pub const DEFAULT_ORGANIZATION_REPOSITORY: &str = "codeowners";

/// Default path of the shared fallback file inside that repository.
pub const DEFAULT_ORGANIZATION_DEFAULT_PATH: &str = "default/CODEOWNERS";

/// Default cache lifetime.
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Largest page size the hosting API accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Configuration options for the ownership resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Repository in each organization that holds organization-scoped
    /// CODEOWNERS files.
    pub organization_repository: String,
    /// Shared fallback path inside the organization repository, used when
    /// there is no `{repository}/CODEOWNERS` entry.
    pub organization_default_path: String,
    /// Page size for every listing and search call.
    pub per_page: u8,
    /// Restrict single-repository discovery to the repository and the
    /// organization repository instead of searching the whole organization.
    pub targeted_search: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            organization_repository: DEFAULT_ORGANIZATION_REPOSITORY.to_string(),
            organization_default_path: DEFAULT_ORGANIZATION_DEFAULT_PATH.to_string(),
            per_page: MAX_PER_PAGE,
            targeted_search: false,
        }
    }
}

impl ResolverConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the organization-wide ownership repository name.
    pub fn with_organization_repository(mut self, name: impl Into<String>) -> Self {
        self.organization_repository = name.into();
        self
    }

    /// Sets the shared fallback path.
    pub fn with_organization_default_path(mut self, path: impl Into<String>) -> Self {
        self.organization_default_path = path.into();
        self
    }

    /// Sets the page size, clamped to `1..=100`.
    pub fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Enables or disables targeted single-repository search.
    pub fn with_targeted_search(mut self, targeted: bool) -> Self {
        self.targeted_search = targeted;
        self
    }
}

/// Configuration options for the ownership cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a freshly resolved record stays live.
    pub ttl_minutes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time-to-live in minutes.
    pub fn with_ttl_minutes(mut self, ttl_minutes: i64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    /// Returns the expiry for records written at `now`.
    pub fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(self.ttl_minutes)
    }
}
