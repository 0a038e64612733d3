//! CODEOWNERS Manager Core
//!
//! A library for resolving and caching repository ownership from CODEOWNERS
//! files hosted on GitHub-compatible code hosts.
//!
//! # Features
//!
//! - **Parser**: Turn CODEOWNERS text into rules grouped by parent owner
//! - **Resolution**: Pick the right file per scope and fall back from the
//!   repository to its organization
//! - **Crawling**: Walk every organization and repository on a host, collecting
//!   partial failures instead of stopping
//! - **Caching**: Serve live records, re-resolve on expiry, bulk refresh
//!
//! # Quick Start
//!
//! ```rust
//! use codeowners_manager_core::models::RepositoryRef;
//! use codeowners_manager_core::parse::parse_owners;
//! use codeowners_manager_core::resolve::select_owners;
//!
//! let target = RepositoryRef::new("github", "acme", "api");
//! let repository = parse_owners("* @api-team\n", "## ", target);
//! let organization = parse_owners("## Platform\n* @platform\n", "## ", target);
//!
//! let owners = select_owners(repository, organization);
//! assert_eq!(owners[0].owners, vec!["@api-team"]);
//! assert_eq!(owners[0].parent, "Platform");
//! ```
//!
//! # Modules
//!
//! - [`parse`]: CODEOWNERS parser with parent-owner grouping
//! - [`resolve`]: Candidate discovery, coalescing, resolution and crawling
//! - [`cache`]: Cache-aside lookups and write-through bulk loads
//! - [`store`]: Storage traits and in-memory backends

pub mod cache;
pub mod config;
pub mod error;
pub mod host_client;
pub mod models;
pub mod parse;
pub mod resolve;
pub mod secrets;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types at the crate root
pub use cache::OwnershipCache;
pub use config::{CacheConfig, ResolverConfig};
pub use error::{CrawlErrors, CrawlFailure, ManagerError};
pub use host_client::{HostingClient, HostingClientError, HostingClientFactory};
pub use models::{Host, RepositoryOwner, RepositoryOwnerRecord};
pub use parse::parse_owners;
pub use resolve::{CodeownersResolver, CrawlReport, OwnerResolver, OwnerSink};
pub use secrets::{SecretClient, SecretError};
pub use store::{HostStore, OwnerStore};
