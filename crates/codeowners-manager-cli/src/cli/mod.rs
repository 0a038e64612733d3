//! CLI module for the CODEOWNERS manager.
//!
//! Command-line argument parsing using Clap with environment variable
//! support, plus the concrete collaborators the core library needs: an
//! octocrab hosting client, environment secrets and JSON-file stores.

pub mod config;
pub mod github;
pub mod output;
pub mod secrets;
pub mod store;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CODEOWNERS manager - resolves and caches repository ownership.
///
/// Looks up who owns which paths of a repository from CODEOWNERS files on a
/// GitHub-compatible host, falling back to the organization's ownership
/// repository, and caches the result with a time-to-live.
#[derive(Parser, Debug)]
#[command(name = "codeowners-manager")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Operation to run.
    #[arg(long, env = "CODEOWNERS_ACTION", default_value = "get")]
    pub action: Action,

    /// Host identifier. Required for 'get'; 'load' crawls every host when unset.
    #[arg(long, env = "CODEOWNERS_HOST")]
    pub host: Option<String>,

    /// Organization login. Required for 'get'; limits 'load' to one organization.
    #[arg(long, env = "CODEOWNERS_ORGANIZATION")]
    pub organization: Option<String>,

    /// Repository name. Required for 'get'.
    #[arg(long, env = "CODEOWNERS_REPOSITORY")]
    pub repository: Option<String>,

    /// JSON file listing the configured hosts.
    #[arg(long, env = "CODEOWNERS_HOSTS_FILE", default_value = "hosts.json")]
    pub hosts_file: PathBuf,

    /// JSON file holding cached ownership records.
    #[arg(long, env = "CODEOWNERS_OWNER_STORE", default_value = "owners.json")]
    pub owner_store: PathBuf,

    /// Minutes a freshly resolved record stays live.
    #[arg(long, env = "CODEOWNERS_TTL_MINUTES", default_value_t = 60)]
    pub ttl_minutes: i64,

    /// Repository in each organization holding organization-scoped CODEOWNERS files.
    #[arg(long, env = "CODEOWNERS_ORGANIZATION_REPOSITORY", default_value = "codeowners")]
    pub organization_repository: String,

    /// Shared fallback path inside the organization repository.
    #[arg(
        long,
        env = "CODEOWNERS_ORGANIZATION_DEFAULT_PATH",
        default_value = "default/CODEOWNERS"
    )]
    pub organization_default_path: String,

    /// Search only the repository and the organization repository on lookups.
    #[arg(long, env = "CODEOWNERS_TARGETED_SEARCH", default_value = "false")]
    pub targeted_search: bool,

    /// Output results as JSON instead of human-readable format.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Operations the CLI can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Action {
    /// Look up one repository, resolving on a cache miss.
    #[default]
    Get,
    /// Crawl hosts and refresh every cached record.
    Load,
}
