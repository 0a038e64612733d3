//! Configuration handling for the CLI.
//!
//! This module converts CLI arguments into the library's configuration types
//! and decides process exit codes.

use crate::cli::{Action, Args};
use codeowners_manager_core::{CacheConfig, ManagerError, ResolverConfig};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration.
    #[error("missing required configuration: {0}")]
    MissingRequired(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A store file could not be read or parsed.
    #[error("store file error: {0}")]
    Store(String),
}

/// Application exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The operation completed successfully.
    Success = 0,
    /// Application startup failed (wrong configuration or internal error).
    StartupFailure = 1,
    /// Application terminated by signal (SIGINT/SIGTERM).
    Terminated = 2,
    /// The lookup or load failed, fully or in part.
    OperationFailed = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Maps an operation error to an exit code.
    pub fn for_error(error: &ManagerError) -> Self {
        match error {
            ManagerError::Validation(_) | ManagerError::HostNotFound(_) => ExitCode::StartupFailure,
            _ => ExitCode::OperationFailed,
        }
    }
}

/// A single-repository lookup target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTarget {
    pub host: String,
    pub organization: String,
    pub repository: String,
}

/// Validated and processed configuration for running the manager.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Operation to run.
    pub action: Action,
    /// Lookup target, set for [`Action::Get`].
    pub target: Option<LookupTarget>,
    /// Host filter for [`Action::Load`].
    pub host: Option<String>,
    /// Organization filter for [`Action::Load`].
    pub organization: Option<String>,
    /// Path to the JSON host list.
    pub hosts_file: PathBuf,
    /// Path to the JSON ownership record store.
    pub owner_store: PathBuf,
    /// Configuration for the resolver.
    pub resolver_config: ResolverConfig,
    /// Configuration for the cache.
    pub cache_config: CacheConfig,
    /// Whether to output JSON.
    pub json_output: bool,
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let host = non_blank(&args.host);
        let organization = non_blank(&args.organization);
        let repository = non_blank(&args.repository);

        let target = match args.action {
            Action::Get => Some(LookupTarget {
                host: required(host.clone(), "CODEOWNERS_HOST")?,
                organization: required(organization.clone(), "CODEOWNERS_ORGANIZATION")?,
                repository: required(repository, "CODEOWNERS_REPOSITORY")?,
            }),
            Action::Load => None,
        };

        if args.ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(format!(
                "ttl minutes must be positive, got {}",
                args.ttl_minutes
            )));
        }

        if !args.hosts_file.is_file() {
            return Err(ConfigError::Invalid(format!(
                "hosts file '{}' does not exist",
                args.hosts_file.display()
            )));
        }

        if args.organization_repository.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "organization repository must not be blank".to_string(),
            ));
        }

        let resolver_config = ResolverConfig::new()
            .with_organization_repository(args.organization_repository.trim())
            .with_organization_default_path(args.organization_default_path.trim())
            .with_targeted_search(args.targeted_search);

        Ok(Self {
            action: args.action,
            target,
            host,
            organization,
            hosts_file: args.hosts_file.clone(),
            owner_store: args.owner_store.clone(),
            resolver_config,
            cache_config: CacheConfig::new().with_ttl_minutes(args.ttl_minutes),
            json_output: args.json,
        })
    }

    /// Determines the exit code for an operation outcome.
    pub fn exit_code_for(&self, result: &Result<(), ManagerError>) -> ExitCode {
        match result {
            Ok(()) => ExitCode::Success,
            Err(e) => ExitCode::for_error(e),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: Option<String>, name: &str) -> Result<String, ConfigError> {
    value.ok_or_else(|| {
        ConfigError::MissingRequired(format!("{} is required for the 'get' action", name))
    })
}
