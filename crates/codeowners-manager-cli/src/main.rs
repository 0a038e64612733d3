//! CODEOWNERS Manager CLI
//!
//! A command-line tool for resolving and caching repository ownership from
//! CODEOWNERS files.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode as StdExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;
use cli::Action;
use cli::config::{ExitCode, LookupTarget, ValidatedConfig};
use cli::github::OctocrabClientFactory;
use cli::output::{HumanOutput, LoadJson, OwnersJson};
use cli::secrets::EnvSecretClient;
use cli::store::{JsonHostStore, JsonOwnerStore};
use codeowners_manager_core::{CodeownersResolver, ManagerError, OwnershipCache};

#[tokio::main]
async fn main() -> StdExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose, args.json);

    // Set up signal handling for graceful shutdown
    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_clone = terminated.clone();

    tokio::spawn(async move {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }

        terminated_clone.store(true, Ordering::SeqCst);
    });

    let exit_code = run(args, &terminated).await;

    // Check if we were terminated by signal
    if terminated.load(Ordering::SeqCst) {
        return StdExitCode::from(ExitCode::Terminated as u8);
    }

    StdExitCode::from(i32::from(exit_code) as u8)
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Don't output logs when using JSON output mode
    if json_output {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["octocrab=warn", "hyper=warn", "reqwest=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Run the requested action with the given arguments.
async fn run(args: Args, terminated: &AtomicBool) -> ExitCode {
    let mut stderr = io::stderr().lock();

    // Validate configuration
    let config = match ValidatedConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            let use_colors = !args.json && io::stderr().is_terminal();
            let _ = HumanOutput::new(&mut stderr, use_colors).write_error(&e.to_string());
            return ExitCode::StartupFailure;
        }
    };
    debug!("Validated configuration: {:?}", config);

    let use_colors = !config.json_output && io::stdout().is_terminal();

    let hosts = match JsonHostStore::load(&config.hosts_file).await {
        Ok(hosts) => hosts,
        Err(e) => {
            let _ = HumanOutput::new(&mut stderr, use_colors).write_error(&e.to_string());
            return ExitCode::StartupFailure;
        }
    };
    drop(stderr);

    let resolver = CodeownersResolver::new(
        Arc::new(EnvSecretClient::new()),
        Arc::new(OctocrabClientFactory::new()),
    )
    .with_config(config.resolver_config.clone());
    let cache = OwnershipCache::new(
        Arc::new(hosts),
        Arc::new(JsonOwnerStore::new(&config.owner_store)),
        Arc::new(resolver),
    )
    .with_config(config.cache_config);

    // Check for termination
    if terminated.load(Ordering::SeqCst) {
        return ExitCode::Terminated;
    }

    match (&config.action, &config.target) {
        (Action::Get, Some(target)) => run_get(&cache, target, &config, use_colors).await,
        (Action::Get, None) => ExitCode::StartupFailure,
        (Action::Load, _) => run_load(&cache, &config, use_colors).await,
    }
}

/// Look up one repository and print its rules.
async fn run_get(
    cache: &OwnershipCache,
    target: &LookupTarget,
    config: &ValidatedConfig,
    use_colors: bool,
) -> ExitCode {
    info!(
        "Looking up owners for {}/{} on {}",
        target.organization, target.repository, target.host
    );

    let owners = match cache
        .get_repository_owners(&target.host, &target.organization, &target.repository)
        .await
    {
        Ok(owners) => owners,
        Err(e) => {
            error!("Lookup failed: {}", e);
            let mut stderr = io::stderr().lock();
            let _ = HumanOutput::new(&mut stderr, use_colors).write_error(&e.to_string());
            return ExitCode::for_error(&e);
        }
    };

    let mut stdout = io::stdout().lock();
    let written = if config.json_output {
        OwnersJson {
            host: &target.host,
            organization: &target.organization,
            repository: &target.repository,
            owners: &owners,
        }
        .write(&mut stdout)
    } else {
        HumanOutput::new(&mut stdout, use_colors).write_owners(
            &target.organization,
            &target.repository,
            &owners,
        )
    };

    if let Err(e) = written.and_then(|_| stdout.flush()) {
        error!("Failed to write output: {}", e);
        return ExitCode::StartupFailure;
    }
    ExitCode::Success
}

/// Crawl and store ownership for the configured hosts.
async fn run_load(cache: &OwnershipCache, config: &ValidatedConfig, use_colors: bool) -> ExitCode {
    info!(
        "Loading owners (host: {}, organization: {})",
        config.host.as_deref().unwrap_or("all"),
        config.organization.as_deref().unwrap_or("all")
    );

    let result = cache
        .load_repository_owners(config.host.as_deref(), config.organization.as_deref())
        .await;

    let mut stdout = io::stdout().lock();
    let written = if config.json_output {
        LoadJson::from_result(&result).write(&mut stdout)
    } else {
        let mut output = HumanOutput::new(&mut stdout, use_colors);
        match &result {
            Ok(()) => output.write_summary(true, "Ownership records loaded"),
            Err(ManagerError::Aggregate(errors)) => output.write_failures(errors).and_then(|_| {
                output.write_summary(false, &format!("Load finished with {} failure(s)", errors.len()))
            }),
            Err(e) => output.write_error(&e.to_string()),
        }
    };

    if let Err(e) = written {
        error!("Failed to write output: {}", e);
        return ExitCode::StartupFailure;
    }
    config.exit_code_for(&result)
}
