//! Output formatting for the CLI.
//!
//! This module provides human-readable and JSON output formatters for
//! ownership lookups and bulk loads.

use codeowners_manager_core::error::{CrawlErrors, ManagerError};
use codeowners_manager_core::models::RepositoryOwner;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// JSON output for a single-repository lookup.
#[derive(Debug, Serialize)]
pub struct OwnersJson<'a> {
    pub host: &'a str,
    pub organization: &'a str,
    pub repository: &'a str,
    pub owners: &'a [RepositoryOwner],
}

impl OwnersJson<'_> {
    /// Writes the JSON output to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// JSON output for a bulk load.
#[derive(Debug, Serialize)]
pub struct LoadJson {
    pub success: bool,
    pub failures: Vec<FailureJson>,
}

/// A single load failure in JSON format.
#[derive(Debug, Serialize)]
pub struct FailureJson {
    pub context: String,
    pub message: String,
}

impl LoadJson {
    /// Builds the output from a load outcome.
    pub fn from_result(result: &Result<(), ManagerError>) -> Self {
        let failures = match result {
            Ok(()) => Vec::new(),
            Err(ManagerError::Aggregate(errors)) => errors
                .iter()
                .map(|failure| FailureJson {
                    context: failure.context.clone(),
                    message: failure.error.to_string(),
                })
                .collect(),
            Err(e) => vec![FailureJson {
                context: "load".to_string(),
                message: e.to_string(),
            }],
        };
        Self {
            success: result.is_ok(),
            failures,
        }
    }

    /// Writes the JSON output to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Writes a section header.
    pub fn write_header(&mut self, title: &str) -> std::io::Result<()> {
        let header = format!("==> {}", title);
        if self.use_colors {
            writeln!(self.writer, "{}", header.cyan().bold())
        } else {
            writeln!(self.writer, "{}", header)
        }
    }

    /// Writes the rules of one repository, grouped by parent.
    pub fn write_owners(
        &mut self,
        organization: &str,
        repository: &str,
        owners: &[RepositoryOwner],
    ) -> std::io::Result<()> {
        self.write_header(&format!("{}/{}", organization, repository))?;

        if owners.is_empty() {
            return writeln!(self.writer, "  no owners found");
        }

        let mut parents: Vec<&str> = Vec::new();
        for owner in owners {
            if !parents.contains(&owner.parent.as_str()) {
                parents.push(&owner.parent);
            }
        }

        for parent in parents {
            if !parent.is_empty() {
                let label = format!("[{}]", parent);
                if self.use_colors {
                    writeln!(self.writer, "  {}", label.yellow().bold())?;
                } else {
                    writeln!(self.writer, "  {}", label)?;
                }
            }
            for owner in owners.iter().filter(|o| o.parent == parent) {
                let assignees = if owner.owners.is_empty() {
                    "(unowned)".to_string()
                } else {
                    owner.owners.join(" ")
                };
                writeln!(self.writer, "    {}  {}", owner.pattern, assignees)?;
            }
        }

        Ok(())
    }

    /// Writes the failures of a partial load.
    pub fn write_failures(&mut self, errors: &CrawlErrors) -> std::io::Result<()> {
        self.write_header("load failures")?;
        for failure in errors.iter() {
            if self.use_colors {
                writeln!(self.writer, "  {} {}", "[FAIL]".red().bold(), failure)?;
            } else {
                writeln!(self.writer, "  [FAIL] {}", failure)?;
            }
        }
        Ok(())
    }

    /// Writes a one-line summary.
    pub fn write_summary(&mut self, ok: bool, message: &str) -> std::io::Result<()> {
        let line = if ok {
            format!("✓ {}", message)
        } else {
            format!("✗ {}", message)
        };
        match (self.use_colors, ok) {
            (true, true) => writeln!(self.writer, "{}", line.green().bold()),
            (true, false) => writeln!(self.writer, "{}", line.red().bold()),
            _ => writeln!(self.writer, "{}", line),
        }
    }

    /// Writes a startup error.
    pub fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        if self.use_colors {
            writeln!(self.writer, "{} {}", "Error:".red().bold(), message)
        } else {
            writeln!(self.writer, "Error: {}", message)
        }
    }
}
