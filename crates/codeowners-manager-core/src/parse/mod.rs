//! Parser module for CODEOWNERS files.
//!
//! Turns raw CODEOWNERS text into [`RepositoryOwner`](crate::models::RepositoryOwner)
//! rules, grouped under the parent owner declared by the host's marker line.
//!
//! # Example
//!
//! ```rust
//! use codeowners_manager_core::models::RepositoryRef;
//! use codeowners_manager_core::parse::parse_owners;
//!
//! let input = "# root\n*.go @teamA\n## Team B\n*.md @teamB @teamC\n";
//! let owners = parse_owners(input, "## ", RepositoryRef::new("github", "acme", "api"));
//!
//! assert_eq!(owners.len(), 2);
//! assert!(owners.iter().any(|o| o.pattern == "*.md" && o.parent == "Team B"));
//! ```

mod lexer;
mod parser;

pub use lexer::{COMMENT_PREFIX, LineKind, RuleFields, classify_line, parse_parent_marker, parse_rule_fields};
pub use parser::{OwnerGroups, ParentGroup, collect_groups, parse_owners};
