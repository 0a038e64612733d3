//! Parent-grouped parsing of CODEOWNERS files.
//!
//! Parsing runs in three phases:
//! 1. [`collect_groups`] walks the file once, opening a bucket for the current
//!    parent on every line and appending each rule to that bucket.
//! 2. [`OwnerGroups::apply_default_owners`] gives every empty bucket a
//!    catch-all `*` rule.
//! 3. [`OwnerGroups::into_owners`] flattens the buckets.

use super::lexer::{LineKind, classify_line};
use crate::models::{RepositoryOwner, RepositoryRef};
use log::{debug, trace};

/// The rules declared under one parent owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentGroup {
    /// Parent owner name; empty for top-level rules.
    pub parent: String,
    /// Rules in file order.
    pub owners: Vec<RepositoryOwner>,
}

/// Parent groups in the order they were first encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerGroups {
    groups: Vec<ParentGroup>,
}

impl OwnerGroups {
    /// Creates an empty set of groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for `parent`, creating it if it doesn't exist yet.
    pub fn ensure_group(&mut self, parent: &str) -> &mut ParentGroup {
        match self.groups.iter().position(|g| g.parent == parent) {
            Some(index) => &mut self.groups[index],
            None => {
                self.groups.push(ParentGroup {
                    parent: parent.to_string(),
                    owners: Vec::new(),
                });
                let last = self.groups.len() - 1;
                &mut self.groups[last]
            }
        }
    }

    /// Appends a rule to the bucket of its parent.
    pub fn push(&mut self, owner: RepositoryOwner) {
        let parent = owner.parent.clone();
        self.ensure_group(&parent).owners.push(owner);
    }

    /// Returns the bucket for `parent`, if one was opened.
    pub fn get(&self, parent: &str) -> Option<&ParentGroup> {
        self.groups.iter().find(|g| g.parent == parent)
    }

    /// Returns all buckets in encounter order.
    pub fn groups(&self) -> &[ParentGroup] {
        &self.groups
    }

    /// Returns true if no bucket was opened.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Adds a catch-all rule to every bucket that ended up with no rules.
    pub fn apply_default_owners(mut self, target: RepositoryRef<'_>) -> Self {
        for group in self.groups.iter_mut().filter(|g| g.owners.is_empty()) {
            trace!("Parent '{}' has no rules, adding catch-all", group.parent);
            group
                .owners
                .push(RepositoryOwner::catch_all(target, group.parent.clone()));
        }
        self
    }

    /// Flattens the buckets into one list, group by group.
    pub fn into_owners(self) -> Vec<RepositoryOwner> {
        self.groups.into_iter().flat_map(|g| g.owners).collect()
    }
}

/// Walks the file and buckets every rule under its parent owner.
///
/// No defaults are applied here, so empty buckets stay empty.
pub fn collect_groups(
    contents: &str,
    parent_marker: &str,
    target: RepositoryRef<'_>,
) -> OwnerGroups {
    let mut groups = OwnerGroups::new();
    let mut current_parent = String::new();

    for (index, line) in contents.lines().enumerate() {
        let kind = classify_line(line, parent_marker);

        if let LineKind::ParentMarker { parent } = &kind {
            trace!("Line {}: parent owner '{}'", index + 1, parent);
            current_parent = parent.to_string();
        }

        groups.ensure_group(&current_parent);

        if let LineKind::Rule(fields) = kind {
            let owners = fields.owners.iter().map(|o| o.to_string()).collect();
            groups.push(RepositoryOwner::new(
                target,
                fields.pattern,
                owners,
                current_parent.clone(),
            ));
        }
    }

    groups
}

/// Parses CODEOWNERS text into ownership rules for `target`.
///
/// Blank input yields no rules. Every parent group that was opened yields at
/// least one rule. Rules are ordered group by group, in the order groups
/// first appear.
pub fn parse_owners(
    contents: &str,
    parent_marker: &str,
    target: RepositoryRef<'_>,
) -> Vec<RepositoryOwner> {
    if contents.trim().is_empty() {
        return Vec::new();
    }

    let groups = collect_groups(contents, parent_marker, target);
    let owners = groups.apply_default_owners(target).into_owners();
    debug!(
        "Parsed {} ownership rule(s) for {}/{}",
        owners.len(),
        target.organization,
        target.repository
    );
    owners
}
