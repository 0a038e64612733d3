//! Line classification for CODEOWNERS files.
//!
//! This module contains nom-based parsers for the three kinds of meaningful
//! line: parent-owner declarations, comments and pattern rules.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{multispace0, multispace1},
    multi::many0,
    sequence::preceded,
};

/// Prefix that marks a comment line.
pub const COMMENT_PREFIX: char = '#';

/// The kind of a single (trimmed) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace only.
    Blank,
    /// Starts with `#` and is not a parent declaration.
    Comment,
    /// Declares the parent owner group for the lines that follow.
    ParentMarker {
        /// The first comma-separated token after the marker.
        parent: &'a str,
    },
    /// A pattern followed by zero or more owners.
    Rule(RuleFields<'a>),
}

/// The whitespace-separated fields of a rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFields<'a> {
    /// The glob pattern (first field).
    pub pattern: &'a str,
    /// Remaining fields.
    pub owners: Vec<&'a str>,
}

/// Characters that make up a field: anything but whitespace.
fn is_field_char(c: char) -> bool {
    !c.is_whitespace()
}

/// Parses a parent declaration, returning the group name.
///
/// Only the first comma-separated token after the marker is kept; the rest
/// of the line is discarded.
pub fn parse_parent_marker<'a>(input: &'a str, marker: &str) -> IResult<&'a str, &'a str> {
    preceded(tag(marker), take_till(|c: char| c == ','))
        .map(str::trim)
        .parse(input)
}

/// Splits a rule line into its pattern and owner fields.
pub fn parse_rule_fields(input: &str) -> IResult<&str, RuleFields<'_>> {
    let (rest, pattern) = preceded(multispace0, take_while1(is_field_char)).parse(input)?;
    let (rest, owners) = many0(preceded(multispace1, take_while1(is_field_char))).parse(rest)?;
    Ok((rest, RuleFields { pattern, owners }))
}

/// Classifies one line of an ownership file.
///
/// The parent marker is tested first, so a marker starting with `#` is not
/// mistaken for a comment. An empty marker never matches.
pub fn classify_line<'a>(line: &'a str, parent_marker: &str) -> LineKind<'a> {
    let trimmed = line.trim();

    if !parent_marker.is_empty() {
        if let Ok((_, parent)) = parse_parent_marker(trimmed, parent_marker) {
            return LineKind::ParentMarker { parent };
        }
    }

    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with(COMMENT_PREFIX) {
        return LineKind::Comment;
    }

    match parse_rule_fields(trimmed) {
        Ok((_, fields)) => LineKind::Rule(fields),
        // Unreachable for non-empty trimmed input.
        Err(_) => LineKind::Blank,
    }
}
