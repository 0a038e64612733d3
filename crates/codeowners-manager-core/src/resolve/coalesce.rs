//! Priority selection among candidate ownership files.

use crate::models::CandidateFile;

/// Repository-scoped CODEOWNERS locations, highest priority first.
pub const REPOSITORY_CODEOWNERS_PATHS: [&str; 3] =
    ["CODEOWNERS", "docs/CODEOWNERS", ".github/CODEOWNERS"];

/// Returns the first candidate that is present.
pub fn coalesce<'a, I>(candidates: I) -> Option<&'a CandidateFile>
where
    I: IntoIterator<Item = Option<&'a CandidateFile>>,
{
    candidates.into_iter().flatten().next()
}
