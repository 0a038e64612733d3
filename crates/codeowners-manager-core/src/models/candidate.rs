//! Ownership files discovered during a crawl.

/// A CODEOWNERS file found on the host.
///
/// Lives only for one crawl pass and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub organization: String,
    pub repository: String,
    /// Path of the file inside the repository.
    pub path: String,
    /// Raw text, once fetched. `None` if the fetch failed or has not happened.
    pub contents: Option<String>,
}

impl CandidateFile {
    /// Creates an unfetched candidate.
    pub fn new(
        organization: impl Into<String>,
        repository: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            repository: repository.into(),
            path: path.into(),
            contents: None,
        }
    }

    /// Sets the fetched contents.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Returns the fetched text, or an empty string if nothing was fetched.
    pub fn text(&self) -> &str {
        self.contents.as_deref().unwrap_or("")
    }
}
