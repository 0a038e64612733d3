//! Discovery of CODEOWNERS files through code search.

use super::coalesce::{REPOSITORY_CODEOWNERS_PATHS, coalesce};
use crate::config::ResolverConfig;
use crate::host_client::{HostingClient, HostingClientError};
use crate::models::CandidateFile;
use log::{debug, info, trace, warn};
use std::collections::HashMap;

/// Discovered files, keyed by lowercased repository name and then by path.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    files: HashMap<String, HashMap<String, CandidateFile>>,
}

impl CandidateIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any earlier entry with the same repository and path.
    pub fn insert(&mut self, file: CandidateFile) {
        self.files
            .entry(file.repository.to_lowercase())
            .or_default()
            .insert(file.path.clone(), file);
    }

    /// Looks up a file. Repository names are matched case-insensitively.
    pub fn get(&self, repository: &str, path: &str) -> Option<&CandidateFile> {
        self.files
            .get(&repository.to_lowercase())
            .and_then(|paths| paths.get(path))
    }

    /// Selects the repository's own CODEOWNERS file.
    pub fn repository_candidate(&self, repository: &str) -> Option<&CandidateFile> {
        coalesce(
            REPOSITORY_CODEOWNERS_PATHS
                .iter()
                .map(|path| self.get(repository, path)),
        )
    }

    /// Selects the organization-scoped file for a repository: its own entry in
    /// the organization repository, then the shared default.
    pub fn organization_candidate(
        &self,
        repository: &str,
        config: &ResolverConfig,
    ) -> Option<&CandidateFile> {
        let org_repo = &config.organization_repository;
        let repository_path = format!("{}/CODEOWNERS", repository.to_lowercase());
        coalesce([
            self.get(org_repo, &repository_path),
            self.get(org_repo, &config.organization_default_path),
        ])
    }

    /// Returns the number of indexed files.
    pub fn len(&self) -> usize {
        self.files.values().map(HashMap::len).sum()
    }

    /// Returns true if no file was indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn files_mut(&mut self) -> impl Iterator<Item = &mut CandidateFile> {
        self.files.values_mut().flat_map(|paths| paths.values_mut())
    }
}

/// Search query covering every CODEOWNERS file in an organization.
pub fn organization_query(organization: &str) -> String {
    format!("filename:CODEOWNERS org:{}", organization)
}

/// Search query covering one repository and, when it exists, the
/// organization-wide ownership repository.
pub fn repository_query(
    organization: &str,
    repository: &str,
    organization_repository: Option<&str>,
) -> String {
    match organization_repository {
        Some(org_repo) => format!(
            "filename:CODEOWNERS repo:{}/{} repo:{}/{}",
            organization, repository, organization, org_repo
        ),
        None => format!("filename:CODEOWNERS repo:{}/{}", organization, repository),
    }
}

/// Runs `query` page by page and fetches the content of every hit.
///
/// Search failures abort discovery. A failed content fetch only leaves that
/// file's contents empty.
pub async fn discover_candidates(
    client: &dyn HostingClient,
    organization: &str,
    query: &str,
    per_page: u8,
) -> Result<CandidateIndex, HostingClientError> {
    info!("Searching host for CODEOWNERS: {}", query);
    let mut index = CandidateIndex::new();
    let mut page = 1;

    loop {
        let result = client.search_code(query, page, per_page).await?;
        if result.incomplete {
            warn!("Incomplete search results for '{}' (page {})", query, page);
        }

        for hit in result.items {
            trace!("Found {}/{}:{}", organization, hit.repository, hit.path);
            index.insert(CandidateFile::new(organization, hit.repository, hit.path));
        }

        match result.next_page {
            Some(next) if next > page => page = next,
            _ => break,
        }
    }

    fetch_contents(client, &mut index).await;
    debug!("Discovered {} CODEOWNERS file(s) for {}", index.len(), organization);
    Ok(index)
}

async fn fetch_contents(client: &dyn HostingClient, index: &mut CandidateIndex) {
    for file in index.files_mut() {
        match client
            .get_file_content(&file.organization, &file.repository, &file.path)
            .await
        {
            Ok(contents) => file.contents = Some(contents),
            Err(e) => warn!(
                "Unable to fetch {}/{}:{}: {}",
                file.organization, file.repository, file.path, e
            ),
        }
    }
}
