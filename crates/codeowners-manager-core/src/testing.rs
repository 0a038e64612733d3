//! In-memory doubles for the hosting, secret and client-factory seams.

use crate::host_client::{
    CodeSearchHit, HostingClient, HostingClientError, HostingClientFactory, Organization, Page,
    Repository, RepositoryLookup,
};
use crate::models::Host;
use crate::secrets::{SecretClient, SecretError};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A hosting client backed by fixed organizations, repositories and files.
#[derive(Default)]
pub struct MockHostingClient {
    organizations: Vec<Organization>,
    repositories: BTreeMap<String, Vec<String>>,
    files: BTreeMap<(String, String, String), String>,
    failing_listings: HashSet<String>,
    failing_content: HashSet<(String, String, String)>,
    failing_search: bool,
    failing_org_page: Option<usize>,
    last_query: Mutex<Option<String>>,
    admin_org_calls: AtomicUsize,
    member_org_calls: AtomicUsize,
    search_calls: AtomicUsize,
    content_calls: AtomicUsize,
}

impl MockHostingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organization(mut self, login: &str, id: u64) -> Self {
        self.organizations.push(Organization {
            id,
            login: login.to_string(),
            html_url: None,
        });
        self.organizations.sort_by_key(|org| org.id);
        self
    }

    pub fn with_repositories(mut self, org: &str, names: &[&str]) -> Self {
        let repos = self.repositories.entry(org.to_string()).or_default();
        repos.extend(names.iter().map(|name| name.to_string()));
        repos.sort();
        self
    }

    pub fn with_file(mut self, org: &str, repo: &str, path: &str, contents: &str) -> Self {
        self.files.insert(
            (org.to_string(), repo.to_string(), path.to_string()),
            contents.to_string(),
        );
        self
    }

    pub fn with_failing_repository_listing(mut self, org: &str) -> Self {
        self.failing_listings.insert(org.to_string());
        self
    }

    /// Fails the `call`-th organization listing request, counting from one.
    pub fn with_failing_organization_listing(mut self, call: usize) -> Self {
        self.failing_org_page = Some(call);
        self
    }

    pub fn with_failing_content(mut self, org: &str, repo: &str, path: &str) -> Self {
        self.failing_content
            .insert((org.to_string(), repo.to_string(), path.to_string()));
        self
    }

    pub fn with_failing_search(mut self) -> Self {
        self.failing_search = true;
        self
    }

    pub fn admin_org_calls(&self) -> usize {
        self.admin_org_calls.load(Ordering::SeqCst)
    }

    pub fn member_org_calls(&self) -> usize {
        self.member_org_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().ok().and_then(|q| q.clone())
    }

    fn organization_listing_result(&self, call: usize) -> Result<(), HostingClientError> {
        if self.failing_org_page == Some(call) {
            return Err(HostingClientError::ApiError(format!(
                "cannot list organizations (call {})",
                call
            )));
        }
        Ok(())
    }

    fn matches_query(query: &str, org: &str, repo: &str, path: &str) -> bool {
        let mut scoped = false;
        let mut in_scope = false;
        for token in query.split_whitespace() {
            if let Some(filename) = token.strip_prefix("filename:") {
                if path.rsplit('/').next() != Some(filename) {
                    return false;
                }
            } else if let Some(login) = token.strip_prefix("org:") {
                scoped = true;
                in_scope |= login == org;
            } else if let Some(full_name) = token.strip_prefix("repo:") {
                scoped = true;
                in_scope |= full_name == format!("{}/{}", org, repo);
            }
        }
        !scoped || in_scope
    }
}

fn paginate<T: Clone>(items: &[T], page: u32, per_page: u8) -> Page<T> {
    let per_page = usize::from(per_page.max(1));
    let start = (page.max(1) as usize - 1) * per_page;
    let end = (start + per_page).min(items.len());
    let slice = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    let next_page = (end < items.len()).then_some(page + 1);
    Page::new(slice, next_page)
}

#[async_trait]
impl HostingClient for MockHostingClient {
    async fn get_organization(&self, org: &str) -> Result<Organization, HostingClientError> {
        self.organizations
            .iter()
            .find(|o| o.login == org)
            .cloned()
            .ok_or_else(|| HostingClientError::NotFound(format!("organization {}", org)))
    }

    async fn get_repository(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<RepositoryLookup, HostingClientError> {
        let found = self
            .repositories
            .get(org)
            .is_some_and(|repos| repos.iter().any(|r| r == repo));
        Ok(if found {
            RepositoryLookup::Found
        } else {
            RepositoryLookup::NotFound
        })
    }

    async fn list_all_organizations(
        &self,
        since: Option<u64>,
        per_page: u8,
    ) -> Result<Page<Organization>, HostingClientError> {
        let call = self.admin_org_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.organization_listing_result(call)?;
        let remaining: Vec<_> = self
            .organizations
            .iter()
            .filter(|org| since.is_none_or(|id| org.id > id))
            .cloned()
            .collect();
        Ok(paginate(&remaining, 1, per_page))
    }

    async fn list_member_organizations(
        &self,
        page: u32,
        per_page: u8,
    ) -> Result<Page<Organization>, HostingClientError> {
        let call = self.member_org_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.organization_listing_result(call)?;
        Ok(paginate(&self.organizations, page, per_page))
    }

    async fn list_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<Repository>, HostingClientError> {
        if self.failing_listings.contains(org) {
            return Err(HostingClientError::ApiError(format!(
                "cannot list repositories of {}",
                org
            )));
        }
        let repos: Vec<_> = self
            .repositories
            .get(org)
            .map(|names| {
                names
                    .iter()
                    .map(|name| Repository {
                        name: name.clone(),
                        html_url: None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(paginate(&repos, page, per_page))
    }

    async fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<CodeSearchHit>, HostingClientError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = Some(query.to_string());
        }
        if self.failing_search {
            return Err(HostingClientError::ApiError("search unavailable".to_string()));
        }
        let hits: Vec<_> = self
            .files
            .keys()
            .filter(|(org, repo, path)| Self::matches_query(query, org, repo, path))
            .map(|(_, repo, path)| CodeSearchHit {
                repository: repo.clone(),
                path: path.clone(),
            })
            .collect();
        Ok(paginate(&hits, page, per_page))
    }

    async fn get_file_content(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, HostingClientError> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        let key = (org.to_string(), repo.to_string(), path.to_string());
        if self.failing_content.contains(&key) {
            return Err(HostingClientError::NetworkError("connection reset".to_string()));
        }
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| HostingClientError::NotFound(format!("{}/{}:{}", org, repo, path)))
    }
}

/// Hands out the same client for every host and counts connections.
pub struct MockClientFactory {
    client: Arc<dyn HostingClient>,
    failing_hosts: HashSet<String>,
    connections: AtomicUsize,
}

impl MockClientFactory {
    pub fn new(client: Arc<dyn HostingClient>) -> Self {
        Self {
            client,
            failing_hosts: HashSet::new(),
            connections: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_host(mut self, host_id: &str) -> Self {
        self.failing_hosts.insert(host_id.to_string());
        self
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl HostingClientFactory for MockClientFactory {
    fn connect(
        &self,
        host: &Host,
        _secret: &SecretString,
    ) -> Result<Arc<dyn HostingClient>, HostingClientError> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        if self.failing_hosts.contains(&host.id) {
            return Err(HostingClientError::AuthError(format!(
                "bad credentials for {}",
                host.id
            )));
        }
        Ok(self.client.clone())
    }
}

/// Secrets held in a map.
#[derive(Default)]
pub struct MockSecretClient {
    secrets: HashMap<String, String>,
}

impl MockSecretClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: &str, value: &str) -> Self {
        self.secrets.insert(name.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl SecretClient for MockSecretClient {
    async fn get_secret(&self, name: &str) -> Result<SecretString, SecretError> {
        self.secrets
            .get(name)
            .map(|value| SecretString::from(value.clone()))
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}
