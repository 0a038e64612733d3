//! Hosting client implementation using octocrab.
//!
//! This module provides the octocrab-based implementation of the
//! `HostingClient` trait for use in the CLI, and a factory building one
//! authenticated client per host.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use codeowners_manager_core::host_client::{
    CodeSearchHit, HostingClient, HostingClientError, HostingClientFactory, Organization, Page,
    Repository, RepositoryLookup,
};
use codeowners_manager_core::models::{AuthenticationType, Host};
use http::StatusCode;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;

/// The hosting API never returns more than this many search results.
const SEARCH_RESULT_LIMIT: u64 = 1000;

/// A wrapper around `octocrab::Octocrab` that implements `HostingClient`.
///
/// This wrapper is necessary due to Rust's orphan rules, which prevent
/// implementing external traits on external types.
pub struct OctocrabClient(pub Octocrab);

impl OctocrabClient {
    /// Creates a new OctocrabClient from an Octocrab instance.
    pub fn new(client: Octocrab) -> Self {
        Self(client)
    }

    async fn get_json<T, P>(&self, route: &str, params: Option<&P>) -> Result<T, HostingClientError>
    where
        T: serde::de::DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        self.0.get(route, params).await.map_err(map_error)
    }
}

/// Extracts the HTTP status code from an octocrab error.
fn extract_status_code(error: &octocrab::Error) -> Option<StatusCode> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

fn map_error(error: octocrab::Error) -> HostingClientError {
    let message = error.to_string();
    match extract_status_code(&error) {
        Some(StatusCode::NOT_FOUND) => HostingClientError::NotFound(message),
        Some(StatusCode::UNAUTHORIZED) => HostingClientError::AuthError(message),
        Some(StatusCode::TOO_MANY_REQUESTS) => HostingClientError::RateLimitExceeded,
        Some(StatusCode::FORBIDDEN) if message.to_lowercase().contains("rate limit") => {
            HostingClientError::RateLimitExceeded
        }
        Some(_) => HostingClientError::ApiError(message),
        None => HostingClientError::Other(message),
    }
}

/// Listings carry no total, so a full page implies there may be another.
fn next_listing_page(len: usize, page: u32, per_page: u8) -> Option<u32> {
    (len > 0 && len >= usize::from(per_page)).then_some(page + 1)
}

fn next_search_page(total_count: u64, page: u32, per_page: u8) -> Option<u32> {
    let seen = u64::from(page) * u64::from(per_page);
    (seen < total_count.min(SEARCH_RESULT_LIMIT)).then_some(page + 1)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    path: String,
    repository: SearchRepository,
}

#[derive(Debug, Deserialize)]
struct SearchRepository {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

fn decode_content(response: ContentResponse) -> Result<String, HostingClientError> {
    let content = response.content.unwrap_or_default();
    match response.encoding.as_deref() {
        Some("base64") => {
            let compact: String = content.split_whitespace().collect();
            let bytes = STANDARD
                .decode(compact)
                .map_err(|e| HostingClientError::Other(format!("invalid base64 content: {}", e)))?;
            String::from_utf8(bytes)
                .map_err(|e| HostingClientError::Other(format!("content is not UTF-8: {}", e)))
        }
        _ => Ok(content),
    }
}

#[async_trait]
impl HostingClient for OctocrabClient {
    async fn get_organization(&self, org: &str) -> Result<Organization, HostingClientError> {
        self.get_json(&format!("/orgs/{}", org), None::<&()>).await
    }

    async fn get_repository(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<RepositoryLookup, HostingClientError> {
        let route = format!("/repos/{}/{}", org, repo);
        match self.get_json::<serde_json::Value, ()>(&route, None).await {
            Ok(_) => Ok(RepositoryLookup::Found),
            Err(HostingClientError::NotFound(_)) => Ok(RepositoryLookup::NotFound),
            Err(e) => Err(e),
        }
    }

    async fn list_all_organizations(
        &self,
        since: Option<u64>,
        per_page: u8,
    ) -> Result<Page<Organization>, HostingClientError> {
        let mut params = vec![("per_page", per_page.to_string())];
        if let Some(since) = since {
            params.push(("since", since.to_string()));
        }
        let items: Vec<Organization> = self.get_json("/organizations", Some(&params)).await?;
        let next = next_listing_page(items.len(), 1, per_page);
        Ok(Page::new(items, next))
    }

    async fn list_member_organizations(
        &self,
        page: u32,
        per_page: u8,
    ) -> Result<Page<Organization>, HostingClientError> {
        let params = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let items: Vec<Organization> = self.get_json("/user/orgs", Some(&params)).await?;
        let next = next_listing_page(items.len(), page, per_page);
        Ok(Page::new(items, next))
    }

    async fn list_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<Repository>, HostingClientError> {
        let params = [
            ("sort", "full_name".to_string()),
            ("direction", "asc".to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let items: Vec<Repository> = self
            .get_json(&format!("/orgs/{}/repos", org), Some(&params))
            .await?;
        let next = next_listing_page(items.len(), page, per_page);
        Ok(Page::new(items, next))
    }

    async fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Page<CodeSearchHit>, HostingClientError> {
        let params = [
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let response: SearchResponse = self.get_json("/search/code", Some(&params)).await?;
        let next = if response.items.is_empty() {
            None
        } else {
            next_search_page(response.total_count, page, per_page)
        };
        let hits = response
            .items
            .into_iter()
            .map(|item| CodeSearchHit {
                repository: item.repository.name,
                path: item.path,
            })
            .collect();
        Ok(Page::new(hits, next).with_incomplete(response.incomplete_results))
    }

    async fn get_file_content(
        &self,
        org: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, HostingClientError> {
        let route = format!("/repos/{}/{}/contents/{}", org, repo, path);
        let response: ContentResponse = self.get_json(&route, None::<&()>).await?;
        decode_content(response)
    }
}

/// Builds octocrab clients from host settings.
#[derive(Debug, Default)]
pub struct OctocrabClientFactory;

impl OctocrabClientFactory {
    pub fn new() -> Self {
        Self
    }
}

impl HostingClientFactory for OctocrabClientFactory {
    fn connect(
        &self,
        host: &Host,
        secret: &SecretString,
    ) -> Result<Arc<dyn HostingClient>, HostingClientError> {
        let client = create_octocrab(host, secret)?;
        Ok(Arc::new(OctocrabClient::new(client)))
    }
}

/// Creates an authenticated Octocrab client for a host.
///
/// Enterprise hosts must carry a base URL. Hosted hosts use the public API
/// unless a base URL is set explicitly.
pub fn create_octocrab(host: &Host, secret: &SecretString) -> Result<Octocrab, HostingClientError> {
    let base_url = host.base_url.trim();
    if host.is_enterprise() && base_url.is_empty() {
        return Err(HostingClientError::AuthError(format!(
            "enterprise host '{}' has no base URL",
            host.id
        )));
    }

    let mut builder = Octocrab::builder();
    if !base_url.is_empty() {
        builder = builder
            .base_uri(base_url)
            .map_err(|e| HostingClientError::AuthError(format!("invalid base URL: {}", e)))?;
    }

    let token = secret.expose_secret().to_string();
    let builder = match host.authentication_type {
        AuthenticationType::Token => builder.personal_token(token),
        AuthenticationType::Oauth => builder.user_access_token(token),
    };

    builder
        .build()
        .map_err(|e| HostingClientError::AuthError(format!("failed to build client: {}", e)))
}
