use super::candidates::{
    CandidateIndex, discover_candidates, organization_query, repository_query,
};
use super::{CrawlReport, OwnerResolver, OwnerSink};
use crate::config::ResolverConfig;
use crate::error::ManagerError;
use crate::host_client::{HostingClient, HostingClientFactory, Organization, RepositoryLookup};
use crate::models::{Host, RepositoryOwner, RepositoryRef};
use crate::parse::parse_owners;
use crate::secrets::SecretClient;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

/// Backfills the parent of repository rules that have none.
///
/// The parent used is the first non-empty parent among the organization
/// rules, in parse order. Rules that already carry a parent are left
/// alone.
pub fn apply_organization_defaults(
    repository_owners: Vec<RepositoryOwner>,
    organization_owners: &[RepositoryOwner],
) -> Vec<RepositoryOwner> {
    let Some(parent) = organization_owners
        .iter()
        .map(|owner| owner.parent.as_str())
        .find(|parent| !parent.is_empty())
    else {
        return repository_owners;
    };

    repository_owners
        .into_iter()
        .map(|owner| {
            if owner.parent.is_empty() {
                owner.with_parent(parent)
            } else {
                owner
            }
        })
        .collect()
}

/// Applies scope precedence: repository rules when there are any, otherwise
/// organization rules.
pub fn select_owners(
    repository_owners: Vec<RepositoryOwner>,
    organization_owners: Vec<RepositoryOwner>,
) -> Vec<RepositoryOwner> {
    let repository_owners = apply_organization_defaults(repository_owners, &organization_owners);
    if repository_owners.is_empty() {
        organization_owners
    } else {
        repository_owners
    }
}

/// Resolves ownership from CODEOWNERS files discovered through code search.
pub struct CodeownersResolver {
    secrets: Arc<dyn SecretClient>,
    clients: Arc<dyn HostingClientFactory>,
    config: ResolverConfig,
}

impl CodeownersResolver {
    /// Creates a resolver with the default configuration.
    pub fn new(secrets: Arc<dyn SecretClient>, clients: Arc<dyn HostingClientFactory>) -> Self {
        Self {
            secrets,
            clients,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a repository's rules from already discovered candidates.
    pub fn resolve_with_candidates(
        &self,
        host: &Host,
        organization: &str,
        repository: &str,
        candidates: &CandidateIndex,
    ) -> Vec<RepositoryOwner> {
        let target = RepositoryRef::new(&host.name, organization, repository);
        let marker = host.parent_owner_line_pattern.as_str();

        let repository_owners = candidates
            .repository_candidate(repository)
            .map(|file| parse_owners(file.text(), marker, target))
            .unwrap_or_default();
        let organization_owners = candidates
            .organization_candidate(repository, &self.config)
            .map(|file| parse_owners(file.text(), marker, target))
            .unwrap_or_default();

        select_owners(repository_owners, organization_owners)
    }

    async fn connect(&self, host: &Host) -> Result<Arc<dyn HostingClient>, ManagerError> {
        let secret = self.secrets.get_secret(&host.client_secret_name).await?;
        Ok(self.clients.connect(host, &secret)?)
    }

    async fn discovery_query(
        &self,
        client: &dyn HostingClient,
        organization: &str,
        repository: &str,
    ) -> String {
        if !self.config.targeted_search {
            return organization_query(organization);
        }

        let org_repo = self.config.organization_repository.as_str();
        let org_repo_exists = match client.get_repository(organization, org_repo).await {
            Ok(lookup) => lookup == RepositoryLookup::Found,
            Err(e) => {
                warn!("Unable to check {}/{}: {}", organization, org_repo, e);
                false
            }
        };
        repository_query(
            organization,
            repository,
            org_repo_exists.then_some(org_repo),
        )
    }

    async fn process_all_organizations(
        &self,
        host: &Host,
        client: &dyn HostingClient,
        sink: &mut dyn OwnerSink,
        report: &mut CrawlReport,
    ) {
        let mut since = None;
        loop {
            let page = match client
                .list_all_organizations(since, self.config.per_page)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    let context = match since {
                        Some(id) => format!("listing organizations on {} after {}", host.name, id),
                        None => format!("listing organizations on {}", host.name),
                    };
                    report.errors.push(context, e);
                    break;
                }
            };

            for organization in &page.items {
                self.process_organization(host, client, organization, sink, report)
                    .await;
            }

            match (page.next_page, page.items.last()) {
                (Some(_), Some(last)) => since = Some(last.id),
                _ => break,
            }
        }
    }

    async fn process_member_organizations(
        &self,
        host: &Host,
        client: &dyn HostingClient,
        sink: &mut dyn OwnerSink,
        report: &mut CrawlReport,
    ) {
        let mut page_number = 1;
        loop {
            let page = match client
                .list_member_organizations(page_number, self.config.per_page)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    report.errors.push(
                        format!(
                            "listing organizations on {} (page {})",
                            host.name, page_number
                        ),
                        e,
                    );
                    break;
                }
            };

            for organization in &page.items {
                self.process_organization(host, client, organization, sink, report)
                    .await;
            }

            match page.next_page {
                Some(next) if next > page_number && !page.items.is_empty() => page_number = next,
                _ => break,
            }
        }
    }

    async fn process_organization(
        &self,
        host: &Host,
        client: &dyn HostingClient,
        organization: &Organization,
        sink: &mut dyn OwnerSink,
        report: &mut CrawlReport,
    ) {
        let login = organization.login.as_str();
        info!(
            "Processing organization owners: {} ({})",
            login,
            organization.html_url.as_deref().unwrap_or("-")
        );
        report.organizations += 1;

        let candidates = match discover_candidates(
            client,
            login,
            &organization_query(login),
            self.config.per_page,
        )
        .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                report.errors.push(
                    format!("unable to find CODEOWNERS for organization {}", login),
                    e,
                );
                CandidateIndex::new()
            }
        };

        let mut page_number = 1;
        loop {
            let page = match client
                .list_repositories(login, page_number, self.config.per_page)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    report.errors.push(
                        format!("listing repositories in {} (page {})", login, page_number),
                        e,
                    );
                    break;
                }
            };

            for repository in &page.items {
                info!(
                    "Processing repository owners: {}/{} ({})",
                    login,
                    repository.name,
                    repository.html_url.as_deref().unwrap_or("-")
                );
                report.repositories += 1;

                let owners = self.resolve_with_candidates(host, login, &repository.name, &candidates);
                if owners.is_empty() {
                    debug!("No owners for {}/{}", login, repository.name);
                    continue;
                }

                match sink.accept(owners).await {
                    Ok(()) => report.repositories_with_owners += 1,
                    Err(e) => report
                        .errors
                        .push(format!("repository {}/{}", login, repository.name), e),
                }
            }

            match page.next_page {
                Some(next) if next > page_number && !page.items.is_empty() => page_number = next,
                _ => break,
            }
        }
    }
}

#[async_trait]
impl OwnerResolver for CodeownersResolver {
    async fn resolve_repository_owners(
        &self,
        host: &Host,
        organization: &str,
        repository: &str,
    ) -> Result<Vec<RepositoryOwner>, ManagerError> {
        let client = self.connect(host).await?;

        if client.get_repository(organization, repository).await? == RepositoryLookup::NotFound {
            info!("Repository {}/{} not found on {}", organization, repository, host.name);
            return Ok(Vec::new());
        }

        let query = self
            .discovery_query(client.as_ref(), organization, repository)
            .await;
        let candidates =
            discover_candidates(client.as_ref(), organization, &query, self.config.per_page)
                .await?;

        Ok(self.resolve_with_candidates(host, organization, repository, &candidates))
    }

    async fn process_repository_owners(
        &self,
        host: &Host,
        organization: Option<&str>,
        sink: &mut dyn OwnerSink,
    ) -> Result<CrawlReport, ManagerError> {
        let client = self.connect(host).await?;
        let mut report = CrawlReport::new();

        match organization {
            Some(login) => match client.get_organization(login).await {
                Ok(org) => {
                    self.process_organization(host, client.as_ref(), &org, sink, &mut report)
                        .await
                }
                Err(e) => report.errors.push(format!("organization {}", login), e),
            },
            None if host.is_enterprise() => {
                self.process_all_organizations(host, client.as_ref(), sink, &mut report)
                    .await
            }
            None => {
                self.process_member_organizations(host, client.as_ref(), sink, &mut report)
                    .await
            }
        }

        info!(
            "Processed {} repositories in {} organizations on {} ({} with owners, {} failures)",
            report.repositories,
            report.organizations,
            host.name,
            report.repositories_with_owners,
            report.errors.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host_client::HostingClientError;
    use crate::models::HostType;
    use crate::testing::{MockClientFactory, MockHostingClient, MockSecretClient};

    const MARKER: &str = "## ";

    fn host() -> Host {
        Host::new("gh", "github", "gh-token").with_parent_owner_line_pattern(MARKER)
    }

    fn resolver(client: MockHostingClient) -> (CodeownersResolver, Arc<MockHostingClient>) {
        let client = Arc::new(client);
        let resolver = CodeownersResolver::new(
            Arc::new(MockSecretClient::new().with_secret("gh-token", "t0ken")),
            Arc::new(MockClientFactory::new(client.clone())),
        );
        (resolver, client)
    }

    fn rule(pattern: &str, owners: &[&str], parent: &str) -> RepositoryOwner {
        RepositoryOwner::new(
            RepositoryRef::new("github", "acme", "api"),
            pattern,
            owners.iter().map(|o| o.to_string()).collect(),
            parent,
        )
    }

    fn summary(owners: &[RepositoryOwner]) -> Vec<(String, Vec<String>, String)> {
        owners
            .iter()
            .map(|o| (o.pattern.clone(), o.owners.clone(), o.parent.clone()))
            .collect()
    }

    #[test]
    fn backfill_uses_first_non_empty_org_parent() {
        let repo = vec![rule("*", &["@a"], ""), rule("/x", &["@b"], "keep")];
        let org = vec![rule("*", &[], ""), rule("*", &[], "first"), rule("*", &[], "second")];

        let merged = apply_organization_defaults(repo, &org);
        assert_eq!(merged[0].parent, "first");
        assert_eq!(merged[1].parent, "keep");
    }

    #[test]
    fn backfill_without_org_parent_is_noop() {
        let repo = vec![rule("*", &["@a"], "")];
        let merged = apply_organization_defaults(repo.clone(), &[rule("*", &["@o"], "")]);
        assert_eq!(merged, repo);
        assert_eq!(apply_organization_defaults(repo.clone(), &[]), repo);
    }

    #[test]
    fn repository_rules_take_precedence() {
        let repo = vec![rule("*", &["@a"], "")];
        let org = vec![rule("*", &["@o"], "ORG")];
        let selected = select_owners(repo, org);
        assert_eq!(summary(&selected), vec![("*".into(), vec!["@a".into()], "ORG".into())]);
    }

    #[test]
    fn organization_rules_used_when_repository_has_none() {
        let org = vec![rule("*", &["@o"], "ORG")];
        assert_eq!(select_owners(Vec::new(), org.clone()), org);
        assert!(select_owners(Vec::new(), Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn comment_only_repository_file_shadows_organization_rules() {
        let client = MockHostingClient::new()
            .with_repositories("acme", &["api", "codeowners"])
            .with_file("acme", "api", "CODEOWNERS", "# nothing here\n")
            .with_file("acme", "codeowners", "default/CODEOWNERS", "## ORG\n* @org");
        let (resolver, _) = resolver(client);

        let owners = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap();

        assert_eq!(summary(&owners), vec![("*".into(), vec![], "ORG".into())]);
        assert_eq!(owners[0].repository, "api");
    }

    #[tokio::test]
    async fn resolves_repository_file_with_org_parent() {
        let client = MockHostingClient::new()
            .with_repositories("acme", &["api", "codeowners"])
            .with_file("acme", "api", ".github/CODEOWNERS", "* @team-a\n/docs @docs")
            .with_file("acme", "codeowners", "default/CODEOWNERS", "## PLATFORM\n* @platform");
        let (resolver, _) = resolver(client);

        let owners = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap();

        assert_eq!(
            summary(&owners),
            vec![
                ("*".into(), vec!["@team-a".into()], "PLATFORM".into()),
                ("/docs".into(), vec!["@docs".into()], "PLATFORM".into()),
            ]
        );
        assert!(owners.iter().all(|o| o.host == "github" && o.repository == "api"));
    }

    #[tokio::test]
    async fn falls_back_to_organization_file() {
        let client = MockHostingClient::new()
            .with_repositories("acme", &["api", "codeowners"])
            .with_file("acme", "codeowners", "api/CODEOWNERS", "## API\n* @api-team")
            .with_file("acme", "codeowners", "default/CODEOWNERS", "* @everyone");
        let (resolver, _) = resolver(client);

        let owners = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap();

        assert_eq!(
            summary(&owners),
            vec![("*".into(), vec!["@api-team".into()], "API".into())]
        );
    }

    #[tokio::test]
    async fn missing_repository_resolves_to_empty() {
        let client = MockHostingClient::new()
            .with_repositories("acme", &["codeowners"])
            .with_file("acme", "codeowners", "default/CODEOWNERS", "* @everyone");
        let (resolver, client) = resolver(client);

        let owners = resolver
            .resolve_repository_owners(&host(), "acme", "ghost")
            .await
            .unwrap();

        assert!(owners.is_empty());
        assert_eq!(client.search_calls(), 0);
    }

    #[tokio::test]
    async fn no_files_resolves_to_empty() {
        let client = MockHostingClient::new().with_repositories("acme", &["api"]);
        let (resolver, _) = resolver(client);

        let owners = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap();
        assert!(owners.is_empty());
    }

    #[tokio::test]
    async fn targeted_search_scopes_the_query() {
        let client = MockHostingClient::new()
            .with_repositories("acme", &["api", "web", "codeowners"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_file("acme", "web", "CODEOWNERS", "* @web")
            .with_file("acme", "codeowners", "default/CODEOWNERS", "## ORG\n* @org");
        let (resolver, client) = resolver(client);
        let resolver = resolver.with_config(ResolverConfig::new().with_targeted_search(true));

        let owners = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap();

        assert_eq!(
            summary(&owners),
            vec![("*".into(), vec!["@api".into()], "ORG".into())]
        );
        assert_eq!(
            client.last_query().as_deref(),
            Some("filename:CODEOWNERS repo:acme/api repo:acme/codeowners")
        );
        assert_eq!(client.content_calls(), 2);
    }

    #[tokio::test]
    async fn missing_secret_is_an_error() {
        let client = Arc::new(MockHostingClient::new());
        let resolver = CodeownersResolver::new(
            Arc::new(MockSecretClient::new()),
            Arc::new(MockClientFactory::new(client)),
        );

        let err = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Secret(_)));
    }

    #[tokio::test]
    async fn search_failure_propagates_for_single_lookup() {
        let client = MockHostingClient::new()
            .with_repositories("acme", &["api"])
            .with_failing_search();
        let (resolver, _) = resolver(client);

        let err = resolver
            .resolve_repository_owners(&host(), "acme", "api")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ManagerError::HostingClient(HostingClientError::ApiError(_))
        ));
    }

    #[tokio::test]
    async fn crawl_member_organizations() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_organization("globex", 2)
            .with_repositories("acme", &["api", "web", "codeowners"])
            .with_repositories("globex", &["site"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_file("acme", "codeowners", "web/CODEOWNERS", "* @web")
            .with_file("globex", "site", "docs/CODEOWNERS", "* @site");
        let (resolver, client) = resolver(client);
        let resolver = resolver.with_config(ResolverConfig::new().with_per_page(1));

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host(), None, &mut sink)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.organizations, 2);
        assert_eq!(report.repositories, 4);
        assert_eq!(report.repositories_with_owners, 3);
        let repos: Vec<_> = sink.iter().map(|owners| owners[0].repository.clone()).collect();
        assert_eq!(repos, vec!["api", "web", "site"]);
        assert_eq!(client.member_org_calls(), 2);
        assert_eq!(client.admin_org_calls(), 0);
    }

    #[tokio::test]
    async fn crawl_enterprise_uses_admin_listing() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_organization("globex", 7)
            .with_repositories("acme", &["api"])
            .with_repositories("globex", &["site"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_file("globex", "site", "CODEOWNERS", "* @site");
        let (resolver, client) = resolver(client);
        let resolver = resolver.with_config(ResolverConfig::new().with_per_page(1));
        let host = host().with_host_type(HostType::EnterpriseServer);

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host, None, &mut sink)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(sink.len(), 2);
        assert_eq!(client.admin_org_calls(), 2);
        assert_eq!(client.member_org_calls(), 0);
    }

    #[tokio::test]
    async fn crawl_continues_past_failing_organization() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_organization("broken", 2)
            .with_repositories("acme", &["api"])
            .with_repositories("broken", &["app"])
            .with_failing_repository_listing("broken")
            .with_file("acme", "api", "CODEOWNERS", "* @api");
        let (resolver, _) = resolver(client);

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host(), None, &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(report.errors.len(), 1);
        let failure = report.errors.iter().next().unwrap();
        assert_eq!(failure.context, "listing repositories in broken (page 1)");
    }

    #[tokio::test]
    async fn crawl_single_named_organization() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_organization("globex", 2)
            .with_repositories("acme", &["api"])
            .with_repositories("globex", &["site"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_file("globex", "site", "CODEOWNERS", "* @site");
        let (resolver, client) = resolver(client);

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host(), Some("globex"), &mut sink)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0][0].organization, "globex");
        assert_eq!(client.member_org_calls(), 0);
    }

    #[tokio::test]
    async fn crawl_unknown_named_organization_is_captured() {
        let (resolver, _) = resolver(MockHostingClient::new());

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host(), Some("nobody"), &mut sink)
            .await
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn crawl_search_failure_still_lists_repositories() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_repositories("acme", &["api"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_failing_search();
        let (resolver, _) = resolver(client);

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host(), None, &mut sink)
            .await
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(report.repositories, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(
            report.errors.iter().next().unwrap().context.contains("organization acme")
        );
    }

    #[tokio::test]
    async fn member_listing_failure_keeps_fetched_organizations() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_organization("globex", 2)
            .with_repositories("acme", &["api", "web"])
            .with_repositories("globex", &["site"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_file("acme", "web", "CODEOWNERS", "* @web")
            .with_file("globex", "site", "CODEOWNERS", "* @site")
            .with_failing_organization_listing(2);
        let (resolver, client) = resolver(client);
        let resolver = resolver.with_config(ResolverConfig::new().with_per_page(1));

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host(), None, &mut sink)
            .await
            .unwrap();

        let repos: Vec<_> = sink.iter().map(|owners| owners[0].repository.clone()).collect();
        assert_eq!(repos, vec!["api", "web"]);
        assert_eq!(report.organizations, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors.iter().next().unwrap().context,
            "listing organizations on github (page 2)"
        );
        assert_eq!(client.member_org_calls(), 2);
    }

    #[tokio::test]
    async fn admin_listing_failure_keeps_fetched_organizations() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_organization("globex", 7)
            .with_repositories("acme", &["api", "web"])
            .with_repositories("globex", &["site"])
            .with_file("acme", "api", "CODEOWNERS", "* @api")
            .with_file("acme", "web", "CODEOWNERS", "* @web")
            .with_file("globex", "site", "CODEOWNERS", "* @site")
            .with_failing_organization_listing(2);
        let (resolver, client) = resolver(client);
        let resolver = resolver.with_config(ResolverConfig::new().with_per_page(1));
        let host = host().with_host_type(HostType::EnterpriseServer);

        let mut sink: Vec<Vec<RepositoryOwner>> = Vec::new();
        let report = resolver
            .process_repository_owners(&host, None, &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.len(), 2);
        assert!(sink.iter().all(|owners| owners[0].organization == "acme"));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors.iter().next().unwrap().context,
            "listing organizations on github after 1"
        );
        assert_eq!(client.admin_org_calls(), 2);
    }

    struct RejectingSink;

    #[async_trait]
    impl OwnerSink for RejectingSink {
        async fn accept(&mut self, _owners: Vec<RepositoryOwner>) -> Result<(), ManagerError> {
            Err(ManagerError::store("disk full"))
        }
    }

    #[tokio::test]
    async fn rejected_writes_are_not_counted_as_owned() {
        let client = MockHostingClient::new()
            .with_organization("acme", 1)
            .with_repositories("acme", &["api"])
            .with_file("acme", "api", "CODEOWNERS", "* @api");
        let (resolver, _) = resolver(client);

        let report = resolver
            .process_repository_owners(&host(), None, &mut RejectingSink)
            .await
            .unwrap();

        assert_eq!(report.repositories, 1);
        assert_eq!(report.repositories_with_owners, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors.iter().next().unwrap().context, "repository acme/api");
    }
}
