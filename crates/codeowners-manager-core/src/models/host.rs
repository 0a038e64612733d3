//! Configured code hosts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The flavour of a code host, which decides how organizations are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostType {
    /// A multi-tenant hosted service; only the caller's organizations are visible.
    #[default]
    #[serde(alias = "GitHub", alias = "GitHub Cloud")]
    Hosted,
    /// A self-managed instance; every organization can be listed by an administrator.
    #[serde(alias = "GitHub Enterprise Server")]
    EnterpriseServer,
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Hosted => write!(f, "hosted"),
            HostType::EnterpriseServer => write!(f, "enterprise_server"),
        }
    }
}

/// How the stored secret authenticates against the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    /// A personal access token.
    #[default]
    #[serde(alias = "pat")]
    Token,
    /// An OAuth user access token.
    Oauth,
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationType::Token => write!(f, "token"),
            AuthenticationType::Oauth => write!(f, "oauth"),
        }
    }
}

/// A configured code-hosting endpoint.
///
/// Hosts are reference data managed out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Identifier used to look the host up.
    pub id: String,
    /// Display name stamped onto every resolved rule.
    pub name: String,
    /// API base URL, used for enterprise hosts.
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub host_type: HostType,
    #[serde(default)]
    pub authentication_type: AuthenticationType,
    /// Name of the secret holding the host credential.
    pub client_secret_name: String,
    /// Line prefix that declares a parent owner inside a CODEOWNERS file.
    #[serde(default)]
    pub parent_owner_line_pattern: String,
}

impl Host {
    /// Creates a hosted-type host with token authentication.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        client_secret_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_url: String::new(),
            host_type: HostType::default(),
            authentication_type: AuthenticationType::default(),
            client_secret_name: client_secret_name.into(),
            parent_owner_line_pattern: String::new(),
        }
    }

    /// Sets the host type.
    pub fn with_host_type(mut self, host_type: HostType) -> Self {
        self.host_type = host_type;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the parent-owner line prefix.
    pub fn with_parent_owner_line_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.parent_owner_line_pattern = pattern.into();
        self
    }

    /// Returns true if every organization on the host can be enumerated.
    pub fn is_enterprise(&self) -> bool {
        self.host_type == HostType::EnterpriseServer
    }
}
