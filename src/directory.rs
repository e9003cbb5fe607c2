//! Organization directory and token service.
//!
//! Installation storage and OAuth token refresh live outside this app. These
//! traits are the seams; `StaticDirectory` serves a single organization
//! configured through the environment.

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;

/// A Crowdin organization that installed the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub domain: Option<String>,
    pub organization_id: u64,
    pub base_url: String,
}

impl Organization {
    /// Sub-domain of an enterprise organization (`acme` for `https://acme.crowdin.com`).
    pub fn subdomain(&self) -> Option<String> {
        let url = match url::Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid baseUrl format: {} ({})", self.base_url, e);
                return None;
            }
        };
        let host = url.host_str()?;
        if !host.ends_with(".crowdin.com") {
            return None;
        }
        host.split('.').next().map(str::to_string)
    }
}

#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    async fn find_organization(
        &self,
        domain: Option<&str>,
        organization_id: u64,
    ) -> Result<Option<Organization>>;
}

#[async_trait]
pub trait TokenService: Send + Sync {
    /// A non-expired access token for the organization.
    async fn get_valid_token(&self, organization: &Organization) -> Result<String>;
}

/// One organization and access token, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    organization: Option<Organization>,
    access_token: Option<String>,
}

impl StaticDirectory {
    pub fn new(organization: Option<Organization>, access_token: Option<String>) -> Self {
        Self {
            organization,
            access_token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.organization.clone(), config.access_token.clone())
    }
}

#[async_trait]
impl OrganizationDirectory for StaticDirectory {
    async fn find_organization(
        &self,
        domain: Option<&str>,
        organization_id: u64,
    ) -> Result<Option<Organization>> {
        Ok(self
            .organization
            .as_ref()
            .filter(|org| org.organization_id == organization_id)
            .filter(|org| domain.is_none() || org.domain.as_deref() == domain)
            .cloned())
    }
}

#[async_trait]
impl TokenService for StaticDirectory {
    async fn get_valid_token(&self, organization: &Organization) -> Result<String> {
        match &self.access_token {
            Some(token) => Ok(token.clone()),
            None => bail!(
                "Failed to refresh Crowdin token for organization {}",
                organization.organization_id
            ),
        }
    }
}
