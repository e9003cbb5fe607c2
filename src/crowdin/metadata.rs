use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::fields::parse_constraint;
use super::MetadataError;
use crate::config::Config;
use crate::measurement::FontSpec;
use crate::qa::{ConstraintResolver, StringConstraint};

/// Fetches per-string width constraints from the string metadata endpoint.
#[derive(Debug, Clone)]
pub struct StringMetadataClient {
    http: reqwest::Client,
    base_url: String,
    defaults: FontSpec,
}

impl StringMetadataClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.metadata_timeout_secs))
            .build()
            .context("Failed to build metadata HTTP client")?;

        Ok(Self::with_client(
            http,
            &config.metadata_base_url,
            FontSpec::new(config.default_font.clone(), config.default_font_size),
        ))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, defaults: FontSpec) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            defaults,
        }
    }

    /// Single attempt, no retry.
    pub async fn fetch_constraint(
        &self,
        string_id: u64,
        project_id: u64,
        auth_token: &str,
    ) -> Result<Option<StringConstraint>, MetadataError> {
        let url = format!("{}/api/strings/{}", self.base_url, string_id);
        let project_id = project_id.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[("jwtToken", auth_token), ("projectId", project_id.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MetadataError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MetadataError::Decode(e.to_string()))?;

        let constraint = parse_constraint(string_id, &body, &self.defaults);
        if constraint.is_none() {
            debug!("String {} has no width limit", string_id);
        }
        Ok(constraint)
    }

    /// Like `fetch_constraint`, but any failure is logged and read as "no constraint".
    pub async fn get_constraint(
        &self,
        string_id: u64,
        project_id: u64,
        auth_token: &str,
    ) -> Option<StringConstraint> {
        match self.fetch_constraint(string_id, project_id, auth_token).await {
            Ok(constraint) => constraint,
            Err(e) => {
                warn!("[QA] Failed to fetch string {} metadata: {}", string_id, e);
                None
            }
        }
    }

    /// Bind a project and credential for use as a batch resolver.
    pub fn for_project<'a>(&'a self, project_id: u64, auth_token: &'a str) -> ProjectStrings<'a> {
        ProjectStrings {
            client: self,
            project_id,
            auth_token,
        }
    }
}

/// Constraint resolver for all strings of one project.
pub struct ProjectStrings<'a> {
    client: &'a StringMetadataClient,
    project_id: u64,
    auth_token: &'a str,
}

#[async_trait]
impl ConstraintResolver for ProjectStrings<'_> {
    async fn resolve(&self, string_id: u64) -> Result<Option<StringConstraint>, MetadataError> {
        self.client
            .fetch_constraint(string_id, self.project_id, self.auth_token)
            .await
    }
}
