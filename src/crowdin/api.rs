use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::CrowdinError;
use crate::config::Config;
use crate::directory::Organization;

const CROWDIN_API_URL: &str = "https://api.crowdin.com/api/v2";

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    data: Value,
}

/// Minimal Crowdin REST v2 client for source strings.
#[derive(Debug, Clone)]
pub struct CrowdinApi {
    http: reqwest::Client,
    api_url: Option<String>,
}

impl CrowdinApi {
    pub fn new(config: &Config) -> Result<Self, CrowdinError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.metadata_timeout_secs))
            .build()?;
        Ok(Self::with_client(http, config.crowdin_api_url.clone()))
    }

    /// `api_url` overrides the per-organization base URL (proxies, tests).
    pub fn with_client(http: reqwest::Client, api_url: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Enterprise organizations have their own API host.
    pub fn api_base(&self, organization: &Organization) -> String {
        if let Some(url) = &self.api_url {
            return url.clone();
        }
        match organization.subdomain() {
            Some(domain) => format!("https://{}.api.crowdin.com/api/v2", domain),
            None => CROWDIN_API_URL.to_string(),
        }
    }

    /// Fetch a source string, including its custom fields.
    pub async fn get_string(
        &self,
        organization: &Organization,
        access_token: &str,
        project_id: u64,
        string_id: u64,
    ) -> Result<Value, CrowdinError> {
        let url = format!(
            "{}/projects/{}/strings/{}",
            self.api_base(organization),
            project_id,
            string_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CrowdinError::StringNotFound { string_id });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrowdinError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: DataEnvelope = response
            .json()
            .await
            .map_err(|e| CrowdinError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}
