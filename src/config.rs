use anyhow::{Context, Result};

use crate::directory::Organization;
use crate::measurement::FontSpec;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub base_url: String,

    // App descriptor
    pub app_identifier: String,
    pub app_name: String,

    // Crowdin
    pub crowdin_client_id: Option<String>,
    pub crowdin_client_secret: Option<String>,
    pub crowdin_api_url: Option<String>,

    // QA check
    pub metadata_base_url: String,
    pub qa_batch_size: u32,
    pub metadata_concurrency: usize,
    pub metadata_timeout_secs: u64,

    // Measurement
    pub default_font: String,
    pub default_font_size: u32,
    pub font_dirs: Vec<String>,

    // Static organization (token storage lives outside this app)
    pub organization: Option<Organization>,
    pub access_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port: u16 = match std::env::var("PORT") {
            Ok(v) => v.parse().with_context(|| format!("Invalid PORT: {}", v))?,
            Err(_) => 8080,
        };

        let base_url = std::env::var("BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let organization = match std::env::var("CROWDIN_ORG_ID") {
            Ok(v) => {
                let organization_id: u64 = v
                    .parse()
                    .with_context(|| format!("Invalid CROWDIN_ORG_ID: {}", v))?;
                let domain = non_empty_var("CROWDIN_ORG_DOMAIN");
                let base_url = std::env::var("CROWDIN_ORG_BASE_URL").unwrap_or_else(|_| {
                    match &domain {
                        Some(d) => format!("https://{}.crowdin.com", d),
                        None => "https://crowdin.com".to_string(),
                    }
                });
                Some(Organization {
                    id: format!("org-{}", organization_id),
                    domain,
                    organization_id,
                    base_url,
                })
            }
            Err(_) => None,
        };

        Ok(Self {
            port,
            metadata_base_url: std::env::var("STRING_METADATA_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| base_url.clone()),
            base_url,

            app_identifier: std::env::var("APP_IDENTIFIER")
                .unwrap_or_else(|_| "text-width-qa".to_string()),
            app_name: std::env::var("APP_NAME").unwrap_or_else(|_| "Text Width QA".to_string()),

            crowdin_client_id: non_empty_var("CROWDIN_CLIENT_ID"),
            crowdin_client_secret: non_empty_var("CROWDIN_CLIENT_SECRET"),
            crowdin_api_url: non_empty_var("CROWDIN_API_URL")
                .map(|v| v.trim_end_matches('/').to_string()),

            qa_batch_size: std::env::var("QA_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(50),
            metadata_concurrency: std::env::var("METADATA_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4)
                .max(1),
            metadata_timeout_secs: std::env::var("METADATA_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            default_font: std::env::var("DEFAULT_FONT").unwrap_or_else(|_| "Arial".to_string()),
            default_font_size: std::env::var("DEFAULT_FONT_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(16),
            font_dirs: std::env::var("FONT_DIRS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            organization,
            access_token: non_empty_var("CROWDIN_ACCESS_TOKEN"),
        })
    }

    /// Font used when a string has no font of its own.
    pub fn default_font_spec(&self) -> FontSpec {
        FontSpec::new(self.default_font.clone(), self.default_font_size)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
