use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::auth::JwtClaims;
use crate::crowdin::{CrowdinApi, CrowdinError};
use crate::directory::{OrganizationDirectory, TokenService};
use crate::error::AppError;

/// Server-side string metadata lookup on behalf of the calling organization.
pub struct StringLookup {
    directory: Arc<dyn OrganizationDirectory>,
    tokens: Arc<dyn TokenService>,
    api: CrowdinApi,
}

impl StringLookup {
    pub fn new(
        directory: Arc<dyn OrganizationDirectory>,
        tokens: Arc<dyn TokenService>,
        api: CrowdinApi,
    ) -> Self {
        Self {
            directory,
            tokens,
            api,
        }
    }

    /// Raw Crowdin string data, including custom fields.
    pub async fn get_string(
        &self,
        claims: &JwtClaims,
        project_id: u64,
        string_id: u64,
    ) -> Result<Value, AppError> {
        let organization = self
            .directory
            .find_organization(claims.domain.as_deref(), claims.context.organization_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Organization not found.".to_string()))?;

        let access_token = self
            .tokens
            .get_valid_token(&organization)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        debug!(
            "Fetching string {} of project {} for organization {}",
            string_id, project_id, organization.organization_id
        );

        match self
            .api
            .get_string(&organization, &access_token, project_id, string_id)
            .await
        {
            Ok(data) => Ok(data),
            Err(e @ CrowdinError::StringNotFound { .. }) => Err(AppError::BadRequest(e.to_string())),
            Err(e) => Err(AppError::Upstream(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtContext;
    use crate::directory::{Organization, StaticDirectory};
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn claims(organization_id: u64) -> JwtClaims {
        JwtClaims {
            domain: None,
            context: JwtContext {
                organization_id,
                project_id: 7,
                user_id: None,
            },
            iat: None,
            exp: None,
        }
    }

    fn lookup(api_url: &str, token: Option<&str>) -> StringLookup {
        let directory = Arc::new(StaticDirectory::new(
            Some(Organization {
                id: "org-42".to_string(),
                domain: None,
                organization_id: 42,
                base_url: "https://crowdin.com".to_string(),
            }),
            token.map(str::to_string),
        ));
        StringLookup::new(
            directory.clone(),
            directory,
            CrowdinApi::with_client(reqwest::Client::new(), Some(api_url.to_string())),
        )
    }

    #[tokio::test]
    async fn test_get_string_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/7/strings/10"))
            .and(header("Authorization", "Bearer access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": 10, "fields": {"widthpx": 30}}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let data = lookup(&mock_server.uri(), Some("access"))
            .get_string(&claims(42), 7, 10)
            .await
            .unwrap();
        assert_eq!(data["fields"]["widthpx"], 30);
    }

    #[tokio::test]
    async fn test_unknown_organization_is_not_found() {
        let err = lookup("http://localhost:1", Some("access"))
            .get_string(&claims(1), 7, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Organization not found.");
    }

    #[tokio::test]
    async fn test_token_failure_is_bad_request() {
        let err = lookup("http://localhost:1", None)
            .get_string(&claims(42), 7, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("Failed to refresh Crowdin token"));
    }

    #[tokio::test]
    async fn test_missing_string_is_bad_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/7/strings/10"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = lookup(&mock_server.uri(), Some("access"))
            .get_string(&claims(42), 7, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("String not found"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/7/strings/10"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = lookup(&mock_server.uri(), Some("access"))
            .get_string(&claims(42), 7, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
