use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{authorization, ApiQuery, AppState};
use crate::auth::{decode_jwt, extract_credential};
use crate::error::{AppError, ErrorMessage};
use crate::qa::{BatchContext, Translation, Verdict};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaTranslation {
    pub id: u64,
    pub text: Option<String>,
    pub string_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// External QA check payload sent by Crowdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaRequest {
    pub translations: Vec<QaTranslation>,
    #[serde(default)]
    pub target_language: Option<LanguageRef>,
    #[serde(default)]
    pub source_language: Option<LanguageRef>,
    pub project: ProjectRef,
    #[serde(default)]
    pub file: Option<FileRef>,
}

impl QaRequest {
    /// Crowdin wraps the payload in `data`; the bare form is accepted too.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload = match serde_json::from_slice::<Value>(body)? {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };
        serde_json::from_value(payload)
    }

    pub fn context(&self) -> BatchContext {
        BatchContext {
            project_id: self.project.id,
            project_name: self
                .project
                .name
                .clone()
                .unwrap_or_else(|| self.project.id.to_string()),
            target_language: self.target_language.as_ref().map(|l| l.id.clone()),
            source_language: self.source_language.as_ref().map(|l| l.id.clone()),
            file_name: self.file.as_ref().and_then(|f| f.name.clone()),
        }
    }

    pub fn batch(&self) -> Vec<Translation> {
        self.translations
            .iter()
            .map(|t| Translation {
                id: t.id,
                text: t.text.clone().unwrap_or_default(),
                string_id: t.string_id,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaValidation {
    pub translation_id: u64,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessage>,
}

impl From<Verdict> for QaValidation {
    fn from(verdict: Verdict) -> Self {
        Self {
            translation_id: verdict.translation_id,
            passed: verdict.passed,
            error: verdict.message.map(|message| ErrorMessage { message }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QaValidations {
    pub validations: Vec<QaValidation>,
}

#[derive(Debug, Serialize)]
pub struct QaResponse {
    pub data: QaValidations,
}

#[derive(Debug, Serialize)]
pub struct BatchSize {
    pub size: u32,
}

#[derive(Debug, Serialize)]
pub struct BatchSizeResponse {
    pub data: BatchSize,
}

#[derive(Debug, Deserialize)]
pub struct CredentialQuery {
    #[serde(rename = "jwtToken")]
    pub jwt_token: Option<String>,
}

/// GET /api/qa/batch-size
pub async fn batch_size(State(state): State<AppState>) -> Json<BatchSizeResponse> {
    Json(BatchSizeResponse {
        data: BatchSize {
            size: state.config.qa_batch_size,
        },
    })
}

/// POST /api/qa/text-length-check
pub async fn text_length_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<ApiQuery<CredentialQuery>, AppError>,
    body: Bytes,
) -> Result<Json<QaResponse>, AppError> {
    // Credential is checked before query or body errors are reported
    let (query_token, query_error) = match query {
        Ok(ApiQuery(query)) => (query.jwt_token, None),
        Err(e) => (None, Some(e)),
    };
    let token = extract_credential(authorization(&headers), query_token.as_deref())?;
    decode_jwt(&token, state.config.crowdin_client_secret.as_deref())?;
    if let Some(e) = query_error {
        return Err(e);
    }

    let request = QaRequest::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid QA request payload: {}", e)))?;

    let batch = request.batch();
    if batch.len() > state.config.qa_batch_size as usize {
        warn!(
            "[QA] Batch of {} exceeds advertised size {}",
            batch.len(),
            state.config.qa_batch_size
        );
    }

    let resolver = state.metadata.for_project(request.project.id, &token);
    let result = state
        .processor
        .process(&request.context(), &batch, &resolver)
        .await;

    Ok(Json(QaResponse {
        data: QaValidations {
            validations: result.into_iter().map(QaValidation::from).collect(),
        },
    }))
}
