use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{authorization, ApiQuery, AppState};
use crate::auth::{decode_jwt, extract_credential};
use crate::error::AppError;
use crate::measurement::FontSpec;

#[derive(Debug, Deserialize)]
pub struct StringQuery {
    #[serde(rename = "jwtToken")]
    pub jwt_token: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
}

/// GET /api/strings/:id
///
/// The project comes from `projectId` when given, else from the JWT context.
pub async fn get_string(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    query: Result<ApiQuery<StringQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let (query, query_error) = match query {
        Ok(ApiQuery(query)) => (Some(query), None),
        Err(e) => (None, Some(e)),
    };
    let query_token = query.as_ref().and_then(|q| q.jwt_token.as_deref());
    let token = extract_credential(authorization(&headers), query_token)?;
    if let Some(e) = query_error {
        return Err(e);
    }

    let string_id: u64 = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid string ID provided.".to_string()))?;

    let claims = decode_jwt(&token, state.config.crowdin_client_secret.as_deref())?;

    let project_id = match query
        .as_ref()
        .and_then(|q| q.project_id.as_deref())
        .map(str::trim)
    {
        Some(p) if !p.is_empty() => p
            .parse::<u64>()
            .map_err(|_| AppError::BadRequest("Invalid project ID provided.".to_string()))?,
        _ => claims.context.project_id,
    };

    let data = state.lookup.get_string(&claims, project_id, string_id).await?;
    Ok(Json(data))
}

#[derive(Debug, Deserialize)]
pub struct MeasureQuery {
    #[serde(default)]
    pub text: String,
    pub font: Option<String>,
    #[serde(rename = "fontSize")]
    pub font_size: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub width: u32,
    pub font: String,
    pub font_size: u32,
}

#[derive(Debug, Serialize)]
pub struct MeasureResponse {
    pub data: Measurement,
}

/// GET /api/measure
pub async fn measure(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MeasureQuery>,
) -> Json<MeasureResponse> {
    let defaults = state.config.default_font_spec();
    let font = FontSpec::new(
        query
            .font
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(defaults.family),
        query.font_size.filter(|s| *s > 0).unwrap_or(defaults.size),
    );
    let width = state.measurer.measure(&query.text, &font);

    Json(MeasureResponse {
        data: Measurement {
            width,
            font: font.family,
            font_size: font.size,
        },
    })
}
