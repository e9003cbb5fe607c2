use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::Value;
use tracing::{info, warn};

use super::AppState;
use crate::manifest::build_manifest;

const LENGTH_CHECKER_HTML: &str = include_str!("../../assets/length-checker.html");
const LOGO_SVG: &str = include_str!("../../assets/logo.svg");

pub async fn health() -> &'static str {
    "OK"
}

/// GET /manifest.json
pub async fn manifest(State(state): State<AppState>) -> Json<Value> {
    Json(build_manifest(&state.config))
}

/// GET /length-checker
pub async fn length_checker() -> Html<&'static str> {
    Html(LENGTH_CHECKER_HTML)
}

pub async fn logo() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], LOGO_SVG)
}

/// POST /events/installed
pub async fn installed(body: Bytes) -> StatusCode {
    log_lifecycle_event("installed", &body);
    StatusCode::OK
}

/// POST /events/uninstall
pub async fn uninstall(body: Bytes) -> StatusCode {
    log_lifecycle_event("uninstall", &body);
    StatusCode::OK
}

// Credentials in the payload are handled by the token service, not here
fn log_lifecycle_event(event: &str, body: &[u8]) {
    match serde_json::from_slice::<Value>(body) {
        Ok(payload) => info!(
            "App {} event for domain {} (organization {})",
            event,
            payload["domain"].as_str().unwrap_or("crowdin.com"),
            payload["organizationId"]
        ),
        Err(e) => warn!("App {} event with unreadable payload: {}", event, e),
    }
}
