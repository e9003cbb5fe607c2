//! HTTP surface of the app.
//!
//! - `qa`: external QA check endpoints (batch size, text length check)
//! - `strings`: string metadata lookup and ad-hoc text measurement
//! - `pages`: manifest, editor panel, lifecycle events, health

mod pages;
mod qa;
mod strings;

use anyhow::Result;
use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::config::Config;
use crate::crowdin::{CrowdinApi, StringMetadataClient};
use crate::directory::{OrganizationDirectory, StaticDirectory, TokenService};
use crate::error::AppError;
use crate::lookup::StringLookup;
use crate::manifest;
use crate::measurement::{detect_measurer, TextMeasurer};
use crate::qa::{BatchQaProcessor, TracingEvents};

pub use qa::{QaRequest, QaResponse, QaValidation};

/// Shared, read-only state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub measurer: Arc<dyn TextMeasurer>,
    pub processor: Arc<BatchQaProcessor>,
    pub metadata: StringMetadataClient,
    pub lookup: Arc<StringLookup>,
}

impl AppState {
    /// System fonts and the env-configured organization.
    pub fn new(config: Config) -> Result<Self> {
        let measurer = detect_measurer(&config.font_dirs);
        let directory = Arc::new(StaticDirectory::from_config(&config));
        Self::with_components(config, measurer, directory.clone(), directory)
    }

    pub fn with_components(
        config: Config,
        measurer: Arc<dyn TextMeasurer>,
        directory: Arc<dyn OrganizationDirectory>,
        tokens: Arc<dyn TokenService>,
    ) -> Result<Self> {
        let processor = BatchQaProcessor::new(
            measurer.clone(),
            Arc::new(TracingEvents),
            config.default_font_spec(),
            config.metadata_concurrency,
        );
        let metadata = StringMetadataClient::new(&config)?;
        let api = CrowdinApi::new(&config)?;

        Ok(Self {
            measurer,
            processor: Arc::new(processor),
            metadata,
            lookup: Arc::new(StringLookup::new(directory, tokens, api)),
            config: Arc::new(config),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    with_layers(routes()).with_state(state)
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(pages::health))
        .route("/manifest.json", get(pages::manifest))
        .route(manifest::LOGO_URL, get(pages::logo))
        .route(manifest::PANEL_URL, get(pages::length_checker))
        .route(manifest::INSTALLED_URL, post(pages::installed))
        .route(manifest::UNINSTALL_URL, post(pages::uninstall))
        .route(manifest::BATCH_SIZE_URL, get(qa::batch_size))
        .route(manifest::QA_CHECK_URL, post(qa::text_length_check))
        .route("/api/strings/:id", get(strings::get_string))
        .route("/api/measure", get(strings::measure))
}

/// Request tracing, and panics rendered as the generic 500 body.
fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Handler panicked");
    AppError::Internal(anyhow::anyhow!("handler panicked")).into_response()
}

/// Value of the `Authorization` header, if it is valid UTF-8.
fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// `Query` whose rejection is an `AppError`, so bad query strings get the
/// same JSON error body as every other failure.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(ApiQuery(value))
    }
}
