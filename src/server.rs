//! HTTP API over the content stores.

use crate::cache::QueryCache;
use crate::catalog::{LocalizedPackage, PackageCatalog};
use crate::config::Config;
use crate::error::ContentError;
use crate::i18n::{Language, LanguageContext, TextDirection};
use crate::security::verify_admin_key;
use crate::store::{
    ContentBackend, HomepageSection, HomepageStore, StoreOptions, TranslationEntry,
    TranslationStore,
};
use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Everything a request handler needs.
pub struct AppState {
    pub language: LanguageContext,
    pub translations: TranslationStore,
    pub homepage: HomepageStore,
    pub catalog: PackageCatalog,
    pub cache: Arc<QueryCache>,
    admin_api_key: Option<String>,
}

impl AppState {
    pub fn new(backend: Arc<dyn ContentBackend>, config: &Config) -> Result<Self, ContentError> {
        let cache = Arc::new(QueryCache::new());
        let options = StoreOptions::new(config.store_timeout);

        Ok(Self {
            language: LanguageContext::new(
                config.default_language,
                config.supported_languages.clone(),
            )?,
            translations: TranslationStore::new(backend.clone(), cache.clone(), options.clone()),
            homepage: HomepageStore::new(backend.clone(), cache.clone(), options.clone()),
            catalog: PackageCatalog::new(backend, cache.clone(), options),
            cache,
            admin_api_key: config.admin_api_key.clone(),
        })
    }

    fn require_admin(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let presented = headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if verify_admin_key(self.admin_api_key.as_deref(), presented) {
            Ok(())
        } else {
            warn!("Rejected admin request with missing or invalid key");
            Err(ApiError::Unauthorized)
        }
    }

    /// The language for a request: an explicit `lang` parameter, otherwise
    /// the shared current language.
    fn request_language(&self, lang: Option<&str>) -> Result<Language, ApiError> {
        match lang {
            Some(code) => Ok(self.language.permitted_language(code)?),
            None => Ok(self.language.get_language()),
        }
    }
}

/// Error returned from handlers.
#[derive(Debug)]
pub enum ApiError {
    Content(ContentError),
    Unauthorized,
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        Self::Content(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or invalid admin key".to_string(),
            ),
            ApiError::Content(err) => {
                let status = match &err {
                    ContentError::Validation(_) => StatusCode::BAD_REQUEST,
                    ContentError::NotFound(_) => StatusCode::NOT_FOUND,
                    ContentError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, err.kind(), err.to_string())
            }
        };

        let body = json!({
            "error": {
                "kind": kind,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/language", put(set_language))
        .route("/api/translations", get(list_translations))
        .route("/api/text", get(resolve_text))
        .route("/api/homepage", get(list_enabled_sections))
        .route("/api/packages", get(list_packages))
        .route("/api/admin/translations", put(upsert_translation))
        .route("/api/admin/homepage", get(list_all_sections))
        .route("/api/admin/homepage/:id", patch(update_section))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}

// ==================== Public Handlers ====================

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
struct LanguageInfo {
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    direction: TextDirection,
}

async fn list_languages(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let languages: Vec<_> = state
        .language
        .permitted()
        .iter()
        .map(|lang| {
            let config = lang.config();
            LanguageInfo {
                code: config.code,
                name: config.name,
                native_name: config.native_name,
                direction: config.direction,
            }
        })
        .collect();

    Json(json!({
        "current": state.language.get_language().code(),
        "languages": languages,
    }))
}

#[derive(Debug, Deserialize)]
struct SetLanguageRequest {
    code: String,
}

async fn set_language(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetLanguageRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let language = state.language.set_language(&request.code)?;
    Ok(Json(json!({ "current": language.code() })))
}

async fn list_translations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TranslationEntry>>, ApiError> {
    let entries = state.translations.list_translations().await?;
    Ok(Json(entries.as_ref().clone()))
}

#[derive(Debug, Deserialize)]
struct TextQuery {
    key: String,
    #[serde(default)]
    fallback: String,
    lang: Option<String>,
}

async fn resolve_text(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let language = state.request_language(query.lang.as_deref())?;
    let resolver = state.translations.resolver(language).await;
    let text = resolver.resolve(&query.key, &query.fallback);

    Ok(Json(json!({
        "key": query.key,
        "language": language.code(),
        "text": text,
    })))
}

async fn list_enabled_sections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HomepageSection>>, ApiError> {
    let sections = state.homepage.list_enabled_sections().await?;
    Ok(Json(sections.as_ref().clone()))
}

#[derive(Debug, Deserialize)]
struct PackagesQuery {
    category: Option<String>,
    lang: Option<String>,
}

async fn list_packages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PackagesQuery>,
) -> Result<Json<Vec<LocalizedPackage>>, ApiError> {
    let language = state.request_language(query.lang.as_deref())?;
    let packages = state
        .catalog
        .list_localized(query.category.as_deref(), language)
        .await?;
    Ok(Json(packages))
}

// ==================== Admin Handlers ====================

#[derive(Debug, Deserialize)]
struct UpsertTranslationRequest {
    #[serde(default)]
    language_code: String,
    #[serde(default)]
    translation_key: String,
    #[serde(default)]
    translation_value: String,
}

async fn upsert_translation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<UpsertTranslationRequest>,
) -> Result<Json<TranslationEntry>, ApiError> {
    state.require_admin(&headers)?;
    let entry = state
        .translations
        .upsert_translation(
            &request.language_code,
            &request.translation_key,
            &request.translation_value,
        )
        .await?;
    Ok(Json(entry))
}

async fn list_all_sections(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<HomepageSection>>, ApiError> {
    state.require_admin(&headers)?;
    let sections = state.homepage.list_all_sections().await?;
    Ok(Json(sections.as_ref().clone()))
}

#[derive(Debug, Deserialize)]
struct UpdateSectionRequest {
    content_data: serde_json::Value,
    is_enabled: Option<bool>,
}

async fn update_section(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSectionRequest>,
) -> Result<Json<HomepageSection>, ApiError> {
    state.require_admin(&headers)?;
    let section = state
        .homepage
        .update_section(id, request.content_data, request.is_enabled)
        .await?;
    Ok(Json(section))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let response = ApiError::from(ContentError::validation("key is required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["kind"], "validation");
        assert_eq!(body["error"]["message"], "validation error: key is required");
    }

    #[test]
    fn test_error_status_codes() {
        let status = |err: ApiError| err.into_response().status();
        assert_eq!(status(ContentError::not_found("x").into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status(ContentError::store("x").into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
    }
}
