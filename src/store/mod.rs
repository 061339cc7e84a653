//! Content stores: translations, homepage sections and packages.
//!
//! Stores talk to a [`ContentBackend`] (PostgreSQL in production, memory in
//! tests and local runs), run every backend call under a timeout, and keep
//! list results in the shared [`QueryCache`](crate::cache::QueryCache).

mod homepage;
mod memory;
mod translations;

pub use homepage::HomepageStore;
pub use memory::MemoryBackend;
pub use translations::TranslationStore;

use crate::error::ContentError;
use crate::i18n::MultilingualText;
use crate::retry::RetryConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TranslationEntry {
    pub id: Uuid,
    pub language_code: String,
    pub translation_key: String,
    pub translation_value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct HomepageSection {
    pub id: Uuid,
    pub section_key: String,
    /// Section-specific payload; never validated here.
    pub content_data: serde_json::Value,
    pub is_enabled: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog package with its name already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: Uuid,
    pub name: MultilingualText,
    pub category: String,
    pub price: f64,
    pub duration_months: i32,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Persistence operations the stores need.
///
/// Implementations do no validation or trimming; stores hand them clean input.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Every entry, ordered by (language_code, translation_key).
    async fn list_translations(&self) -> Result<Vec<TranslationEntry>, ContentError>;

    /// Insert or update the row for (language_code, translation_key).
    async fn upsert_translation(
        &self,
        language_code: &str,
        translation_key: &str,
        translation_value: &str,
        now: DateTime<Utc>,
    ) -> Result<TranslationEntry, ContentError>;

    /// Sections ordered by sort_order ascending, optionally enabled ones only.
    async fn list_sections(&self, enabled_only: bool) -> Result<Vec<HomepageSection>, ContentError>;

    /// Replace `content_data` and, when given, `is_enabled`.
    /// Returns `None` when no row has this id.
    async fn update_section(
        &self,
        id: Uuid,
        content_data: &serde_json::Value,
        is_enabled: Option<bool>,
        now: DateTime<Utc>,
    ) -> Result<Option<HomepageSection>, ContentError>;

    /// Insert a section unless one with the same key exists.
    /// Returns whether a row was inserted.
    async fn seed_section(
        &self,
        section_key: &str,
        content_data: &serde_json::Value,
        sort_order: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ContentError>;

    /// Active packages ordered by sort_order ascending.
    async fn list_packages(&self) -> Result<Vec<Package>, ContentError>;
}

/// Timeout and retry policy applied by the stores.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub timeout: Duration,
    pub read_retry: RetryConfig,
}

impl StoreOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            read_retry: RetryConfig::store_read(),
        }
    }

    pub fn with_read_retry(mut self, read_retry: RetryConfig) -> Self {
        self.read_retry = read_retry;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

/// Run a backend call, turning an elapsed timeout into a store error.
pub(crate) async fn bounded<T, Fut>(
    timeout: Duration,
    operation: &str,
    fut: Fut,
) -> Result<T, ContentError>
where
    Fut: Future<Output = Result<T, ContentError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ContentError::store(format!(
            "{} timed out after {:?}",
            operation, timeout
        ))),
    }
}

/// Trim and require a non-empty value.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContentError::validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}
