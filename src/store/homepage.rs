use super::{bounded, required, ContentBackend, HomepageSection, StoreOptions};
use crate::cache::{CacheTag, QueryCache};
use crate::error::ContentError;
use crate::retry::with_retry_if;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Homepage slots created on first start, in display order.
pub const DEFAULT_SECTION_KEYS: [&str; 6] =
    ["hero", "features", "channels", "pricing", "testimonials", "faq"];

/// Sequenced, toggleable homepage content blocks.
#[derive(Clone)]
pub struct HomepageStore {
    backend: Arc<dyn ContentBackend>,
    cache: Arc<QueryCache>,
    options: StoreOptions,
}

impl HomepageStore {
    pub fn new(
        backend: Arc<dyn ContentBackend>,
        cache: Arc<QueryCache>,
        options: StoreOptions,
    ) -> Self {
        Self {
            backend,
            cache,
            options,
        }
    }

    /// Enabled sections in display order, for rendering.
    pub async fn list_enabled_sections(&self) -> Result<Arc<Vec<HomepageSection>>, ContentError> {
        self.list(CacheTag::HomepageEnabled, true).await
    }

    /// Every section in display order, for the admin editor.
    pub async fn list_all_sections(&self) -> Result<Arc<Vec<HomepageSection>>, ContentError> {
        self.list(CacheTag::HomepageAll, false).await
    }

    async fn list(
        &self,
        tag: CacheTag,
        enabled_only: bool,
    ) -> Result<Arc<Vec<HomepageSection>>, ContentError> {
        self.cache
            .get_or_load(tag, || {
                with_retry_if(
                    &self.options.read_retry,
                    "List homepage sections",
                    || {
                        bounded(
                            self.options.timeout,
                            "list homepage sections",
                            self.backend.list_sections(enabled_only),
                        )
                    },
                    ContentError::is_retryable,
                )
            })
            .await
    }

    /// Partially update a section.
    ///
    /// `content_data` always replaces the stored payload; `is_enabled` is only
    /// written when supplied, otherwise the stored flag is kept.
    pub async fn update_section(
        &self,
        id: Uuid,
        content_data: serde_json::Value,
        is_enabled: Option<bool>,
    ) -> Result<HomepageSection, ContentError> {
        let updated = bounded(
            self.options.timeout,
            "update homepage section",
            self.backend
                .update_section(id, &content_data, is_enabled, Utc::now()),
        )
        .await?
        .ok_or_else(|| ContentError::not_found(format!("homepage section {}", id)))?;

        self.invalidate();
        info!(
            "Updated homepage section {} ({}), enabled={}",
            updated.section_key, updated.id, updated.is_enabled
        );

        Ok(updated)
    }

    /// Create a section unless its key already exists. Returns whether it
    /// was created.
    pub async fn seed_section(
        &self,
        section_key: &str,
        content_data: serde_json::Value,
        sort_order: i32,
    ) -> Result<bool, ContentError> {
        let section_key = required("section_key", section_key)?;

        let created = bounded(
            self.options.timeout,
            "seed homepage section",
            self.backend
                .seed_section(section_key, &content_data, sort_order, Utc::now()),
        )
        .await?;

        if created {
            self.invalidate();
            info!("Seeded homepage section {}", section_key);
        }

        Ok(created)
    }

    /// Seed [`DEFAULT_SECTION_KEYS`] with empty payloads. Returns how many
    /// sections were created.
    pub async fn seed_defaults(&self) -> Result<usize, ContentError> {
        let mut created = 0;
        for (position, key) in DEFAULT_SECTION_KEYS.iter().enumerate() {
            if self.seed_section(key, json!({}), position as i32 + 1).await? {
                created += 1;
            }
        }
        Ok(created)
    }

    fn invalidate(&self) {
        self.cache.invalidate(CacheTag::HomepageEnabled);
        self.cache.invalidate(CacheTag::HomepageAll);
    }
}
