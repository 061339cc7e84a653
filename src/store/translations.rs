use super::{bounded, required, ContentBackend, StoreOptions, TranslationEntry};
use crate::cache::{CacheTag, QueryCache};
use crate::error::ContentError;
use crate::i18n::{Language, TextResolver};
use crate::retry::with_retry_if;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Admin-editable UI translations.
#[derive(Clone)]
pub struct TranslationStore {
    backend: Arc<dyn ContentBackend>,
    cache: Arc<QueryCache>,
    options: StoreOptions,
}

impl TranslationStore {
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

    /// All entries ordered by (language_code, translation_key).
    pub async fn list_translations(&self) -> Result<Arc<Vec<TranslationEntry>>, ContentError> {
        self.cache
            .get_or_load(CacheTag::Translations, || {
                with_retry_if(
                    &self.options.read_retry,
                    "List translations",
                    || {
                        bounded(
                            self.options.timeout,
                            "list translations",
                            self.backend.list_translations(),
                        )
                    },
                    ContentError::is_retryable,
                )
            })
            .await
    }

    /// Insert or update the entry for (language_code, key).
    ///
    /// All inputs are trimmed and must be non-empty; the language code must
    /// be known to the registry.
    pub async fn upsert_translation(
        &self,
        language_code: &str,
        key: &str,
        value: &str,
    ) -> Result<TranslationEntry, ContentError> {
        let language_code = required("language_code", language_code)?;
        let key = required("translation_key", key)?;
        let value = required("translation_value", value)?;
        let language = Language::from_code(language_code)?;

        let entry = bounded(
            self.options.timeout,
            "upsert translation",
            self.backend
                .upsert_translation(language.code(), key, value, Utc::now()),
        )
        .await?;

        self.cache.invalidate(CacheTag::Translations);
        info!("Upserted translation {}:{}", entry.language_code, entry.translation_key);

        Ok(entry)
    }

    /// A resolver over the current entries for `language`.
    ///
    /// A failed load degrades to an unloaded resolver so rendering can fall
    /// back to literals.
    pub async fn resolver(&self, language: Language) -> TextResolver {
        match self.list_translations().await {
            Ok(entries) => TextResolver::new(Some(entries.as_slice()), language),
            Err(e) => {
                warn!("Translations unavailable, using fallback text: {}", e);
                TextResolver::unloaded(language)
            }
        }
    }
}
