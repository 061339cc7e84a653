use super::{ContentBackend, HomepageSection, Package, TranslationEntry};
use crate::error::ContentError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    translations: Vec<TranslationEntry>,
    sections: Vec<HomepageSection>,
    packages: Vec<Package>,
}

/// Process-local backend with the same semantics as the PostgreSQL one.
///
/// Used by tests and by `STORE_BACKEND=memory`. Can simulate an outage and
/// counts reads so cache behavior is observable.
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    reads: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a store error until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of list calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn insert_package(&self, package: Package) {
        self.lock().packages.push(package);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), ContentError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ContentError::store("backend unavailable"));
        }
        Ok(())
    }

    fn record_read(&self) -> Result<(), ContentError> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ContentBackend for MemoryBackend {
    async fn list_translations(&self) -> Result<Vec<TranslationEntry>, ContentError> {
        self.record_read()?;
        let mut entries = self.lock().translations.clone();
        entries.sort_by(|a, b| {
            (&a.language_code, &a.translation_key).cmp(&(&b.language_code, &b.translation_key))
        });
        Ok(entries)
    }

    async fn upsert_translation(
        &self,
        language_code: &str,
        translation_key: &str,
        translation_value: &str,
        now: DateTime<Utc>,
    ) -> Result<TranslationEntry, ContentError> {
        self.check_available()?;
        let mut tables = self.lock();

        if let Some(existing) = tables
            .translations
            .iter_mut()
            .find(|e| e.language_code == language_code && e.translation_key == translation_key)
        {
            existing.translation_value = translation_value.to_string();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let entry = TranslationEntry {
            id: Uuid::new_v4(),
            language_code: language_code.to_string(),
            translation_key: translation_key.to_string(),
            translation_value: translation_value.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.translations.push(entry.clone());
        Ok(entry)
    }

    async fn list_sections(&self, enabled_only: bool) -> Result<Vec<HomepageSection>, ContentError> {
        self.record_read()?;
        let mut sections: Vec<_> = self
            .lock()
            .sections
            .iter()
            .filter(|s| !enabled_only || s.is_enabled)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.sort_order);
        Ok(sections)
    }

    async fn update_section(
        &self,
        id: Uuid,
        content_data: &serde_json::Value,
        is_enabled: Option<bool>,
        now: DateTime<Utc>,
    ) -> Result<Option<HomepageSection>, ContentError> {
        self.check_available()?;
        let mut tables = self.lock();

        let Some(section) = tables.sections.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        section.content_data = content_data.clone();
        if let Some(enabled) = is_enabled {
            section.is_enabled = enabled;
        }
        section.updated_at = now;
        Ok(Some(section.clone()))
    }

    async fn seed_section(
        &self,
        section_key: &str,
        content_data: &serde_json::Value,
        sort_order: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ContentError> {
        self.check_available()?;
        let mut tables = self.lock();

        if tables.sections.iter().any(|s| s.section_key == section_key) {
            return Ok(false);
        }

        tables.sections.push(HomepageSection {
            id: Uuid::new_v4(),
            section_key: section_key.to_string(),
            content_data: content_data.clone(),
            is_enabled: true,
            sort_order,
            created_at: now,
            updated_at: now,
        });
        Ok(true)
    }

    async fn list_packages(&self) -> Result<Vec<Package>, ContentError> {
        self.record_read()?;
        let mut packages: Vec<_> = self
            .lock()
            .packages
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        packages.sort_by_key(|p| p.sort_order);
        Ok(packages)
    }
}
