//! Read-only package catalog with localized names and slugs.

use crate::cache::{CacheTag, QueryCache};
use crate::error::ContentError;
use crate::i18n::{generate_slug, Language};
use crate::retry::with_retry_if;
use crate::store::{bounded, ContentBackend, Package, StoreOptions};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// A package as shown to a visitor in one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedPackage {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub price: f64,
    pub duration_months: i32,
}

impl LocalizedPackage {
    pub fn from_package(package: &Package, language: Language) -> Self {
        Self {
            id: package.id,
            name: package
                .name
                .localized(language.code(), Language::canonical().code())
                .to_string(),
            slug: generate_slug(package.name.raw(), &package.category),
            category: package.category.clone(),
            price: package.price,
            duration_months: package.duration_months,
        }
    }
}

#[derive(Clone)]
pub struct PackageCatalog {
    backend: Arc<dyn ContentBackend>,
    cache: Arc<QueryCache>,
    options: StoreOptions,
}

impl PackageCatalog {
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

    /// Active packages in display order, optionally restricted to a category.
    pub async fn list_packages(&self, category: Option<&str>) -> Result<Vec<Package>, ContentError> {
        let packages = self
            .cache
            .get_or_load(CacheTag::Packages, || {
                with_retry_if(
                    &self.options.read_retry,
                    "List packages",
                    || bounded(self.options.timeout, "list packages", self.backend.list_packages()),
                    ContentError::is_retryable,
                )
            })
            .await?;

        Ok(packages
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }

    pub async fn list_localized(
        &self,
        category: Option<&str>,
        language: Language,
    ) -> Result<Vec<LocalizedPackage>, ContentError> {
        Ok(self
            .list_packages(category)
            .await?
            .iter()
            .map(|p| LocalizedPackage::from_package(p, language))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MultilingualText;
    use crate::store::MemoryBackend;

    fn package(name: &str, category: &str, sort_order: i32, is_active: bool) -> Package {
        Package {
            id: Uuid::new_v4(),
            name: MultilingualText::decode(name),
            category: category.to_string(),
            price: 29.99,
            duration_months: 12,
            sort_order,
            is_active,
        }
    }

    fn test_catalog() -> PackageCatalog {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert_package(package(r#"{"en":"Premium Plan","fr":"Offre Premium"}"#, "subscription", 2, true));
        backend.insert_package(package("PROMAX 4K IPTV ⚡", "subscription", 1, true));
        backend.insert_package(package("Player X", "activation-player", 3, true));
        backend.insert_package(package("Legacy", "subscription", 0, false));
        PackageCatalog::new(backend, Arc::new(QueryCache::new()), StoreOptions::default())
    }

    #[tokio::test]
    async fn test_lists_active_packages_in_order() {
        let catalog = test_catalog();
        let names: Vec<_> = catalog
            .list_packages(None)
            .await
            .unwrap()
            .iter()
            .map(|p| p.name.raw().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "PROMAX 4K IPTV ⚡",
                r#"{"en":"Premium Plan","fr":"Offre Premium"}"#,
                "Player X"
            ]
        );
    }

    #[tokio::test]
    async fn test_category_filter() {
        let catalog = test_catalog();
        let packages = catalog.list_packages(Some("activation-player")).await.unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name.raw(), "Player X");
    }

    #[tokio::test]
    async fn test_localized_names_and_slugs() {
        let catalog = test_catalog();
        let localized = catalog.list_localized(None, Language::FRENCH).await.unwrap();

        assert_eq!(localized[0].name, "PROMAX 4K IPTV ⚡");
        assert_eq!(localized[0].slug, "promax-4k-iptv");
        assert_eq!(localized[1].name, "Offre Premium");
        assert_eq!(localized[1].slug, "premium-plan");
        assert_eq!(localized[2].slug, "player-x-activation");
    }

    #[tokio::test]
    async fn test_localized_falls_back_to_english_name() {
        let catalog = test_catalog();
        let localized = catalog.list_localized(None, Language::GERMAN).await.unwrap();
        assert_eq!(localized[1].name, "Premium Plan");
    }
}
