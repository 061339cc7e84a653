use crate::error::ContentError;
use crate::i18n::MultilingualText;
use crate::store::{ContentBackend, HomepageSection, Package, TranslationEntry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// PostgreSQL-backed content storage.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// `iptv_packages` row before the name is decoded.
#[derive(Debug, sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    name: String,
    category: String,
    price: f64,
    duration_months: i32,
    sort_order: i32,
    is_active: bool,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Package {
            id: row.id,
            name: MultilingualText::decode(&row.name),
            category: row.category,
            price: row.price,
            duration_months: row.duration_months,
            sort_order: row.sort_order,
            is_active: row.is_active,
        }
    }
}

impl Database {
    /// Connect to PostgreSQL and apply pending migrations.
    pub async fn new(database_url: &str, acquire_timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        info!("Database connected and migrations applied");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentBackend for Database {
    async fn list_translations(&self) -> Result<Vec<TranslationEntry>, ContentError> {
        let entries = sqlx::query_as::<_, TranslationEntry>(
            "SELECT id, language_code, translation_key, translation_value, created_at, updated_at
             FROM translations
             ORDER BY language_code ASC, translation_key ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn upsert_translation(
        &self,
        language_code: &str,
        translation_key: &str,
        translation_value: &str,
        now: DateTime<Utc>,
    ) -> Result<TranslationEntry, ContentError> {
        let entry = sqlx::query_as::<_, TranslationEntry>(
            "INSERT INTO translations (id, language_code, translation_key, translation_value, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             ON CONFLICT (language_code, translation_key)
             DO UPDATE SET translation_value = EXCLUDED.translation_value,
                           updated_at = EXCLUDED.updated_at
             RETURNING id, language_code, translation_key, translation_value, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(language_code)
        .bind(translation_key)
        .bind(translation_value)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list_sections(&self, enabled_only: bool) -> Result<Vec<HomepageSection>, ContentError> {
        let sections = sqlx::query_as::<_, HomepageSection>(
            "SELECT id, section_key, content_data, is_enabled, sort_order, created_at, updated_at
             FROM homepage_content
             WHERE ($1 = FALSE OR is_enabled = TRUE)
             ORDER BY sort_order ASC",
        )
        .bind(enabled_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(sections)
    }

    async fn update_section(
        &self,
        id: Uuid,
        content_data: &serde_json::Value,
        is_enabled: Option<bool>,
        now: DateTime<Utc>,
    ) -> Result<Option<HomepageSection>, ContentError> {
        // COALESCE keeps the stored flag when none is supplied.
        let section = sqlx::query_as::<_, HomepageSection>(
            "UPDATE homepage_content
             SET content_data = $2,
                 is_enabled = COALESCE($3, is_enabled),
                 updated_at = $4
             WHERE id = $1
             RETURNING id, section_key, content_data, is_enabled, sort_order, created_at, updated_at",
        )
        .bind(id)
        .bind(content_data)
        .bind(is_enabled)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(section)
    }

    async fn seed_section(
        &self,
        section_key: &str,
        content_data: &serde_json::Value,
        sort_order: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ContentError> {
        let result = sqlx::query(
            "INSERT INTO homepage_content (id, section_key, content_data, is_enabled, sort_order, created_at, updated_at)
             VALUES ($1, $2, $3, TRUE, $4, $5, $5)
             ON CONFLICT (section_key) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(section_key)
        .bind(content_data)
        .bind(sort_order)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_packages(&self) -> Result<Vec<Package>, ContentError> {
        let rows = sqlx::query_as::<_, PackageRow>(
            "SELECT id, name, category, price, duration_months, sort_order, is_active
             FROM iptv_packages
             WHERE is_active = TRUE
             ORDER BY sort_order ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Package::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Row Decoding Tests ====================

    #[test]
    fn test_package_row_decodes_language_map() {
        let row = PackageRow {
            id: Uuid::new_v4(),
            name: r#"{"en":"Movies","fr":"Films"}"#.to_string(),
            category: "vod".to_string(),
            price: 9.5,
            duration_months: 1,
            sort_order: 4,
            is_active: true,
        };

        let package = Package::from(row);
        assert_eq!(package.name.localized("fr", "en"), "Films");
        assert_eq!(package.sort_order, 4);
    }

    #[test]
    fn test_package_row_plain_name() {
        let row = PackageRow {
            id: Uuid::new_v4(),
            name: "Starter".to_string(),
            category: "subscription".to_string(),
            price: 5.0,
            duration_months: 1,
            sort_order: 0,
            is_active: true,
        };

        let package = Package::from(row);
        assert_eq!(package.name, MultilingualText::Plain("Starter".to_string()));
    }

    // ==================== PostgreSQL Tests ====================
    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn test_db() -> Database {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::new(&url, Duration::from_secs(5))
            .await
            .expect("Failed to connect");
        sqlx::query("TRUNCATE translations, homepage_content, iptv_packages")
            .execute(db.pool())
            .await
            .expect("Failed to truncate");
        db
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (set DATABASE_URL)"]
    async fn test_pg_upsert_conflicts_on_language_and_key() {
        let db = test_db().await;
        let first = db
            .upsert_translation("fr", "home.title", "Bienvenue", Utc::now())
            .await
            .unwrap();
        let second = db
            .upsert_translation("fr", "home.title", "Salut", Utc::now())
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let entries = db.list_translations().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].translation_value, "Salut");
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (set DATABASE_URL)"]
    async fn test_pg_update_section_keeps_flag_when_omitted() {
        let db = test_db().await;
        db.seed_section("hero", &json!({}), 1, Utc::now()).await.unwrap();
        let hero = db.list_sections(false).await.unwrap().remove(0);

        db.update_section(hero.id, &json!({"a": 1}), Some(false), Utc::now())
            .await
            .unwrap();
        let updated = db
            .update_section(hero.id, &json!({"a": 2}), None, Utc::now())
            .await
            .unwrap()
            .unwrap();

        assert!(!updated.is_enabled);
        assert_eq!(updated.content_data, json!({"a": 2}));
        assert!(db.list_sections(true).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (set DATABASE_URL)"]
    async fn test_pg_update_missing_section_is_none() {
        let db = test_db().await;
        let result = db
            .update_section(Uuid::new_v4(), &json!({}), None, Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
