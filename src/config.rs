use crate::i18n::Language;
use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Where content is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local storage, lost on restart. For local runs without a database.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub store_timeout: Duration,

    // HTTP
    pub port: u16,
    /// Shared secret for admin routes; admin routes reject everything when unset
    pub admin_api_key: Option<String>,

    // Languages
    pub default_language: Language,
    pub supported_languages: Vec<Language>,

    // Jobs
    pub cache_refresh_cron: String,
    pub seed_homepage: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => bail!("Invalid STORE_BACKEND '{}'. Expected postgres or memory", other),
        };

        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL not set");
        }

        let supported_languages = parse_languages(
            &std::env::var("SUPPORTED_LANGUAGES").unwrap_or_else(|_| "fr,en,es,ar,de".to_string()),
        )
        .context("Invalid SUPPORTED_LANGUAGES")?;

        let default_language = Language::from_code(
            &std::env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "fr".to_string()),
        )
        .context("Invalid DEFAULT_LANGUAGE")?;
        if !supported_languages.contains(&default_language) {
            bail!(
                "DEFAULT_LANGUAGE '{}' is not listed in SUPPORTED_LANGUAGES",
                default_language
            );
        }

        Ok(Self {
            store_backend,
            database_url,
            store_timeout: Duration::from_secs(parse_or("STORE_TIMEOUT_SECS", 10)?),

            port: parse_or("PORT", 8080)?,
            admin_api_key: std::env::var("ADMIN_API_KEY").ok().filter(|v| !v.is_empty()),

            default_language,
            supported_languages,

            cache_refresh_cron: std::env::var("CACHE_REFRESH_CRON")
                .unwrap_or_else(|_| "0 */5 * * * *".to_string()),
            seed_homepage: parse_or("SEED_HOMEPAGE", true)?,
        })
    }
}

/// Parse a comma-separated list of language codes, dropping duplicates.
fn parse_languages(raw: &str) -> Result<Vec<Language>> {
    let mut languages = Vec::new();
    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let language = Language::from_code(code)?;
        if !languages.contains(&language) {
            languages.push(language);
        }
    }

    if languages.is_empty() {
        bail!("at least one language is required");
    }
    Ok(languages)
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "STORE_BACKEND",
        "DATABASE_URL",
        "STORE_TIMEOUT_SECS",
        "PORT",
        "ADMIN_API_KEY",
        "DEFAULT_LANGUAGE",
        "SUPPORTED_LANGUAGES",
        "CACHE_REFRESH_CRON",
        "SEED_HOMEPAGE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_with_database_url() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/storefront");

        let config = Config::from_env().unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.default_language, Language::FRENCH);
        assert_eq!(config.supported_languages.len(), 5);
        assert!(config.admin_api_key.is_none());
        assert!(config.seed_homepage);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_postgres_requires_database_url() {
        clear_env();
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    #[serial]
    fn test_memory_backend_needs_no_database_url() {
        clear_env();
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("ADMIN_API_KEY", "s3cret");

        let config = Config::from_env().unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.admin_api_key.as_deref(), Some("s3cret"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_default_language_must_be_supported() {
        clear_env();
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("SUPPORTED_LANGUAGES", "en,es");
        std::env::set_var("DEFAULT_LANGUAGE", "fr");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("not listed"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_reported() {
        clear_env();
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("PORT", "eighty");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
        clear_env();
    }

    #[test]
    fn test_parse_languages_dedupes_and_trims() {
        let languages = parse_languages(" en, fr ,en,,de").unwrap();
        assert_eq!(
            languages,
            vec![Language::ENGLISH, Language::FRENCH, Language::GERMAN]
        );
    }

    #[test]
    fn test_parse_languages_rejects_unknown_and_empty() {
        assert!(parse_languages("en,xx").is_err());
        assert!(parse_languages(" , ").is_err());
    }
}
