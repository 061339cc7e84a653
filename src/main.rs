use anyhow::Result;
use iptv_storefront::config::{Config, StoreBackend};
use iptv_storefront::db::Database;
use iptv_storefront::scheduler;
use iptv_storefront::server::{self, AppState};
use iptv_storefront::store::{ContentBackend, MemoryBackend};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("iptv_storefront=info".parse()?),
        )
        .init();

    info!("Starting IPTV storefront content service");

    let config = Config::from_env()?;

    let backend: Arc<dyn ContentBackend> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().unwrap_or_default();
            Arc::new(Database::new(url, config.store_timeout).await?)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; content is lost on restart");
            Arc::new(MemoryBackend::new())
        }
    };

    let state = Arc::new(AppState::new(backend, &config)?);

    if config.seed_homepage {
        let created = state.homepage.seed_defaults().await?;
        info!("Homepage seeding done ({} sections created)", created);
    }

    // Warm the caches; failures here only mean the first request loads instead.
    let (translations, sections) = futures::join!(
        state.translations.list_translations(),
        state.homepage.list_enabled_sections()
    );
    match (translations, sections) {
        (Ok(t), Ok(s)) => info!("Loaded {} translations and {} homepage sections", t.len(), s.len()),
        (Err(e), _) | (_, Err(e)) => warn!("Cache warm-up failed: {}", e),
    }

    let _scheduler =
        scheduler::start_scheduler(Arc::clone(&state.cache), &config.cache_refresh_cron).await?;

    server::serve(state, config.port).await
}
