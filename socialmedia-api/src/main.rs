use std::sync::Arc;

use axum::routing::get;

use socialmedia_api::config::{AppConfig, StoreBackend};
use socialmedia_api::store::{MemoryStore, PgStore, SocialStore};
use socialmedia_api::{router, AppState};
use socialmedia_shared::clients::db::create_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    socialmedia_shared::middleware::init_tracing("socialmedia-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let store: Arc<dyn SocialStore> = match config.store {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_pool_size)?;
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store with demo data; nothing will be persisted");
            Arc::new(MemoryStore::with_demo_data())
        }
    };

    let metrics_handle = socialmedia_shared::middleware::init_metrics()?;

    let state = AppState::new(config, store);
    let app = router(state).route(
        "/metrics",
        get(move || std::future::ready(metrics_handle.render())),
    );

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "socialmedia-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
