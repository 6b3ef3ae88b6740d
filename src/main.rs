use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use larder_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::providers::{BackupCatalogProvider, RecipeProvider, SpoonacularProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("larder_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_handle) = Cache::new(redis_client);

    let backup: Arc<dyn RecipeProvider> = Arc::new(BackupCatalogProvider::new());
    let (provider, fallback): (Arc<dyn RecipeProvider>, Option<Arc<dyn RecipeProvider>>) =
        match config.recipe_api_key.clone() {
            Some(api_key) => {
                let spoonacular = SpoonacularProvider::new(
                    cache,
                    api_key,
                    config.recipe_api_url.clone(),
                    config.recipe_cache_ttl_secs,
                    config.search_result_count,
                    Duration::from_secs(config.http_timeout_secs),
                )?;
                let fallback = config.use_backup_catalog.then_some(backup);
                (Arc::new(spoonacular), fallback)
            }
            None => {
                tracing::warn!("RECIPE_API_KEY not set, serving the backup catalog only");
                (backup, None)
            }
        };

    tracing::info!(
        provider = provider.name(),
        backup = fallback.as_ref().map(|b| b.name()).unwrap_or("none"),
        blend_weight = config.blend_weight,
        forest_estimators = config.forest_estimators,
        "Recipe providers configured"
    );

    let state = AppState::new(provider, fallback, config.engine_settings());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
