//! Archetype Engine HTTP server.

use std::sync::Arc;

use archetype_engine::adapters::ai::{OpenAIConfig, OpenAIProvider};
use archetype_engine::adapters::http::app_router;
use archetype_engine::application::resolution::SessionRegistry;
use archetype_engine::config::AppConfig;
use archetype_engine::ports::AIProvider;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let ai = &config.ai;
    let provider = OpenAIProvider::new(
        OpenAIConfig::new(ai.api_key.clone().unwrap_or_default())
            .with_base_url(&ai.base_url)
            .with_model(&ai.model)
            .with_timeout(ai.timeout()),
    )?;
    let info = provider.provider_info();
    let registry = SessionRegistry::new(Arc::new(provider), config.resolution_settings());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, provider = %info.name, model = %info.model, "archetype engine listening");

    axum::serve(listener, app_router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
