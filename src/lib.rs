// Simtr gateway - local HTTP bridge between the desktop UI and the AI provider

pub mod api;
pub mod config;
pub mod logging;
pub mod prompts;
pub mod proxy;

use std::sync::Arc;

use anyhow::Result;

use crate::api::gemini::GeminiClient;
use crate::config::AppConfig;
use crate::proxy::ProviderRegistry;

/// Provider adapters the gateway knows how to call.
pub fn default_providers(config: &AppConfig) -> ProviderRegistry {
    ProviderRegistry::new().register("Gemini", Arc::new(GeminiClient::new(config.ai.base_url.clone())))
}

/// Load config, install logging, and serve until Ctrl-C.
pub async fn run() -> Result<()> {
    let config_path = config::default_config_path();
    let config = Arc::new(AppConfig::load_or_init(&config_path)?);

    logging::init(&config.logging)?;
    tracing::info!("Config loaded from {:?}", config_path);

    let providers = default_providers(&config);
    for name in &config.ai.supported_providers {
        if providers.get(name).is_none() {
            tracing::warn!("Provider '{}' is supported in config but has no adapter", name);
        }
    }

    tracing::info!("Starting API server...");
    let server = api::start_server(config.clone(), providers).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop();
    server.wait().await
}
