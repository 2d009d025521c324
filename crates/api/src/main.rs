use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use shopfront_api::{app::build_app, context::ApiContext};
use shopfront_auth::{AuthGate, SecretResolver};
use shopfront_infra::{AgentSecretBackend, AppConfig, CatalogStore, FileCatalogSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = shopfront_infra::load_dotenv();
    shopfront_observability::init();

    match run(dotenv).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "shopfront-api failed");
            Err(e)
        }
    }
}

async fn run(
    dotenv: Result<Option<std::path::PathBuf>, shopfront_infra::ConfigError>,
) -> anyhow::Result<()> {
    if let Some(path) = dotenv? {
        tracing::info!(path = %path.display(), "loaded .env file");
    }

    let config = AppConfig::from_env().context("invalid configuration")?;

    // The key is resolved exactly once, before the listener exists.
    let backend = AgentSecretBackend::new(&config.secret_backend)
        .context("failed to build secret backend client")?;
    let resolved = SecretResolver::new(config.key_sources.clone())
        .resolve(&backend)
        .await
        .context("could not resolve the api key; refusing to start")?;

    let catalog = Arc::new(CatalogStore::new(FileCatalogSource::new(&config.catalog_path)));
    catalog.snapshot();

    let app = build_app(ApiContext::new(AuthGate::new(resolved.key), catalog));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
