//! OpenSASE Storefront - catalog API server

use anyhow::Result;
use opensase_storefront::api::{self, AppState};
use opensase_storefront::config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "opensase_storefront=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr();
    let state = AppState::new(config);
    state.images().ensure_dir().await?;

    let catalog = state.catalog().load().await;
    tracing::info!(
        path = %state.catalog().path().display(),
        products = catalog.products.len(),
        blogs = catalog.blogs.len(),
        "catalog loaded"
    );

    let app = api::router(state);
    tracing::info!("🚀 OpenSASE Storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
