use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopify_installer::auth::oauth::Installer;
use shopify_installer::discounts::InMemoryDiscountStore;
use shopify_installer::server::{router, AppState};
use shopify_installer::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shopify_installer=info,shopify_app_installer=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log which credentials are present, never their values
    tracing::info!(
        has_api_key = std::env::var("SHOPIFY_API_KEY").is_ok_and(|v| !v.is_empty()),
        has_api_secret = std::env::var("SHOPIFY_API_SECRET").is_ok_and(|v| !v.is_empty()),
        host_name = %std::env::var("SHOPIFY_HOST_NAME").unwrap_or_default(),
        "Environment loaded"
    );

    let config = AppConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    tracing::info!(
        scopes = %config.scopes(),
        redirect_uri = %config.redirect_uri(),
        state_mode = ?config.state_mode(),
        verify_hmac = config.verify_hmac(),
        "Configuration validated"
    );

    let state = AppState::new(
        Arc::new(Installer::new(config)),
        Arc::new(InMemoryDiscountStore::new()),
    );
    let app = router(state);

    let addr = server_config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
