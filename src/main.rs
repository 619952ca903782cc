//! Boutique Storefront - session-backed demo storefront and admin API

use anyhow::Result;
use boutique_storefront::api::{router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = router(AppState::new());

    let port = std::env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("boutique-storefront listening on 0.0.0.0:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}
