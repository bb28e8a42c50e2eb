use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bookfinder::{
    api::{create_router, AppState},
    config::Config,
    services::Catalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookfinder=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let catalog = Catalog::load(&config)
        .await
        .with_context(|| format!("loading catalog from {}", config.catalog_path))?;

    let app = create_router(AppState::new(catalog));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!(address = %addr, "Search server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
