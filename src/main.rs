use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use watchthis::{
    config::Config,
    routes::{create_router, AppState},
    services::{catalog::HttpPageSource, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("watchthis=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let source = HttpPageSource::from_config(&config)?;
    let recommender = Recommender::from_config(&config, Arc::new(source))?;

    let state = Arc::new(AppState {
        recommender,
        max_sample_size: config.max_sample_size,
    });

    // Create the router with all routes
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, catalog = %config.catalog_base_url, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
