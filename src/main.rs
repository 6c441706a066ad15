use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, Level};

use aideadlines::{app, AppConfig, ConferenceRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let repo = ConferenceRepository::load(&config.data_dir, config.legacy_deadline_rule)
        .with_context(|| format!("failed to load conferences from {}", config.data_dir.display()))?;
    info!(
        "{} conferences, {} deadlines, {} countries",
        repo.len(),
        repo.timeline().len(),
        repo.countries().len()
    );

    let app = app::router(Arc::new(repo));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("Server is running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
