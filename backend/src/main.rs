use anyhow::Context;
use backend::{api, ServerConfig, SessionService};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;

    let store = config
        .open_store()
        .await
        .with_context(|| format!("Failed to open session store {}", config.database_url))?;
    let app = api::router(SessionService::new(store));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("[API] Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
