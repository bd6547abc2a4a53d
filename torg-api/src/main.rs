use std::sync::Arc;

use anyhow::Context;
use torg_api::{router, TorgRuntime};
use torg_core::config::TorgConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("TORG_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config()?;
    let addr = std::env::var("TORG_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let runtime = Arc::new(TorgRuntime::from_config(&config).context("assembling runtime")?);
    let app = router(runtime);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "torg-api listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

/// Configuration comes from the TOML file named by `TORG_CONFIG`; without
/// it every setting falls back to its default (including the in-memory
/// database).
fn load_config() -> anyhow::Result<TorgConfig> {
    match std::env::var("TORG_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            Ok(TorgConfig::from_toml(&text)?)
        }
        Err(_) => Ok(TorgConfig::default()),
    }
}
