mod api;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fs_broker::{Broker, ConfigStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting wencang server");
    let config_path =
        std::env::var("WENCANG_CONFIG").unwrap_or_else(|_| "wencang.toml".to_string());
    info!(path = %config_path, "loading broker config");

    let store = Arc::new(ConfigStore::load(&config_path).context("failed to load broker config")?);

    let (root, home) = store.get_root().await;
    match &root {
        Some(root) => info!(root = %root.path().display(), "root directory granted"),
        None => warn!("no root directory granted, filesystem commands will be rejected"),
    }
    if home.is_empty() {
        info!("home path not set, toLogicalPath commands will be rejected");
    }

    let allowed_senders = store.allowed_senders().await;
    if allowed_senders.is_empty() {
        warn!("allowed_senders is empty, all senders will be accepted");
    } else {
        info!(count = allowed_senders.len(), "sender allow-list loaded");
    }

    let listen_addr = store.listen_addr().await;
    let broker = Arc::new(Broker::new(store));
    let state = Arc::new(api::AppState::new(broker, allowed_senders));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(addr = %listen_addr, "server is ready");

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
