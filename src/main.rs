mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;

use config::DashboardConfig;
use state::DashboardState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::default();

    // A missing or malformed launch table aborts startup.
    let dataset = data::loader::load_file(&config.data_path)?;
    if dataset.is_empty() {
        log::warn!("{} holds no launches; every chart will be empty", config.data_path.display());
    }
    let state = DashboardState::new(dataset, config.slider).shared();

    let app = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    log::info!("Dashboard listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("serving dashboard")?;

    Ok(())
}
