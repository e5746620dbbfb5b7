use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::JsonFileStore;
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        "Storing tasks in {}",
        config.storage.tasks_path.display()
    );
    let store = Arc::new(JsonFileStore::new(config.storage.tasks_path.clone()));

    let state = AppState::new(config, store);

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?;

    // - /: banner
    // - /health: liveness with app name/version
    // - /ready: task store readability
    let app = router
        .merge(api::banner_router())
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting {} v{}", state.config.app.name, state.config.app.version);

    create_app(app, &state.config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("TaskFlow API shutdown complete");
    Ok(())
}
