mod clipboard;
mod config;
mod controller;
mod engine;
mod languages;
mod notify;
mod repl;
mod routes;
mod state;
mod translation_service;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("polyglot_backend=debug,tower_http=debug")
        .init();

    // Load configuration - try multiple paths
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path);
                config = Some(cfg);
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }
    let config = config.unwrap_or_else(|| {
        warn!(
            "No config file found (tried {:?}), using defaults with no providers",
            config_paths
        );
        Config::default()
    });

    let app_state = AppState::new(config)?;

    if std::env::args().nth(1).as_deref() == Some("repl") {
        return repl::run(app_state).await;
    }

    // Build application
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(CorsLayer::permissive())
        .with_state(app_state.clone());

    // Start server
    let bind_addr = format!(
        "{}:{}",
        app_state.config.system_config.host, app_state.config.system_config.port
    );
    info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
