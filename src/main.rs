use std::net::SocketAddr;

use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::{ConfigLoader, EngineConfig};
use attendance_engine::engine::AttendanceEngine;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "attendance_engine=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = match std::env::var("ATTENDANCE_CONFIG") {
        Ok(path) => ConfigLoader::load(&path)?.into_config(),
        Err(_) => EngineConfig::default(),
    };
    tracing::info!(
        daily_threshold_hours = %config.daily_threshold_hours,
        max_page_size = config.max_page_size,
        "Engine configured"
    );

    let state = AppState::new(AttendanceEngine::new(config));
    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
