use axum::{extract::State, http::StatusCode, routing::get, Router};
use clap::Parser;
use sqlite_browser::SqlBrowserLayer;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower_http::cors::CorsLayer;
use tracing::info;

mod config;
mod database;
mod logging;

use config::Config;

#[derive(Clone)]
struct ApplicationState {
    pool: SqlitePool,
}

#[tokio::main]
async fn main() {
    let config = Config::parse();
    logging::init(&config.log_level);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to SQLite database");

    if config.seed_demo {
        database::setup(&pool)
            .await
            .expect("Failed to set up demo database");
    }

    let application_state = ApplicationState { pool: pool.clone() };

    // SqlBrowserLayer must be merged after with_state() since it returns a stateless Router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .with_state(application_state)
        .merge(SqlBrowserLayer::sqlite(config.base_path.clone(), pool).into_router())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("Failed to bind listen address");

    info!(address = %config.bind, "server running");
    info!("Health check at http://{}/api/health", config.bind);
    info!("Tables at http://{}{}/api/tables", config.bind, config.base_path);

    axum::serve(listener, app).await.expect("Server error");
}

async fn root_handler() -> &'static str {
    "sqlite-browser server"
}

async fn health_handler(
    State(state): State<ApplicationState>,
) -> Result<(StatusCode, &'static str), StatusCode> {
    sqlx::query("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok((StatusCode::OK, "Server is healthy"))
}
