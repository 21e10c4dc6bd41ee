use std::sync::Arc;

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, http::HeaderValue};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobly_api::app::{router, AppState};
use jobly_api::auth::TokenKeys;
use jobly_api::config::{self, Environment};
use jobly_api::database::{DatabaseManager, PgExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobly_api=debug,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Jobly API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("SECRET_KEY is not set; every bearer token will be treated as anonymous");
    }
    if config.environment == Environment::Production && config.security.jwt_secret == "secret-dev" {
        tracing::warn!("Production is running with the development signing secret");
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let executor = Arc::new(PgExecutor::new(pool, config.database.enable_query_logging));
    let keys = TokenKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours);

    let mut app = router(AppState::new(executor, keys))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    if config.security.enable_cors {
        let origins: Vec<HeaderValue> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        app = app.layer(CorsLayer::new().allow_origin(AllowOrigin::list(origins)));
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Jobly API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
