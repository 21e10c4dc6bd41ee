use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{get, patch, post, MethodRouter},
    Router,
};
use serde_json::{json, Value};

use crate::auth::{IdentityExtractor, TokenKeys};
use crate::database::{Companies, Jobs, QueryExecutor};
use crate::handlers::{companies, jobs};
use crate::middleware::{authenticate, ensure_admin, ensure_logged_in};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub companies: Companies,
    pub jobs: Jobs,
    pub identity: IdentityExtractor,
    executor: Arc<dyn QueryExecutor>,
}

impl AppState {
    pub fn new(executor: Arc<dyn QueryExecutor>, keys: TokenKeys) -> Self {
        Self {
            companies: Companies::new(executor.clone()),
            jobs: Jobs::new(executor.clone()),
            identity: IdentityExtractor::new(keys),
            executor,
        }
    }
}

/// All routes, with identity extraction in front of every request
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(company_routes())
        .merge(job_routes())
        .layer(from_fn_with_state(state.identity.clone(), authenticate))
        .with_state(state)
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(admin_only(post(companies::create))),
        )
        .route(
            "/companies/:handle",
            get(companies::get).merge(admin_only(
                patch(companies::update).delete(companies::remove),
            )),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).merge(admin_only(post(jobs::create))))
        .route(
            "/jobs/:id",
            get(jobs::get).merge(admin_only(patch(jobs::update).delete(jobs::remove))),
        )
}

/// Logged in, then admin; the outermost route layer runs first
fn admin_only(methods: MethodRouter<AppState>) -> MethodRouter<AppState> {
    methods
        .route_layer(from_fn(ensure_admin))
        .route_layer(from_fn(ensure_logged_in))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Jobly API",
            "version": version,
            "endpoints": {
                "companies": "/companies[/:handle] (read: public, write: admin)",
                "jobs": "/jobs[/:id] (read: public, write: admin)",
                "health": "/health (public)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.executor.fetch_all("SELECT 1 AS ok", &[]).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
