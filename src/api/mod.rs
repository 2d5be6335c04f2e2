//! API layer - HTTP handlers and routing
//!
//! Routes:
//! - `GET /` greeting
//! - `/api/blogs` blog CRUD
//! - `/api/users` account creation and listing
//! - `/api/login` token issuance
//! - anything else answers 404 `{ "error": "unknown endpoint" }`

pub mod blogs;
pub mod login;
pub mod middleware;
pub mod users;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/blogs", blogs::router())
        .nest("/api/users", users::router())
        .route("/api/login", post(login::login))
        .fallback(unknown_endpoint)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::token_resolver,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Hello World!\n"
}

async fn unknown_endpoint() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "unknown endpoint" })),
    )
}
