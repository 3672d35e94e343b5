//! Axum router configuration with middleware.
//!
//! Routes:
//! - `/health`, `/api/v1/health`
//! - `/stats`, `/api/v1/stats`
//! - `/whatsapp/webhook` (GET verify, POST notifications)
//! - `/whatsapp/welcome`
//!
//! Middleware: panic recovery, CORS, tracing.

use axum::Router;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::error::panic_response;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/stats", get(handlers::stats::get_stats));

    let whatsapp_routes = Router::new()
        .route(
            "/webhook",
            get(handlers::webhook::verify_webhook).post(handlers::webhook::handle_webhook),
        )
        .route("/welcome", get(handlers::welcome::get_welcome));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/stats", get(handlers::stats::get_stats))
        .nest("/whatsapp", whatsapp_routes)
        .nest("/api/v1", api_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
