//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Manuscripts
        .route("/manuscripts/my", get(handlers::list_my_manuscripts))
        .route("/manuscripts/create", post(handlers::create_manuscript))
        .route("/manuscripts/detail/:id", get(handlers::get_manuscript))
        .route("/manuscripts/edit", put(handlers::edit_manuscript))
        .route("/manuscripts/delete/:id", delete(handlers::delete_manuscript))
        .route("/manuscripts/submit/:id", post(handlers::submit_manuscript))
        // Publishing
        .route("/manuscripts/publish/:id", post(handlers::publish_manuscript))
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
