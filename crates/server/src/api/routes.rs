use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::middleware::metrics_middleware;
use super::{formats, handlers, history, queue, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let downloads_dir = state.config().queue.output_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Format compatibility
        .route("/formats", get(formats::resolve_formats))
        // Queue
        .route("/queue", post(queue::enqueue_jobs))
        .route("/queue", get(queue::list_jobs))
        .route("/queue", delete(queue::clear_queue))
        .route("/queue/{id}", delete(queue::remove_job))
        .route("/queue/run", post(queue::run_queue))
        // History
        .route("/history", get(history::list_history))
        .route("/history", delete(history::clear_history))
        // Real-time updates
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .nest_service("/downloads", ServeDir::new(downloads_dir))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
