//! ctrack-board library - curriculum structure service
//!
//! Serves a user's learning curriculum (phases → weeks → days → resources)
//! as a nested tree and applies drag-and-drop reorders, creates, renames,
//! deletes and status changes, each in a single retried transaction.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod activity;
pub mod api;
pub mod error;
pub mod kind;
pub mod reader;
pub mod reorder;
pub mod retry;
pub mod store;

pub use error::{Result, StructureError};
pub use kind::NodeKind;
pub use retry::RetryPolicy;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Conflict retry budget applied to every mutation
    pub retry: RetryPolicy,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, retry: RetryPolicy) -> Self {
        Self { db, retry }
    }
}

/// Build application router
///
/// `/health` is public; every `/api` route runs as the user resolved by
/// [`api::user_middleware`].
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    let user_scoped = Router::new()
        .route("/api/structure", get(api::get_structure))
        .route("/api/structure/reorder", put(api::reorder_node))
        .route("/api/structure/:type", post(api::create_node))
        .route(
            "/api/structure/:type/:id",
            put(api::rename_node).delete(api::delete_node),
        )
        .route("/api/resource/:id/status", post(api::set_status))
        .route("/api/activity", get(api::list_activity))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::user_middleware,
        ));

    Router::new()
        .merge(user_scoped)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
