//! HTTP route handlers.

pub mod analysis;
pub mod extract;
pub mod status;

use std::sync::Arc;

use axum::Router;
use gapforge_core::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(extract::routes())
        .merge(analysis::routes())
        .merge(status::routes())
}

/// Run CPU-bound work off the async executor.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> gapforge_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError(Error::Internal(format!("Worker task failed: {e}"))))?
        .map_err(ApiError)
}
