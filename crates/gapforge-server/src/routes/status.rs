use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

/// GET /api/status — engine and collaborator configuration.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let extraction = state.extractor.config();
    let llm = &state.llm_status;

    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.extractor.model_version(),
        "embedder": {
            "name": state.embedder.name(),
            "available": state.embedder.is_available(),
            "dimension": state.embedder.dimension(),
        },
        "extraction": {
            "embeddingEnabled": extraction.embedding_enabled,
            "patternCatalogue": extraction.pattern_catalogue_version,
            "semanticThreshold": extraction.semantic_threshold,
        },
        "llm": llm,
        "verifier": {
            "endpoint": state.verifier.config().endpoint,
            "acceptAbove": state.verifier.config().accept_above,
        },
    }))
}
