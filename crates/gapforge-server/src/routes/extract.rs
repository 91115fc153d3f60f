//! Text → knowledge graph.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use gapforge_core::{CancelFlag, ExtractionConfig, GraphDocument};
use serde::Deserialize;
use tracing::info;

use super::blocking;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/extract", post(extract))
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub text: String,
    /// Per-request override of the server's extraction settings.
    #[serde(default)]
    pub config: Option<ExtractionConfig>,
}

/// Raises the flag when the handler future is dropped, which happens when
/// the client disconnects mid-extraction.
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// POST /api/extract
async fn extract(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ExtractRequest>,
) -> Result<Json<GraphDocument>, ApiError> {
    let extractor = match req.config {
        Some(config) => state.extractor.with_config(config)?,
        None => state.extractor.clone(),
    };

    let guard = CancelOnDrop(CancelFlag::new());
    let cancel = guard.0.clone();
    let text = req.text;
    let doc = blocking(move || extractor.extract_with_cancel(&text, &cancel)).await?;
    drop(guard);

    let meta = doc.metadata();
    info!(
        "Extracted {} entities and {} relationships",
        meta.total_entities, meta.total_relationships
    );
    Ok(Json(doc))
}
