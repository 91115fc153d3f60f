//! Gap analysis, idea generation and entity verification.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use gapforge_core::{Gap, GapReport, GraphInput, IdeaResponse, VerificationResult};
use gapforge_ideas::unconfigured;
use serde::Deserialize;

use super::blocking;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/gaps", post(find_gaps))
        .route("/ideas", post(generate_ideas))
        .route("/verify", post(verify_entity))
}

/// POST /api/gaps
async fn find_gaps(
    State(state): State<Arc<AppState>>,
    ApiJson(graph): ApiJson<GraphInput>,
) -> Result<Json<GapReport>, ApiError> {
    let discovery = state.gaps.clone();
    let report = blocking(move || discovery.discover(&graph)).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct IdeasRequest {
    pub gap: Gap,
}

/// POST /api/ideas
async fn generate_ideas(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<IdeasRequest>,
) -> Result<Json<IdeaResponse>, ApiError> {
    let client = state.chat.as_ref().ok_or_else(unconfigured)?;
    let response = state.ideas.generate(client, &req.gap).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub entity: String,
}

/// POST /api/verify
async fn verify_entity(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Result<Json<VerificationResult>, ApiError> {
    let result = state.verifier.verify(&req.entity).await?;
    Ok(Json(result))
}
