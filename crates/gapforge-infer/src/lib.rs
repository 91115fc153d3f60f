//! GapForge Infer — context embedders for the semantic relation step.
//!
//! `create_embedder` resolves the configured [`EmbedderKind`]. ONNX needs the
//! `onnx` feature and model files; when either is missing the hashing
//! embedder takes over so extraction still gets a semantic signal.

pub mod cache;
pub mod embedder;
pub mod onnx_embedder;

pub use cache::EmbeddingCache;
pub use embedder::{cosine_similarity, EmbedderBackend, EmbeddingResult, HashingEmbedder, NoopEmbedder};

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

use gapforge_core::EmbedderKind;

/// Build the embedder selected by configuration.
pub fn create_embedder(kind: EmbedderKind, model_dir: &Path, dim: usize) -> Arc<dyn EmbedderBackend> {
    match kind {
        EmbedderKind::None => {
            tracing::info!("Embedder disabled; semantic relations will be skipped");
            Arc::new(NoopEmbedder::new(dim))
        }
        EmbedderKind::Hashing => {
            tracing::info!("Using hashing embedder (dim={})", dim);
            Arc::new(HashingEmbedder::new(dim))
        }
        EmbedderKind::Onnx => {
            #[cfg(feature = "onnx")]
            {
                match OnnxEmbedder::load(model_dir) {
                    Ok(embedder) => {
                        tracing::info!("Using ONNX embedder (dim={})", embedder.dimension());
                        return Arc::new(embedder);
                    }
                    Err(e) => {
                        tracing::warn!("{}. Falling back to hashing embedder.", e);
                    }
                }
            }

            #[cfg(not(feature = "onnx"))]
            {
                let _ = model_dir;
                tracing::warn!("ONNX feature disabled. Falling back to hashing embedder.");
            }

            Arc::new(HashingEmbedder::new(dim))
        }
    }
}
