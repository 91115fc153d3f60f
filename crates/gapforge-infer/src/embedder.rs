//! Context embedding trait and the always-available backends.
//!
//! - `OnnxEmbedder`: sentence-transformer model (requires the `onnx` feature)
//! - `HashingEmbedder`: deterministic signed feature hashing over words and bigrams
//! - `NoopEmbedder`: reports itself unavailable; the semantic step is skipped

use ndarray::Array1;
use sha2::{Digest, Sha256};

/// Result of an embedding operation.
pub struct EmbeddingResult {
    pub embedding: Array1<f32>,
    /// Whether this was served from cache.
    pub cached: bool,
}

/// Trait for embedding backends.
pub trait EmbedderBackend: Send + Sync {
    /// Short identifier recorded in extraction metadata.
    fn name(&self) -> &str;

    /// Generate an embedding for a text string.
    /// Returns None when the backend cannot embed this input.
    fn embed(&self, text: &str) -> Option<EmbeddingResult>;

    fn dimension(&self) -> usize;

    /// Check if the embedder is available (model loaded).
    fn is_available(&self) -> bool;
}

/// Placeholder embedder that always returns None.
pub struct NoopEmbedder {
    dim: usize,
}

impl NoopEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl EmbedderBackend for NoopEmbedder {
    fn name(&self) -> &str {
        "none"
    }

    fn embed(&self, _text: &str) -> Option<EmbeddingResult> {
        None
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Bag-of-words embedder. Identical input always yields the identical vector,
/// and texts sharing vocabulary land close together.
pub struct HashingEmbedder {
    dim: usize,
    name: String,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self {
            dim,
            name: format!("hashing-{dim}"),
        }
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut idx = [0u8; 8];
        idx.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(idx) % self.dim as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

impl EmbedderBackend for HashingEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed(&self, text: &str) -> Option<EmbeddingResult> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1)
            .map(|w| w.to_lowercase())
            .collect();

        let mut vector = Array1::<f32>::zeros(self.dim);
        for word in &words {
            let (i, sign) = self.bucket(word);
            vector[i] += sign;
        }
        for pair in words.windows(2) {
            let (i, sign) = self.bucket(&format!("{} {}", pair[0], pair[1]));
            vector[i] += 0.5 * sign;
        }

        let norm = vector.dot(&vector).sqrt();
        if norm > 0.0 {
            vector /= norm;
        }
        Some(EmbeddingResult {
            embedding: vector,
            cached: false,
        })
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Cosine similarity in `[-1, 1]`; zero when either vector has no magnitude
/// or the dimensions disagree.
pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    if norm_a < 1e-12 || norm_b < 1e-12 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0) as f64
}
