//! Sentence-transformer context embedder on ONNX Runtime.
//!
//! Expects `model.onnx` and `tokenizer.json` in the model directory.
//! Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;

    use gapforge_core::{Error, Result};
    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::{debug, info, warn};

    use crate::cache::EmbeddingCache;
    use crate::embedder::{EmbedderBackend, EmbeddingResult};

    const MAX_SEQ_LEN: usize = 256;

    pub struct OnnxEmbedder {
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        cache: EmbeddingCache,
        dimension: usize,
        name: String,
    }

    fn unavailable(what: &str, e: impl std::fmt::Display) -> Error {
        Error::ModelUnavailable(format!("{what}: {e}"))
    }

    impl OnnxEmbedder {
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");
            for path in [&model_path, &tokenizer_path] {
                if !path.exists() {
                    return Err(Error::ModelUnavailable(format!(
                        "missing {}",
                        path.display()
                    )));
                }
            }

            // ORT_DYLIB_PATH must point at libonnxruntime under load-dynamic.
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| unavailable("session builder", e))?
                .with_intra_threads(2)
                .map_err(|e| unavailable("thread config", e))?
                .commit_from_file(&model_path)
                .map_err(|e| unavailable("model load", e))?;
            let tokenizer =
                Tokenizer::from_file(&tokenizer_path).map_err(|e| unavailable("tokenizer", e))?;

            let mut embedder = Self {
                session: Mutex::new(session),
                tokenizer,
                cache: EmbeddingCache::default_cache(),
                dimension: 0,
                name: String::new(),
            };
            let probe = embedder
                .infer("probe")
                .ok_or_else(|| Error::ModelUnavailable("probe inference failed".into()))?;
            embedder.dimension = probe.len();
            embedder.name = format!(
                "onnx:{}",
                model_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "model".into())
            );
            info!(
                "ONNX embedder loaded: dim={}, model={}",
                embedder.dimension,
                model_path.display()
            );
            Ok(embedder)
        }

        fn infer(&self, text: &str) -> Option<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| warn!("Tokenization failed: {}", e))
                .ok()?;
            let seq_len = encoding.get_ids().len().min(MAX_SEQ_LEN);
            let mask = &encoding.get_attention_mask()[..seq_len];

            let as_i64 = |values: &[u32]| -> Vec<i64> { values.iter().map(|&v| v as i64).collect() };
            let tensor = |data: Vec<i64>| {
                Tensor::from_array(([1usize, seq_len], data))
                    .map_err(|e| warn!("Failed to build input tensor: {}", e))
                    .ok()
            };
            let ids = tensor(as_i64(&encoding.get_ids()[..seq_len]))?;
            let attention = tensor(as_i64(mask))?;
            let type_ids = tensor(vec![0; seq_len])?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids, attention, type_ids])
                .map_err(|e| warn!("ONNX inference failed: {}", e))
                .ok()?;
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| warn!("Failed to read output tensor: {}", e))
                .ok()?;
            let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

            let mut pooled = match dims.as_slice() {
                [1, tokens, dim] => mean_pool(data, mask, (*tokens).min(seq_len), *dim)?,
                [1, dim] => Array1::from_vec(data[..*dim].to_vec()),
                other => {
                    debug!("Unexpected output shape {:?}", other);
                    return None;
                }
            };
            let norm = pooled.dot(&pooled).sqrt();
            if norm > 0.0 {
                pooled /= norm;
            }
            Some(pooled)
        }
    }

    /// Attention-masked mean over token embeddings laid out `[tokens][dim]`.
    fn mean_pool(data: &[f32], mask: &[u32], tokens: usize, dim: usize) -> Option<Array1<f32>> {
        let mut pooled = Array1::<f32>::zeros(dim);
        let mut weight = 0.0f32;
        for (t, &m) in mask.iter().take(tokens).enumerate() {
            if m == 0 {
                continue;
            }
            let row = &data[t * dim..(t + 1) * dim];
            pooled
                .iter_mut()
                .zip(row)
                .for_each(|(acc, v)| *acc += *v);
            weight += 1.0;
        }
        (weight > 0.0).then(|| pooled / weight)
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn name(&self) -> &str {
            &self.name
        }

        fn embed(&self, text: &str) -> Option<EmbeddingResult> {
            if let Some(embedding) = self.cache.get(text) {
                return Some(EmbeddingResult {
                    embedding,
                    cached: true,
                });
            }
            let embedding = self.infer(text)?;
            self.cache.put(text.to_string(), embedding.clone());
            Some(EmbeddingResult {
                embedding,
                cached: false,
            })
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn is_available(&self) -> bool {
            true
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
