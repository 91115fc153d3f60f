//! Level 3: contextual similarity between entities not linked otherwise.

use std::collections::HashSet;
use std::time::Instant;

use gapforge_core::{CancelFlag, Edge, EdgeSource, ExtractionConfig, Result, SemanticStatus};
use gapforge_infer::{cosine_similarity, EmbedderBackend, EmbeddingResult};
use tracing::{debug, warn};

use crate::document::{AnalyzedSentence, NodeDraft};

use super::{pair_key, PairKey};

#[derive(Debug)]
pub struct SemanticOutcome {
    pub edges: Vec<Edge>,
    pub status: SemanticStatus,
}

impl SemanticOutcome {
    fn skipped(status: SemanticStatus) -> Self {
        Self {
            edges: Vec::new(),
            status,
        }
    }
}

/// Embedding context of a node: words around its first mention, clipped to
/// the sentence. Falls back to the label when the sentence has no other words.
pub fn context_text(draft: &NodeDraft, sentences: &[AnalyzedSentence], window: usize) -> String {
    let sentence = &sentences[draft.first.sentence];
    let mention = &sentence.mentions[draft.first.mention];
    let words = sentence.context_words(mention, window);
    if words.is_empty() {
        draft.label.clone()
    } else {
        words.join(" ")
    }
}

/// Link unlinked pairs whose context similarity exceeds the threshold.
///
/// Never fails the request except on cancellation: an unavailable backend,
/// a timeout or a failed embedding only set the returned status.
pub fn extract(
    sentences: &[AnalyzedSentence],
    drafts: &[NodeDraft],
    linked: &HashSet<PairKey>,
    embedder: Option<&dyn EmbedderBackend>,
    config: &ExtractionConfig,
    cancel: &CancelFlag,
) -> Result<SemanticOutcome> {
    if !config.embedding_enabled {
        return Ok(SemanticOutcome::skipped(SemanticStatus::Disabled));
    }
    let Some(embedder) = embedder.filter(|e| e.is_available()) else {
        debug!("No embedding backend available; skipping semantic relations");
        return Ok(SemanticOutcome::skipped(SemanticStatus::Unavailable));
    };

    let candidates = &drafts[..drafts.len().min(config.max_semantic_entities)];
    let timeout = config.embedding_timeout();
    let started = Instant::now();

    let mut embeddings: Vec<EmbeddingResult> = Vec::with_capacity(candidates.len());
    for draft in candidates {
        cancel.check()?;
        let context = context_text(draft, sentences, config.context_window);
        match embedder.embed(&context) {
            Some(result) => embeddings.push(result),
            None => {
                warn!("Embedding failed for '{}'; skipping semantic relations", draft.label);
                return Ok(SemanticOutcome::skipped(SemanticStatus::Failed));
            }
        }
        if started.elapsed() >= timeout {
            warn!(
                "Embedding exceeded {}ms; skipping semantic relations",
                config.embedding_timeout_ms
            );
            return Ok(SemanticOutcome::skipped(SemanticStatus::TimedOut));
        }
    }

    let mut edges = Vec::new();
    for (i, a) in candidates.iter().enumerate() {
        for (j, b) in candidates.iter().enumerate().skip(i + 1) {
            if linked.contains(&pair_key(a.id, b.id)) {
                continue;
            }
            let similarity = cosine_similarity(&embeddings[i].embedding, &embeddings[j].embedding);
            if similarity <= config.semantic_threshold {
                continue;
            }
            let weight = (similarity.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0;
            edges.push(Edge {
                from: a.id,
                to: b.id,
                label: "related_to".into(),
                source: EdgeSource::Semantic,
                context: format!("{} ~ {}", a.label, b.label),
                reason: format!(
                    "Context similarity {:.2} exceeds threshold {:.2} ({})",
                    similarity,
                    config.semantic_threshold,
                    embedder.name()
                ),
                weight,
            });
        }
    }

    Ok(SemanticOutcome {
        edges,
        status: SemanticStatus::Applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeTable;
    use crate::testing::analyze_with_table;
    use gapforge_core::Error;
    use gapforge_infer::NoopEmbedder;
    use ndarray::Array1;

    /// Maps every text to the same vector.
    struct ConstantEmbedder;

    impl EmbedderBackend for ConstantEmbedder {
        fn name(&self) -> &str {
            "constant"
        }

        fn embed(&self, _text: &str) -> Option<EmbeddingResult> {
            Some(EmbeddingResult {
                embedding: Array1::from_vec(vec![1.0, 0.0]),
                cached: false,
            })
        }

        fn dimension(&self) -> usize {
            2
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    struct BrokenEmbedder;

    impl EmbedderBackend for BrokenEmbedder {
        fn name(&self) -> &str {
            "broken"
        }

        fn embed(&self, _text: &str) -> Option<EmbeddingResult> {
            None
        }

        fn dimension(&self) -> usize {
            2
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn run(embedder: Option<&dyn EmbedderBackend>, config: &ExtractionConfig, linked: &HashSet<PairKey>) -> Result<SemanticOutcome> {
        let (sentences, table): (Vec<AnalyzedSentence>, NodeTable) =
            analyze_with_table("Alice visited Paris. Acme Corp hired Bob.");
        extract(&sentences, table.drafts(), linked, embedder, config, &CancelFlag::new())
    }

    #[test]
    fn test_identical_contexts_link_all_unlinked_pairs() {
        let config = ExtractionConfig::default();
        let linked: HashSet<PairKey> = [pair_key(1, 2)].into_iter().collect();
        let outcome = run(Some(&ConstantEmbedder), &config, &linked).unwrap();
        assert_eq!(outcome.status, SemanticStatus::Applied);
        // four nodes, six pairs, one already linked
        assert_eq!(outcome.edges.len(), 5);
        assert!(outcome.edges.iter().all(|e| e.from < e.to && e.weight == 1.0));
        assert!(!outcome.edges.iter().any(|e| (e.from, e.to) == (1, 2)));
    }

    #[test]
    fn test_statuses() {
        let mut config = ExtractionConfig::default();
        let none = HashSet::new();
        assert_eq!(run(None, &config, &none).unwrap().status, SemanticStatus::Unavailable);
        let noop = NoopEmbedder::new(8);
        assert_eq!(run(Some(&noop), &config, &none).unwrap().status, SemanticStatus::Unavailable);
        assert_eq!(run(Some(&BrokenEmbedder), &config, &none).unwrap().status, SemanticStatus::Failed);

        config.embedding_timeout_ms = 0;
        let timed_out = run(Some(&ConstantEmbedder), &config, &none).unwrap();
        assert_eq!(timed_out.status, SemanticStatus::TimedOut);
        assert!(timed_out.edges.is_empty());

        config.embedding_enabled = false;
        assert_eq!(run(Some(&ConstantEmbedder), &config, &none).unwrap().status, SemanticStatus::Disabled);
    }

    #[test]
    fn test_cancellation_propagates() {
        let (sentences, table) = analyze_with_table("Alice visited Paris.");
        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = extract(
            &sentences,
            table.drafts(),
            &HashSet::new(),
            Some(&ConstantEmbedder),
            &ExtractionConfig::default(),
            &cancel,
        );
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_context_excludes_mention() {
        let (sentences, table) = analyze_with_table("Alice visited Paris.");
        let alice = &table.drafts()[0];
        assert_eq!(context_text(alice, &sentences, 20), "visited Paris");
    }
}
