//! Text → GraphDocument orchestration.

use std::collections::HashSet;
use std::sync::Arc;

use gapforge_core::{
    Annotations, CancelFlag, Error, ExtractionConfig, GraphDocument, Result, SemanticStatus,
};
use gapforge_infer::EmbedderBackend;
use tracing::{debug, info};

use crate::document::{AnalyzedSentence, FirstMention, NodeTable};
use crate::merge::{merge_edges, score_nodes};
use crate::nlp::NlpModel;
use crate::relations::{dependency, pair_key, semantic, Catalogue, PairKey};
use crate::themes::document_themes;

/// Run the NLP model over every sentence and merge mentions into nodes.
pub fn analyze_document(
    model: &dyn NlpModel,
    text: &str,
    cancel: &CancelFlag,
) -> Result<(Vec<AnalyzedSentence>, NodeTable)> {
    let mut table = NodeTable::default();
    let mut sentences = Vec::new();

    for (index, sentence) in model.sentences(text).into_iter().enumerate() {
        cancel.check()?;
        let tokens = model.tokenize(&sentence.text);
        let mentions = model.recognize(&sentence.text, &tokens);
        let clauses = model.parse(&tokens, &mentions);
        let node_ids = mentions
            .iter()
            .enumerate()
            .map(|(mention, m)| table.observe(m, FirstMention { sentence: index, mention }))
            .collect();
        sentences.push(AnalyzedSentence {
            index,
            text: sentence.text,
            tokens,
            mentions,
            node_ids,
            clauses,
        });
    }
    Ok((sentences, table))
}

/// Fuses dependency, pattern and semantic relations into one graph.
///
/// Holds read-only handles to the shared model and embedder, so one
/// extractor serves concurrent requests.
#[derive(Clone)]
pub struct Extractor {
    model: Arc<dyn NlpModel>,
    embedder: Option<Arc<dyn EmbedderBackend>>,
    config: ExtractionConfig,
    catalogue: Catalogue,
}

impl Extractor {
    pub fn new(
        model: Arc<dyn NlpModel>,
        embedder: Option<Arc<dyn EmbedderBackend>>,
        config: ExtractionConfig,
    ) -> Result<Self> {
        config.validate()?;
        let catalogue = Catalogue::for_version(&config.pattern_catalogue_version)?;
        Ok(Self {
            model,
            embedder,
            config,
            catalogue,
        })
    }

    /// Same model and embedder with a per-request configuration.
    pub fn with_config(&self, config: ExtractionConfig) -> Result<Self> {
        Self::new(self.model.clone(), self.embedder.clone(), config)
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn model_version(&self) -> &str {
        self.model.version()
    }

    pub fn embedder_name(&self) -> Option<&str> {
        self.embedder
            .as_deref()
            .filter(|e| e.is_available())
            .map(|e| e.name())
    }

    pub fn extract(&self, text: &str) -> Result<GraphDocument> {
        self.extract_with_cancel(text, &CancelFlag::new())
    }

    /// Extract a graph, checking `cancel` before each sentence.
    pub fn extract_with_cancel(&self, text: &str, cancel: &CancelFlag) -> Result<GraphDocument> {
        if text.trim().is_empty() {
            return Err(Error::Validation("Text must not be empty".into()));
        }

        let (sentences, table) = analyze_document(self.model.as_ref(), text, cancel)?;
        info!(
            "Recognized {} entities in {} sentences",
            table.len(),
            sentences.len()
        );

        // Levels 1 and 2 share the per-sentence claimed set.
        let mut dependency_edges = Vec::new();
        let mut pattern_edges = Vec::new();
        for sentence in &sentences {
            let (edges, mut claimed) = dependency::extract(sentence, self.config.dependency_weight);
            dependency_edges.extend(edges);
            pattern_edges.extend(self.catalogue.apply(sentence, &mut claimed, self.config.pattern_weight));
        }
        info!("Level 1: {} dependency relationships", dependency_edges.len());
        info!(
            "Level 2: {} pattern relationships (catalogue {})",
            pattern_edges.len(),
            self.catalogue.version()
        );

        let linked: HashSet<PairKey> = dependency_edges
            .iter()
            .chain(&pattern_edges)
            .map(|e| pair_key(e.from, e.to))
            .collect();
        let outcome = semantic::extract(
            &sentences,
            table.drafts(),
            &linked,
            self.embedder.as_deref(),
            &self.config,
            cancel,
        )?;
        info!(
            "Level 3: {} semantic relationships ({:?})",
            outcome.edges.len(),
            outcome.status
        );

        let node_ids: HashSet<u64> = table.drafts().iter().map(|d| d.id).collect();
        let edges = merge_edges(vec![dependency_edges, pattern_edges, outcome.edges], &node_ids);
        let nodes = score_nodes(table.drafts(), &edges, &self.config);
        let themes = document_themes(&sentences, self.config.num_themes);
        debug!("Themes: {:?}", themes);

        let model = match (outcome.status, self.embedder.as_deref()) {
            (SemanticStatus::Applied, Some(embedder)) => {
                format!("{}+{}", self.model.version(), embedder.name())
            }
            _ => self.model.version().to_string(),
        };

        Ok(GraphDocument::new(
            nodes,
            edges,
            Annotations {
                model,
                semantic_status: outcome.status,
                themes,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::RuleModel;

    fn extractor(config: ExtractionConfig) -> Result<Extractor> {
        Extractor::new(Arc::new(RuleModel::new()), None, config)
    }

    #[test]
    fn test_rejects_blank_text() {
        let e = extractor(ExtractionConfig::default()).unwrap();
        assert!(matches!(e.extract("  \n\t "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_unknown_catalogue() {
        let config = ExtractionConfig {
            pattern_catalogue_version: "v0".into(),
            ..Default::default()
        };
        assert!(matches!(extractor(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_cancel_before_first_sentence() {
        let e = extractor(ExtractionConfig::default()).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert!(matches!(
            e.extract_with_cancel("Alice works at Acme Corp.", &cancel),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_without_embedder_reports_unavailable() {
        let doc = extractor(ExtractionConfig::default())
            .unwrap()
            .extract("Alice works at Acme Corp.")
            .unwrap();
        assert_eq!(doc.metadata().semantic_status, SemanticStatus::Unavailable);
        assert_eq!(doc.metadata().model, "rule-en-1");
    }
}
