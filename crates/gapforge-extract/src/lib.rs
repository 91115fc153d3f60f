//! GapForge Extract — text to knowledge graph.
//!
//! A rule-based English model recognizes entities and parses clauses. Three
//! relation levels then run over each document:
//! 1. dependency relations from subject/verb/object structure,
//! 2. a versioned catalogue of lexical patterns,
//! 3. optional contextual similarity through an embedding backend.
//!
//! Their edges are merged and node confidences rescored from the evidence.

pub mod document;
pub mod extractor;
pub mod merge;
pub mod nlp;
pub mod relations;
pub mod themes;

pub use extractor::{analyze_document, Extractor};
pub use nlp::{NlpModel, RuleModel};
pub use relations::Catalogue;

#[cfg(test)]
pub(crate) mod testing {
    use gapforge_core::CancelFlag;

    use crate::document::{AnalyzedSentence, NodeTable};
    use crate::extractor::analyze_document;
    use crate::nlp::RuleModel;

    pub fn analyze_with_table(text: &str) -> (Vec<AnalyzedSentence>, NodeTable) {
        analyze_document(&RuleModel::new(), text, &CancelFlag::new()).unwrap()
    }

    pub fn analyze(text: &str) -> Vec<AnalyzedSentence> {
        analyze_with_table(text).0
    }
}
