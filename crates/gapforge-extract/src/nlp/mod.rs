//! Swappable NLP model: sentence splitting, tokenization, entity recognition
//! and dependency parsing.

pub mod lemma;
pub mod lexicon;
pub mod parser;
pub mod recognizer;
pub mod tokenize;

use std::collections::HashMap;
use std::path::Path;

use gapforge_core::{EntityType, Error, Result};
use tracing::info;

pub use parser::{Argument, Clause};
pub use recognizer::{Mention, Recognizer};
pub use tokenize::{Sentence, Token, TokenKind};

/// Contract between the extractor and a linguistic model.
///
/// Implementations must be deterministic: the same input always yields the
/// same sentences, mentions and clauses.
pub trait NlpModel: Send + Sync {
    /// Identifier recorded in extraction metadata.
    fn version(&self) -> &str;

    fn sentences(&self, text: &str) -> Vec<Sentence>;

    fn tokenize(&self, sentence: &str) -> Vec<Token>;

    /// Typed mentions in one sentence, ordered by token position.
    fn recognize(&self, sentence: &str, tokens: &[Token]) -> Vec<Mention>;

    fn parse(&self, tokens: &[Token], mentions: &[Mention]) -> Vec<Clause>;
}

/// Deterministic English rule model.
pub struct RuleModel {
    recognizer: Recognizer,
}

impl RuleModel {
    pub const VERSION: &'static str = "rule-en-1";

    /// Model with the built-in gazetteer only.
    pub fn new() -> Self {
        Self {
            recognizer: Recognizer::new(HashMap::new()),
        }
    }

    /// Load the model, extending the gazetteer from a JSON object of
    /// `label → type`. A configured file that cannot be read or parsed makes
    /// the model unavailable.
    pub fn load(gazetteer: Option<&Path>) -> Result<Self> {
        let Some(path) = gazetteer else {
            return Ok(Self::new());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::ModelUnavailable(format!("Cannot read gazetteer {}: {}", path.display(), e))
        })?;
        let entries: HashMap<String, EntityType> = serde_json::from_str(&raw).map_err(|e| {
            Error::ModelUnavailable(format!("Invalid gazetteer {}: {}", path.display(), e))
        })?;
        if let Some((label, _)) = entries.iter().find(|(_, ty)| **ty == EntityType::Other) {
            return Err(Error::ModelUnavailable(format!(
                "Gazetteer entry '{label}' has an unknown entity type"
            )));
        }
        let recognizer = Recognizer::new(entries);
        info!(
            "Rule model loaded with {} gazetteer entries from {}",
            recognizer.gazetteer_size(),
            path.display()
        );
        Ok(Self { recognizer })
    }
}

impl Default for RuleModel {
    fn default() -> Self {
        Self::new()
    }
}

impl NlpModel for RuleModel {
    fn version(&self) -> &str {
        Self::VERSION
    }

    fn sentences(&self, text: &str) -> Vec<Sentence> {
        tokenize::split_sentences(text)
    }

    fn tokenize(&self, sentence: &str) -> Vec<Token> {
        tokenize::tokenize(sentence)
    }

    fn recognize(&self, sentence: &str, tokens: &[Token]) -> Vec<Mention> {
        self.recognizer.recognize(sentence, tokens)
    }

    fn parse(&self, tokens: &[Token], mentions: &[Mention]) -> Vec<Clause> {
        parser::parse(tokens, mentions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_gazetteer() {
        let model = RuleModel::load(None).unwrap();
        assert_eq!(model.version(), "rule-en-1");
    }

    #[test]
    fn test_missing_gazetteer_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleModel::load(Some(&dir.path().join("missing.json"))).err().unwrap();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    #[test]
    fn test_gazetteer_file_extends_recognizer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gazetteer.json");
        std::fs::write(&path, r#"{"Zentrix": "ORG", "Novaterra": "GPE"}"#).unwrap();
        let model = RuleModel::load(Some(&path)).unwrap();

        let sentence = "Zentrix opened an office in Novaterra.";
        let tokens = model.tokenize(sentence);
        let mentions = model.recognize(sentence, &tokens);
        assert_eq!(mentions[0].entity_type, EntityType::Org);
        assert_eq!(mentions[1].entity_type, EntityType::Gpe);
        assert_eq!(mentions[1].rule, "gazetteer");
    }

    #[test]
    fn test_malformed_gazetteer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gazetteer.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(RuleModel::load(Some(&path)), Err(Error::ModelUnavailable(_))));
        std::fs::write(&path, r#"{"Zentrix": "SPACESHIP"}"#).unwrap();
        assert!(matches!(RuleModel::load(Some(&path)), Err(Error::ModelUnavailable(_))));
    }
}
