//! Per-request analysis state: analyzed sentences and the node table that
//! merges mentions into entities.

use std::collections::HashMap;

use gapforge_core::EntityType;

use crate::nlp::{Clause, Mention, Token, TokenKind};

/// One sentence after tokenization, recognition and parsing.
#[derive(Debug, Clone)]
pub struct AnalyzedSentence {
    pub index: usize,
    pub text: String,
    pub tokens: Vec<Token>,
    pub mentions: Vec<Mention>,
    /// Node id of each mention, parallel to `mentions`.
    pub node_ids: Vec<u64>,
    pub clauses: Vec<Clause>,
}

impl AnalyzedSentence {
    /// Source text covering tokens `start..end`.
    pub fn span(&self, start: usize, end: usize) -> &str {
        if start >= end || end > self.tokens.len() {
            return "";
        }
        &self.text[self.tokens[start].start..self.tokens[end - 1].end]
    }

    /// Word tokens around a mention, excluding the mention itself.
    pub fn context_words(&self, mention: &Mention, window: usize) -> Vec<&str> {
        let from = mention.start.saturating_sub(window);
        let to = (mention.end + window).min(self.tokens.len());
        (from..to)
            .filter(|&i| i < mention.start || i >= mention.end)
            .map(|i| &self.tokens[i])
            .filter(|t| t.kind != TokenKind::Punct)
            .map(|t| t.text.as_str())
            .collect()
    }
}

/// Where an entity was first mentioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstMention {
    pub sentence: usize,
    pub mention: usize,
}

/// An entity accumulated from all of its mentions.
#[derive(Debug, Clone)]
pub struct NodeDraft {
    pub id: u64,
    pub label: String,
    pub first: FirstMention,
    /// Mention types with counts, in first-seen order.
    types: Vec<(EntityType, usize)>,
    confidences: Vec<f64>,
    /// Distinct `(type, rule)` evidence, in first-seen order.
    evidence: Vec<(EntityType, &'static str)>,
}

impl NodeDraft {
    /// Most frequent mention type; ties go to the type seen first.
    pub fn entity_type(&self) -> EntityType {
        let mut best = self.types[0];
        for &(ty, count) in &self.types[1..] {
            if count > best.1 {
                best = (ty, count);
            }
        }
        best.0
    }

    /// Arithmetic mean of mention confidences.
    pub fn base_confidence(&self) -> f64 {
        self.confidences.iter().sum::<f64>() / self.confidences.len() as f64
    }

    pub fn mention_count(&self) -> usize {
        self.confidences.len()
    }

    pub fn recognition_reasons(&self) -> Vec<String> {
        let mut reasons: Vec<String> = self
            .evidence
            .iter()
            .map(|(ty, rule)| format!("Recognized as {ty} by {rule}"))
            .collect();
        if self.mention_count() > 1 {
            reasons.push(format!(
                "Merged {} mentions (mean confidence {:.2})",
                self.mention_count(),
                self.base_confidence()
            ));
        }
        reasons
    }
}

/// Deduplicates mentions by case-insensitive normalized label. Ids are
/// assigned from 1 in first-mention order.
#[derive(Debug, Default)]
pub struct NodeTable {
    drafts: Vec<NodeDraft>,
    index: HashMap<String, usize>,
}

pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl NodeTable {
    pub fn observe(&mut self, mention: &Mention, first: FirstMention) -> u64 {
        let key = normalize_label(&mention.text);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.drafts.len();
                self.drafts.push(NodeDraft {
                    id: slot as u64 + 1,
                    label: mention.text.split_whitespace().collect::<Vec<_>>().join(" "),
                    first,
                    types: Vec::new(),
                    confidences: Vec::new(),
                    evidence: Vec::new(),
                });
                self.index.insert(key, slot);
                slot
            }
        };

        let draft = &mut self.drafts[slot];
        match draft.types.iter_mut().find(|(ty, _)| *ty == mention.entity_type) {
            Some((_, count)) => *count += 1,
            None => draft.types.push((mention.entity_type, 1)),
        }
        draft.confidences.push(mention.confidence);
        if !draft
            .evidence
            .iter()
            .any(|&(ty, rule)| ty == mention.entity_type && rule == mention.rule)
        {
            draft.evidence.push((mention.entity_type, mention.rule));
        }
        draft.id
    }

    pub fn drafts(&self) -> &[NodeDraft] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(text: &str, ty: EntityType, confidence: f64) -> Mention {
        Mention {
            text: text.into(),
            entity_type: ty,
            confidence,
            start: 0,
            end: 1,
            rule: "test rule",
        }
    }

    #[test]
    fn test_mentions_merge_case_insensitively() {
        let mut table = NodeTable::default();
        let first = FirstMention { sentence: 0, mention: 0 };
        assert_eq!(table.observe(&mention("Acme  Corp", EntityType::Org, 0.85), first), 1);
        assert_eq!(table.observe(&mention("Paris", EntityType::Gpe, 0.9), first), 2);
        assert_eq!(table.observe(&mention("ACME Corp", EntityType::Org, 0.45), first), 1);

        let acme = &table.drafts()[0];
        assert_eq!(acme.label, "Acme Corp");
        assert!((acme.base_confidence() - 0.65).abs() < 1e-9);
        assert_eq!(acme.recognition_reasons().len(), 2);
    }

    #[test]
    fn test_type_majority_ties_to_first_seen() {
        let mut table = NodeTable::default();
        let first = FirstMention { sentence: 0, mention: 0 };
        table.observe(&mention("Jordan", EntityType::Gpe, 0.55), first);
        table.observe(&mention("Jordan", EntityType::Person, 0.8), first);
        assert_eq!(table.drafts()[0].entity_type(), EntityType::Gpe);
        table.observe(&mention("Jordan", EntityType::Person, 0.8), first);
        assert_eq!(table.drafts()[0].entity_type(), EntityType::Person);
    }
}
