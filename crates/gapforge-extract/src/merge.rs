//! Merge of the relation levels and node confidence scoring.

use std::collections::{HashMap, HashSet};

use gapforge_core::{Edge, EdgeSource, ExtractionConfig, Node};
use tracing::debug;

use crate::document::NodeDraft;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Union edges in level order, collapsing exact duplicates and dropping
/// self-loops or edges to unknown nodes.
pub fn merge_edges(levels: Vec<Vec<Edge>>, node_ids: &HashSet<u64>) -> Vec<Edge> {
    let mut seen: HashSet<(u64, u64, String, EdgeSource)> = HashSet::new();
    let mut merged = Vec::new();
    for edge in levels.into_iter().flatten() {
        if edge.from == edge.to || !node_ids.contains(&edge.from) || !node_ids.contains(&edge.to) {
            debug!("Dropping invalid edge {} -> {}", edge.from, edge.to);
            continue;
        }
        if seen.insert((edge.from, edge.to, edge.label.clone(), edge.source)) {
            merged.push(edge);
        }
    }
    merged
}

/// Final nodes: base recognizer confidence plus evidence boosts, with one
/// reasoning line per contributing signal.
pub fn score_nodes(drafts: &[NodeDraft], edges: &[Edge], config: &ExtractionConfig) -> Vec<Node> {
    let mut participation: HashMap<(u64, EdgeSource), usize> = HashMap::new();
    for edge in edges {
        for id in [edge.from, edge.to] {
            *participation.entry((id, edge.source)).or_default() += 1;
        }
    }
    let count = |id: u64, source: EdgeSource| participation.get(&(id, source)).copied().unwrap_or(0);

    drafts
        .iter()
        .map(|draft| {
            let entity_type = draft.entity_type();
            let mut confidence = draft.base_confidence();
            let mut reasoning = draft.recognition_reasons();

            let dependency = count(draft.id, EdgeSource::Dependency);
            if dependency > 0 {
                confidence += config.dependency_boost;
                reasoning.push(format!(
                    "Dependency evidence: {dependency} relationship(s) (+{:.2})",
                    config.dependency_boost
                ));
            }
            let pattern = count(draft.id, EdgeSource::Pattern);
            if pattern > 0 {
                confidence += config.pattern_boost;
                reasoning.push(format!(
                    "Pattern evidence: {pattern} relationship(s) (+{:.2})",
                    config.pattern_boost
                ));
            }
            let semantic = count(draft.id, EdgeSource::Semantic);
            if semantic > 0 {
                reasoning.push(format!("Semantic evidence: {semantic} relationship(s)"));
            }

            let confidence = round4(confidence.clamp(0.0, 1.0));
            Node {
                id: draft.id,
                label: draft.label.clone(),
                entity_type,
                confidence,
                reasoning,
                can_verify: entity_type.is_verifiable() && confidence < config.verify_below,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::analyze_with_table;
    use gapforge_core::EntityType;

    fn edge(from: u64, to: u64, label: &str, source: EdgeSource) -> Edge {
        Edge {
            from,
            to,
            label: label.into(),
            source,
            context: String::new(),
            reason: String::new(),
            weight: 0.5,
        }
    }

    #[test]
    fn test_merge_keeps_parallel_and_collapses_duplicates() {
        let ids: HashSet<u64> = [1, 2, 3].into_iter().collect();
        let merged = merge_edges(
            vec![
                vec![edge(1, 2, "works_at", EdgeSource::Dependency)],
                vec![
                    edge(1, 2, "works_at", EdgeSource::Pattern),
                    edge(1, 2, "works_at", EdgeSource::Pattern),
                    edge(2, 2, "is", EdgeSource::Pattern),
                    edge(2, 9, "located_in", EdgeSource::Pattern),
                ],
                vec![edge(1, 3, "related_to", EdgeSource::Semantic)],
            ],
            &ids,
        );
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].source, EdgeSource::Dependency);
        assert_eq!(merged[1].source, EdgeSource::Pattern);
        assert_eq!(merged[2].source, EdgeSource::Semantic);
    }

    #[test]
    fn test_boosts_and_reasoning() {
        let (_, table) = analyze_with_table("Alice works at Acme Corp. Acme Corp is located in Paris.");
        let edges = vec![
            edge(1, 2, "works_at", EdgeSource::Dependency),
            edge(2, 3, "located_in", EdgeSource::Pattern),
        ];
        let nodes = score_nodes(table.drafts(), &edges, &ExtractionConfig::default());

        assert_eq!(nodes[0].entity_type, EntityType::Person);
        assert_eq!(nodes[0].confidence, 0.9);
        assert!(!nodes[0].can_verify);
        assert_eq!(nodes[1].confidence, 1.0);
        assert_eq!(nodes[2].confidence, 0.95);
        assert!(nodes[1]
            .reasoning
            .iter()
            .any(|r| r.starts_with("Dependency evidence: 1 relationship(s)")));
        assert!(nodes[2].reasoning.iter().any(|r| r.starts_with("Pattern evidence")));
    }

    #[test]
    fn test_low_confidence_nodes_can_verify() {
        let (_, table) = analyze_with_table("Zorblax announced a merger.");
        let nodes = score_nodes(table.drafts(), &[], &ExtractionConfig::default());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].confidence, 0.45);
        assert!(nodes[0].can_verify);
    }
}
