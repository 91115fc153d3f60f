//! GapForge Gaps — knowledge-gap discovery over an extracted graph.
//!
//! The graph is partitioned with Louvain; every pair of sufficiently large
//! communities is scored by semantic distance and how sparsely the two are
//! already linked.

pub mod centrality;
pub mod discovery;
pub mod distance;
pub mod graph;
pub mod louvain;

pub use discovery::{gap_score, GapDiscovery};
pub use graph::AnalysisGraph;

#[cfg(test)]
pub(crate) mod testing {
    use gapforge_core::{Edge, EdgeSource, EntityType, GraphInput, Node};

    use crate::graph::AnalysisGraph;

    /// Nodes `1..=n` labelled `n<id>`, unit-weight edges.
    pub fn graph(n: u64, edges: &[(u64, u64)]) -> AnalysisGraph {
        let input = GraphInput {
            nodes: (1..=n)
                .map(|id| Node {
                    id,
                    label: format!("n{id}"),
                    entity_type: EntityType::Org,
                    confidence: 0.5,
                    reasoning: Vec::new(),
                    can_verify: false,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|&(from, to)| Edge {
                    from,
                    to,
                    label: "related".into(),
                    source: EdgeSource::Manual,
                    context: String::new(),
                    reason: String::new(),
                    weight: 1.0,
                })
                .collect(),
        };
        AnalysisGraph::build(&input).unwrap()
    }
}
