//! Undirected weighted analysis graph built from lenient node/edge input.

use std::collections::{HashMap, HashSet};

use gapforge_core::{Error, GraphInput, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::warn;

/// Nodes are stored in ascending id order, so node index order and id order
/// agree. Parallel edges between one pair are summed into a single weight.
pub struct AnalysisGraph {
    graph: UnGraph<u64, f64>,
    labels: Vec<String>,
    /// Endpoints of every accepted input edge, parallel edges included.
    links: Vec<(usize, usize)>,
}

impl AnalysisGraph {
    pub fn build(input: &GraphInput) -> Result<Self> {
        let mut nodes: Vec<(u64, &str)> = input.nodes.iter().map(|n| (n.id, n.label.as_str())).collect();
        nodes.sort_by_key(|(id, _)| *id);

        let mut graph = UnGraph::with_capacity(nodes.len(), input.edges.len());
        let mut index: HashMap<u64, NodeIndex> = HashMap::with_capacity(nodes.len());
        let mut labels = Vec::with_capacity(nodes.len());
        for (id, label) in nodes {
            if index.insert(id, graph.add_node(id)).is_some() {
                return Err(Error::Validation(format!("Duplicate node id {id}")));
            }
            labels.push(label.to_string());
        }

        let mut links = Vec::with_capacity(input.edges.len());
        for edge in &input.edges {
            if edge.from == edge.to {
                warn!("Skipping self-loop on node {}", edge.from);
                continue;
            }
            let (Some(&a), Some(&b)) = (index.get(&edge.from), index.get(&edge.to)) else {
                warn!("Skipping edge {} -> {} with unknown endpoint", edge.from, edge.to);
                continue;
            };
            let weight = if edge.weight.is_finite() { edge.weight.max(0.0) } else { 1.0 };
            match graph.find_edge(a, b) {
                Some(e) => graph[e] += weight,
                None => {
                    graph.add_edge(a, b, weight);
                }
            }
            links.push((a.index(), b.index()));
        }

        Ok(Self { graph, labels, links })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn id(&self, node: usize) -> u64 {
        self.graph[NodeIndex::new(node)]
    }

    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    /// Accepted input edges, counting parallel edges separately.
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Distinct neighbours with summed edge weight, in edge insertion order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let a = NodeIndex::new(node);
        self.graph.edges(a).map(move |e| {
            let other = if e.source() == a { e.target() } else { e.source() };
            (other.index(), *e.weight())
        })
    }

    /// The node together with its neighbours.
    pub fn closed_neighborhood(&self, node: usize) -> HashSet<usize> {
        let mut set: HashSet<usize> = self.neighbors(node).map(|(n, _)| n).collect();
        set.insert(node);
        set
    }
}
