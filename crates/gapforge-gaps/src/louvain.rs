//! Louvain modularity partitioning.
//!
//! Local moving visits nodes in ascending index order and moves a node only
//! on a strict modularity gain; among equally good targets the smallest
//! community wins. Levels are aggregated until a pass moves nothing.

use std::collections::BTreeMap;

use tracing::debug;

use crate::graph::AnalysisGraph;

const EPSILON: f64 = 1e-12;

/// One aggregation level: adjacency without self-loops plus the internal
/// weight folded into each node.
struct Level {
    adj: Vec<Vec<(usize, f64)>>,
    internal: Vec<f64>,
}

impl Level {
    fn from_graph(graph: &AnalysisGraph) -> Self {
        let n = graph.node_count();
        Self {
            adj: (0..n).map(|i| graph.neighbors(i).collect()).collect(),
            internal: vec![0.0; n],
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn degrees(&self) -> Vec<f64> {
        self.adj
            .iter()
            .zip(&self.internal)
            .map(|(links, internal)| links.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * internal)
            .collect()
    }

    /// Collapse each community into a single node.
    fn aggregate(&self, assignment: &[usize], count: usize) -> Self {
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut internal = vec![0.0; count];
        for (i, neighbors) in self.adj.iter().enumerate() {
            let ci = assignment[i];
            internal[ci] += self.internal[i];
            for &(j, w) in neighbors {
                let cj = assignment[j];
                if ci == cj {
                    // each internal edge is seen from both ends
                    internal[ci] += w / 2.0;
                } else {
                    *links[ci].entry(cj).or_default() += w;
                }
            }
        }
        Self {
            adj: links.into_iter().map(|m| m.into_iter().collect()).collect(),
            internal,
        }
    }
}

/// Renumber labels by first appearance in node order.
fn renumber(assignment: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: BTreeMap<usize, usize> = BTreeMap::new();
    let mut order = Vec::with_capacity(assignment.len());
    for &label in assignment {
        let next = mapping.len();
        order.push(*mapping.entry(label).or_insert(next));
    }
    (order, mapping.len())
}

/// Local moving phase. Returns the assignment and whether any node moved.
fn local_moving(level: &Level, resolution: f64) -> (Vec<usize>, bool) {
    let n = level.len();
    let k = level.degrees();
    let two_m: f64 = k.iter().sum();
    let mut community: Vec<usize> = (0..n).collect();
    if two_m <= 0.0 {
        return (community, false);
    }
    let mut totals = k.clone();
    let gain = |k_in: f64, total: f64, k_i: f64| k_in - resolution * total * k_i / two_m;

    let mut improved = false;
    loop {
        let mut moved = false;
        for i in 0..n {
            let own = community[i];
            let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
            for &(j, w) in &level.adj[i] {
                *weights.entry(community[j]).or_default() += w;
            }

            totals[own] -= k[i];
            let mut best = own;
            let mut best_gain = gain(weights.get(&own).copied().unwrap_or(0.0), totals[own], k[i]);
            for (&candidate, &k_in) in &weights {
                if candidate == own {
                    continue;
                }
                let g = gain(k_in, totals[candidate], k[i]);
                if g > best_gain + EPSILON {
                    best = candidate;
                    best_gain = g;
                }
            }
            totals[best] += k[i];

            if best != own {
                community[i] = best;
                moved = true;
                improved = true;
            }
        }
        if !moved {
            break;
        }
    }
    (community, improved)
}

/// Community of every node, numbered from 0 by smallest member.
pub fn partition(graph: &AnalysisGraph, resolution: f64) -> Vec<usize> {
    let mut membership: Vec<usize> = (0..graph.node_count()).collect();
    let mut level = Level::from_graph(graph);
    let mut depth = 0;

    loop {
        let (assignment, improved) = local_moving(&level, resolution);
        if !improved {
            break;
        }
        let (assignment, count) = renumber(&assignment);
        for m in membership.iter_mut() {
            *m = assignment[*m];
        }
        depth += 1;
        debug!("Louvain level {}: {} communities", depth, count);
        if count == level.len() {
            break;
        }
        level = level.aggregate(&assignment, count);
    }

    renumber(&membership).0
}
