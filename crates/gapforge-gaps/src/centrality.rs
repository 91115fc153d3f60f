//! Degree and betweenness centrality.

use std::collections::VecDeque;

use crate::graph::AnalysisGraph;

/// Number of distinct neighbours of `node` inside its own community.
pub fn community_degree(graph: &AnalysisGraph, membership: &[usize], node: usize) -> usize {
    graph
        .neighbors(node)
        .filter(|&(other, _)| membership[other] == membership[node])
        .count()
}

/// Brandes betweenness on the unweighted graph, normalized to [0, 1] for
/// undirected graphs.
pub fn betweenness(graph: &AnalysisGraph) -> Vec<f64> {
    let n = graph.node_count();
    let adjacency: Vec<Vec<usize>> = (0..n).map(|i| graph.neighbors(i).map(|(j, _)| j).collect()).collect();
    let mut centrality = vec![0.0; n];

    for source in 0..n {
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut paths = vec![0.0f64; n];
        let mut distance: Vec<i64> = vec![-1; n];
        paths[source] = 1.0;
        distance[source] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &adjacency[v] {
                if distance[w] < 0 {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1 {
                    paths[w] += paths[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut dependency = vec![0.0; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                dependency[v] += paths[v] / paths[w] * (1.0 + dependency[w]);
            }
            if w != source {
                centrality[w] += dependency[w];
            }
        }
    }

    // every pair was counted from both ends
    let scale = if n > 2 { 1.0 / ((n - 1) * (n - 2)) as f64 } else { 0.0 };
    centrality.iter().map(|c| c * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::graph;

    #[test]
    fn test_path_center_has_highest_betweenness() {
        let g = graph(3, &[(1, 2), (2, 3)]);
        let b = betweenness(&g);
        assert_eq!(b, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_joining_edge_endpoints_dominate() {
        let g = graph(6, &[(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)]);
        let b = betweenness(&g);
        assert!(b[2] > b[0] && b[3] > b[5]);
        assert!((b[2] - b[3]).abs() < 1e-12);
    }

    #[test]
    fn test_community_degree_ignores_outside_neighbours() {
        let g = graph(4, &[(1, 2), (1, 3), (1, 4)]);
        assert_eq!(community_degree(&g, &[0, 0, 0, 1], 0), 2);
    }
}
