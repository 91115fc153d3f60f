//! Gap discovery: communities, pairwise scoring, ranking.

use std::collections::HashSet;
use std::sync::Arc;

use gapforge_core::{
    AnalysisMetadata, Cluster, Gap, GapConfig, GapReport, GraphInput, Result, Significance,
};
use gapforge_infer::EmbedderBackend;
use tracing::{debug, info};

use crate::centrality::{betweenness, community_degree};
use crate::distance::{embedding_distance, structural_distance};
use crate::graph::AnalysisGraph;
use crate::louvain::partition;

/// Gap score for a community pair, in `(0, 10]`:
/// `10 * (1 + distance) / 2 * n / (n + inter_edges)` with `n = n1 + n2`.
///
/// Strictly increasing in `distance` and strictly decreasing in `inter_edges`.
/// Depends on size only through `inter_edges / n`.
pub fn gap_score(size_1: usize, size_2: usize, distance: f64, inter_edges: usize) -> f64 {
    let combined = (size_1 + size_2) as f64;
    10.0 * (1.0 + distance) / 2.0 * combined / (combined + inter_edges as f64)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

struct Community {
    id: usize,
    /// Node indices, ascending.
    members: Vec<usize>,
    /// Node indices ranked by within-community degree.
    ranked: Vec<usize>,
}

/// Finds under-connected, semantically distant community pairs.
pub struct GapDiscovery {
    config: GapConfig,
    embedder: Option<Arc<dyn EmbedderBackend>>,
}

impl GapDiscovery {
    pub fn new(config: GapConfig, embedder: Option<Arc<dyn EmbedderBackend>>) -> Self {
        Self { config, embedder }
    }

    pub fn config(&self) -> &GapConfig {
        &self.config
    }

    pub fn significance(&self, score: f64) -> Significance {
        if score >= self.config.high_threshold {
            Significance::High
        } else if score >= self.config.medium_threshold {
            Significance::Medium
        } else {
            Significance::Low
        }
    }

    pub fn discover(&self, input: &GraphInput) -> Result<GapReport> {
        let cfg = &self.config;
        if input.nodes.len() < cfg.min_nodes || input.edges.len() < cfg.min_edges {
            info!(
                "Graph too small for gap analysis ({} nodes, {} edges)",
                input.nodes.len(),
                input.edges.len()
            );
            return Ok(GapReport::too_small(format!(
                "Graph too small for gap analysis (need {}+ nodes, {}+ edges)",
                cfg.min_nodes, cfg.min_edges
            )));
        }

        let graph = AnalysisGraph::build(input)?;
        let membership = partition(&graph, cfg.resolution);
        let communities = self.communities(&graph, &membership);
        info!("Detected {} communities", communities.len());

        let centrality = betweenness(&graph);
        let embedder = self.embedder.as_deref().filter(|e| e.is_available());

        let mut gaps = Vec::new();
        for (i, c1) in communities.iter().enumerate() {
            for c2 in &communities[i + 1..] {
                if c1.members.len() < cfg.min_cluster_size || c2.members.len() < cfg.min_cluster_size {
                    continue;
                }
                if let Some(gap) = self.score_pair(&graph, &membership, &centrality, embedder, c1, c2) {
                    gaps.push(gap);
                }
            }
        }

        // stable sort keeps community-pair order among equal scores
        gaps.sort_by(|a, b| b.gap_score.total_cmp(&a.gap_score));
        gaps.truncate(cfg.max_gaps);
        info!("Found {} structural gaps", gaps.len());

        let average_gap_score = if gaps.is_empty() {
            0.0
        } else {
            round4(gaps.iter().map(|g| g.gap_score).sum::<f64>() / gaps.len() as f64)
        };
        let clusters: Vec<Cluster> = communities
            .iter()
            .map(|c| Cluster {
                id: c.id,
                members: c.members.iter().map(|&m| graph.id(m)).collect(),
                keywords: self.keywords(&graph, c),
            })
            .collect();

        Ok(GapReport {
            num_communities: clusters.len(),
            num_gaps_detected: gaps.len(),
            message: None,
            analysis_metadata: Some(AnalysisMetadata {
                total_nodes: input.nodes.len(),
                total_edges: input.edges.len(),
                num_communities: clusters.len(),
                average_gap_score,
            }),
            communities: clusters,
            gaps,
        })
    }

    fn communities(&self, graph: &AnalysisGraph, membership: &[usize]) -> Vec<Community> {
        let count = membership.iter().max().map_or(0, |m| m + 1);
        let mut communities: Vec<Community> = (0..count)
            .map(|id| Community {
                id,
                members: Vec::new(),
                ranked: Vec::new(),
            })
            .collect();
        for (node, &c) in membership.iter().enumerate() {
            communities[c].members.push(node);
        }
        for community in &mut communities {
            let mut ranked = community.members.clone();
            // members are ascending, so the stable sort breaks ties by id
            ranked.sort_by_key(|&m| std::cmp::Reverse(community_degree(graph, membership, m)));
            community.ranked = ranked;
        }
        communities
    }

    fn keywords(&self, graph: &AnalysisGraph, community: &Community) -> Vec<String> {
        community
            .ranked
            .iter()
            .take(self.config.keywords_per_cluster)
            .map(|&m| graph.label(m).to_string())
            .collect()
    }

    fn score_pair(
        &self,
        graph: &AnalysisGraph,
        membership: &[usize],
        centrality: &[f64],
        embedder: Option<&dyn EmbedderBackend>,
        c1: &Community,
        c2: &Community,
    ) -> Option<Gap> {
        let (n1, n2) = (c1.members.len(), c2.members.len());
        let inter_edges = graph
            .links()
            .iter()
            .filter(|&&(a, b)| {
                let (ca, cb) = (membership[a], membership[b]);
                (ca == c1.id && cb == c2.id) || (ca == c2.id && cb == c1.id)
            })
            .count();
        let connectivity = inter_edges as f64 / (n1 * n2) as f64;
        if connectivity > self.config.max_connectivity {
            debug!(
                "Communities {} and {} are {:.2} connected; not a gap",
                c1.id, c2.id, connectivity
            );
            return None;
        }

        let keywords_1 = self.keywords(graph, c1);
        let seen: HashSet<String> = keywords_1.iter().map(|k| k.to_lowercase()).collect();
        let keywords_2: Vec<String> = c2
            .ranked
            .iter()
            .map(|&m| graph.label(m))
            .filter(|label| !seen.contains(&label.to_lowercase()))
            .take(self.config.keywords_per_cluster)
            .map(str::to_string)
            .collect();

        let labels = |c: &Community| c.members.iter().map(|&m| graph.label(m)).collect::<Vec<_>>();
        let embedded = embedder.and_then(|e| embedding_distance(e, &labels(c1), &labels(c2)));
        let (distance, structural) = match embedded {
            Some(d) => (d, false),
            None => (structural_distance(graph, &c1.members, &c2.members), true),
        };

        let mut bridges: Vec<usize> = c1
            .members
            .iter()
            .chain(&c2.members)
            .copied()
            .filter(|&node| {
                let other = if membership[node] == c1.id { c2.id } else { c1.id };
                graph.neighbors(node).any(|(n, _)| membership[n] == other)
            })
            .collect();
        bridges.sort_by(|&a, &b| centrality[b].total_cmp(&centrality[a]).then(a.cmp(&b)));

        let score = round4(gap_score(n1, n2, distance, inter_edges));
        let head_1 = keywords_1.first().cloned().unwrap_or_else(|| format!("community {}", c1.id));
        let head_2 = keywords_2.first().cloned().unwrap_or_else(|| format!("community {}", c2.id));
        let mut description = format!(
            "Found {n1} concepts related to {head_1} and {n2} concepts related to {head_2}, but only {}% connectivity.",
            (connectivity * 100.0) as u32
        );
        if structural {
            description.push_str(
                " Semantic distance is a structural proxy (1 - Jaccard of neighbourhoods) because no embedding backend was available.",
            );
        }

        Some(Gap {
            title: format!("Gap between '{head_1}' and '{head_2}' clusters"),
            description,
            significance: self.significance(score),
            bridge_suggestion: format!("Explore: How does {head_1} relate to {head_2}?"),
            cluster_1_keywords: keywords_1,
            cluster_2_keywords: keywords_2,
            gap_score: score,
            semantic_distance: round4(distance),
            bridge_nodes: bridges.into_iter().map(|b| graph.id(b)).collect(),
            existing_inter_edges: inter_edges,
            connectivity: round4(connectivity),
            community_1: c1.id,
            community_2: c2.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_monotonicity() {
        for inter in 0..4 {
            let mut previous = f64::MIN;
            for step in 0..=10 {
                let score = gap_score(3, 4, step as f64 / 10.0, inter);
                assert!(score > previous);
                previous = score;
            }
        }
        for step in 0..=10 {
            let d = step as f64 / 10.0;
            assert!(gap_score(3, 4, d, 0) > gap_score(3, 4, d, 1));
            assert!(gap_score(3, 4, d, 1) > gap_score(3, 4, d, 5));
        }
    }

    #[test]
    fn test_significance_thresholds() {
        let discovery = GapDiscovery::new(GapConfig::default(), None);
        assert_eq!(discovery.significance(7.0), Significance::High);
        assert_eq!(discovery.significance(6.99), Significance::Medium);
        assert_eq!(discovery.significance(5.5), Significance::Medium);
        assert_eq!(discovery.significance(5.49), Significance::Low);
    }

    #[test]
    fn test_score_is_size_normalised() {
        let small = gap_score(3, 3, 0.5, 1);
        let large = gap_score(30, 30, 0.5, 10);
        assert!((small - large).abs() < 1e-12);
        assert!(gap_score(500, 500, 0.0, 0) <= 5.0);
        assert_eq!(gap_score(50, 50, 1.0, 0), 10.0);

        // Same distance, proportionally more links: no longer High.
        let discovery = GapDiscovery::new(GapConfig::default(), None);
        assert_eq!(discovery.significance(gap_score(40, 40, 0.5, 0)), Significance::High);
        assert_eq!(discovery.significance(gap_score(40, 40, 0.5, 40)), Significance::Low);
    }
}
