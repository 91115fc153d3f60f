//! Semantic distance between two communities.

use gapforge_infer::{cosine_similarity, EmbedderBackend};
use ndarray::Array1;

use crate::graph::AnalysisGraph;

/// `1 - cos` between the mean label embeddings of two communities, clamped
/// to [0, 1]. `None` when any label cannot be embedded.
pub fn embedding_distance(embedder: &dyn EmbedderBackend, labels_1: &[&str], labels_2: &[&str]) -> Option<f64> {
    let mean_1 = mean_embedding(embedder, labels_1)?;
    let mean_2 = mean_embedding(embedder, labels_2)?;
    Some((1.0 - cosine_similarity(&mean_1, &mean_2)).clamp(0.0, 1.0))
}

fn mean_embedding(embedder: &dyn EmbedderBackend, labels: &[&str]) -> Option<Array1<f32>> {
    let mut sum = Array1::<f32>::zeros(embedder.dimension());
    for label in labels {
        let result = embedder.embed(label)?;
        if result.embedding.len() != sum.len() {
            return None;
        }
        sum += &result.embedding;
    }
    if labels.is_empty() {
        return None;
    }
    Some(sum / labels.len() as f32)
}

/// `1 - Jaccard` of the communities' closed neighbourhoods.
pub fn structural_distance(graph: &AnalysisGraph, members_1: &[usize], members_2: &[usize]) -> f64 {
    let hood = |members: &[usize]| {
        members
            .iter()
            .flat_map(|&m| graph.closed_neighborhood(m))
            .collect::<std::collections::HashSet<usize>>()
    };
    let (a, b) = (hood(members_1), hood(members_2));
    let union = a.union(&b).count();
    if union == 0 {
        return 1.0;
    }
    1.0 - a.intersection(&b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::graph;
    use gapforge_infer::{HashingEmbedder, NoopEmbedder};

    #[test]
    fn test_structural_distance_of_joined_triangles() {
        let g = graph(6, &[(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)]);
        let d = structural_distance(&g, &[0, 1, 2], &[3, 4, 5]);
        assert!((d - 2.0 / 3.0).abs() < 1e-12);
        let disjoint = graph(4, &[(1, 2), (3, 4)]);
        assert_eq!(structural_distance(&disjoint, &[0, 1], &[2, 3]), 1.0);
    }

    #[test]
    fn test_embedding_distance_bounds() {
        let embedder = HashingEmbedder::new(64);
        let same = embedding_distance(&embedder, &["graph theory"], &["graph theory"]).unwrap();
        assert!(same.abs() < 1e-6);
        let apart = embedding_distance(&embedder, &["protein folding"], &["tax law"]).unwrap();
        assert!((0.0..=1.0).contains(&apart) && apart > same);
        assert!(embedding_distance(&NoopEmbedder::new(8), &["a"], &["b"]).is_none());
    }
}
