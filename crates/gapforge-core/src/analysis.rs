//! Derived analysis results: clusters, gaps, ideas, verification outcomes.

use serde::{Deserialize, Serialize};

use crate::graph::EntityType;

/// A community from modularity partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    /// Member node ids, ascending.
    pub members: Vec<u64>,
    /// Member labels ranked by within-community degree centrality.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Significance {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Significance::Low => write!(f, "Low"),
            Significance::Medium => write!(f, "Medium"),
            Significance::High => write!(f, "High"),
        }
    }
}

/// A scored candidate for an unexplored connection between two clusters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub title: String,
    pub description: String,
    pub significance: Significance,
    pub cluster_1_keywords: Vec<String>,
    pub cluster_2_keywords: Vec<String>,
    pub bridge_suggestion: String,
    pub gap_score: f64,
    pub semantic_distance: f64,
    #[serde(default)]
    pub bridge_nodes: Vec<u64>,
    #[serde(default)]
    pub existing_inter_edges: usize,
    #[serde(default)]
    pub connectivity: f64,
    #[serde(default)]
    pub community_1: usize,
    #[serde(default)]
    pub community_2: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub num_communities: usize,
    pub average_gap_score: f64,
}

/// Response of gap discovery. An undersized graph yields an empty report
/// with an explanatory `message` rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub gaps: Vec<Gap>,
    pub num_communities: usize,
    pub num_gaps_detected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub communities: Vec<Cluster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_metadata: Option<AnalysisMetadata>,
}

impl GapReport {
    pub fn too_small(message: impl Into<String>) -> Self {
        Self {
            gaps: Vec::new(),
            num_communities: 0,
            num_gaps_detected: 0,
            message: Some(message.into()),
            communities: Vec::new(),
            analysis_metadata: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Case-insensitive parse of a model-supplied impact rating.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Impact::High),
            "medium" | "moderate" => Some(Impact::Medium),
            "low" => Some(Impact::Low),
            _ => None,
        }
    }
}

/// A generated bridging proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub bridging_question: String,
    pub novelty: String,
    pub methodology: String,
    pub impact: Impact,
    pub novelty_score: u8,
    pub semantic_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapContext {
    pub title: String,
    pub significance: Significance,
    pub gap_score: f64,
}

impl From<&Gap> for GapContext {
    fn from(gap: &Gap) -> Self {
        Self {
            title: gap.title.clone(),
            significance: gap.significance,
            gap_score: gap.gap_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaResponse {
    pub ideas: Vec<Idea>,
    pub gap_context: GapContext,
}

/// Advisory outcome of a knowledge-base lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(rename = "type")]
    pub entity_type: Option<EntityType>,
    pub confidence: f64,
    pub reason: String,
    pub error: Option<String>,
}

impl VerificationResult {
    pub fn suggested(entity_type: EntityType, confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            entity_type: Some(entity_type),
            confidence,
            reason: reason.into(),
            error: None,
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self {
            entity_type: None,
            confidence: 0.0,
            reason: reason.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            entity_type: None,
            confidence: 0.0,
            reason: format!("Knowledge base error: {error}"),
            error: Some(error),
        }
    }

    /// The suggested type when its confidence strictly exceeds `threshold`.
    pub fn accepted_type(&self, threshold: f64) -> Option<EntityType> {
        match self.entity_type {
            Some(t) if self.error.is_none() && self.confidence > threshold => Some(t),
            _ => None,
        }
    }
}
