//! Knowledge graph produced by extraction.

use serde::{Deserialize, Serialize};

/// Entity category. The tag set is fixed; unknown tags coming back from an
/// editing layer deserialize as [`EntityType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Person,
    Norp,
    Fac,
    Org,
    Gpe,
    Loc,
    Product,
    Event,
    WorkOfArt,
    Law,
    Date,
    #[serde(other)]
    Other,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Norp => "NORP",
            EntityType::Fac => "FAC",
            EntityType::Org => "ORG",
            EntityType::Gpe => "GPE",
            EntityType::Loc => "LOC",
            EntityType::Product => "PRODUCT",
            EntityType::Event => "EVENT",
            EntityType::WorkOfArt => "WORK_OF_ART",
            EntityType::Law => "LAW",
            EntityType::Date => "DATE",
            EntityType::Other => "OTHER",
        }
    }

    /// Types a structured knowledge base can meaningfully confirm.
    pub fn is_verifiable(&self) -> bool {
        !matches!(self, EntityType::Date | EntityType::Other)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized entity, merged from all of its mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u64,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: Vec<String>,
    #[serde(default)]
    pub can_verify: bool,
}

/// Which strategy produced an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSource {
    Dependency,
    Pattern,
    Semantic,
    #[default]
    Manual,
}

impl std::fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeSource::Dependency => write!(f, "dependency"),
            EdgeSource::Pattern => write!(f, "pattern"),
            EdgeSource::Semantic => write!(f, "semantic"),
            EdgeSource::Manual => write!(f, "manual"),
        }
    }
}

fn default_edge_label() -> String {
    "related".into()
}

fn default_edge_weight() -> f64 {
    1.0
}

/// A directed, provenance-tagged relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: u64,
    pub to: u64,
    #[serde(default = "default_edge_label")]
    pub label: String,
    #[serde(default)]
    pub source: EdgeSource,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "default_edge_weight")]
    pub weight: f64,
}

impl Edge {
    /// Identity used for duplicate collapsing.
    pub fn key(&self) -> (u64, u64, &str, EdgeSource) {
        (self.from, self.to, self.label.as_str(), self.source)
    }
}

/// Coarse bucket derived from average confidence and edge-source mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyEstimate {
    High,
    Medium,
    Low,
}

impl AccuracyEstimate {
    /// High needs confident nodes and mostly syntactic/pattern evidence.
    pub fn from_signals(average_confidence: f64, syntactic_share: f64) -> Self {
        if average_confidence >= 0.8 && syntactic_share >= 0.5 {
            AccuracyEstimate::High
        } else if average_confidence >= 0.6 {
            AccuracyEstimate::Medium
        } else {
            AccuracyEstimate::Low
        }
    }
}

/// Outcome of the optional semantic-similarity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticStatus {
    Applied,
    #[default]
    Disabled,
    Unavailable,
    TimedOut,
    Failed,
}

/// A document-level keyword theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub keyword: String,
    pub count: usize,
}

/// Values recorded by the extractor that are not derivable from nodes/edges.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    pub model: String,
    pub semantic_status: SemanticStatus,
    pub themes: Vec<Theme>,
}

/// Extraction statistics. Always derived from the graph it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub total_entities: usize,
    pub total_relationships: usize,
    pub dependency_edges: usize,
    pub pattern_edges: usize,
    pub semantic_edges: usize,
    pub average_confidence: f64,
    pub accuracy_estimate: AccuracyEstimate,
    pub model: String,
    pub semantic_status: SemanticStatus,
    pub themes: Vec<Theme>,
}

impl Metadata {
    fn derive(nodes: &[Node], edges: &[Edge], annotations: Annotations) -> Self {
        let count = |source: EdgeSource| edges.iter().filter(|e| e.source == source).count();
        let dependency_edges = count(EdgeSource::Dependency);
        let pattern_edges = count(EdgeSource::Pattern);
        let semantic_edges = count(EdgeSource::Semantic);

        let average_confidence = if nodes.is_empty() {
            0.0
        } else {
            nodes.iter().map(|n| n.confidence).sum::<f64>() / nodes.len() as f64
        };
        let syntactic_share = if edges.is_empty() {
            0.0
        } else {
            (dependency_edges + pattern_edges) as f64 / edges.len() as f64
        };

        Self {
            total_entities: nodes.len(),
            total_relationships: edges.len(),
            dependency_edges,
            pattern_edges,
            semantic_edges,
            average_confidence,
            accuracy_estimate: AccuracyEstimate::from_signals(average_confidence, syntactic_share),
            model: annotations.model,
            semantic_status: annotations.semantic_status,
            themes: annotations.themes,
        }
    }
}

/// One extraction result. Fields are read-only so metadata cannot drift
/// from the nodes and edges it counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    metadata: Metadata,
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, annotations: Annotations) -> Self {
        let metadata = Metadata::derive(&nodes, &edges, annotations);
        Self {
            nodes,
            edges,
            metadata,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>, Metadata) {
        (self.nodes, self.edges, self.metadata)
    }
}

/// Nodes and edges as supplied by an editing layer for re-analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphInput {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl From<GraphDocument> for GraphInput {
    fn from(doc: GraphDocument) -> Self {
        let (nodes, edges, _) = doc.into_parts();
        Self { nodes, edges }
    }
}
