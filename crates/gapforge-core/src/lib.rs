//! GapForge Core — graph and analysis types, error taxonomy, configuration.

pub mod analysis;
pub mod cancel;
pub mod config;
pub mod error;
pub mod graph;

pub use analysis::{
    AnalysisMetadata, Cluster, Gap, GapContext, GapReport, Idea, IdeaResponse, Impact,
    Significance, VerificationResult,
};
pub use cancel::CancelFlag;
pub use config::{
    DataPaths, EmbedderKind, ExtractionConfig, GapConfig, GapforgeConfig, IdeaConfig,
    VerifierConfig,
};
pub use error::{Error, ErrorKind, Result};
pub use graph::{
    AccuracyEstimate, Annotations, Edge, EdgeSource, EntityType, GraphDocument, GraphInput,
    Metadata, Node, SemanticStatus, Theme,
};
