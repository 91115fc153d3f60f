//! Configuration and data directory management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Paths to all GapForge data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// ONNX embedding model directory (`data/models/`).
    pub models: PathBuf,
    /// Optional gazetteer extension (`data/gazetteer.json`).
    pub gazetteer_file: PathBuf,
    /// LLM provider configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
    /// Engine settings (`data/gapforge.json`).
    pub settings_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            models: root.join("models"),
            gazetteer_file: root.join("gazetteer.json"),
            llm_config_file: root.join("llm-config.json"),
            settings_file: root.join("gapforge.json"),
            root,
        };
        std::fs::create_dir_all(&paths.models)?;
        Ok(paths)
    }
}

/// Which embedding backend to load at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    Onnx,
    #[default]
    Hashing,
    None,
}

impl std::str::FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onnx" => Ok(EmbedderKind::Onnx),
            "hashing" => Ok(EmbedderKind::Hashing),
            "none" | "off" => Ok(EmbedderKind::None),
            other => Err(Error::Config(format!("Unknown embedder: {other}"))),
        }
    }
}

/// Per-request extraction settings. Passed explicitly so runs are reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub embedding_enabled: bool,
    pub pattern_catalogue_version: String,
    /// Cosine similarity a pair must exceed to receive a semantic edge.
    pub semantic_threshold: f64,
    /// Tokens on each side of a mention used as its embedding context.
    pub context_window: usize,
    pub embedding_timeout_ms: u64,
    pub max_semantic_entities: usize,
    pub dependency_weight: f64,
    pub pattern_weight: f64,
    pub dependency_boost: f64,
    pub pattern_boost: f64,
    /// Nodes below this confidence are flagged `can_verify`.
    pub verify_below: f64,
    pub num_themes: usize,
    /// Gazetteer extension. Loading fails the model if set but unreadable.
    pub gazetteer_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            embedding_enabled: true,
            pattern_catalogue_version: "v1".into(),
            semantic_threshold: 0.75,
            context_window: 20,
            embedding_timeout_ms: 5_000,
            max_semantic_entities: 200,
            dependency_weight: 0.9,
            pattern_weight: 0.7,
            dependency_boost: 0.1,
            pattern_boost: 0.05,
            verify_below: 0.9,
            num_themes: 5,
            gazetteer_path: None,
        }
    }
}

impl ExtractionConfig {
    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("semantic_threshold", self.semantic_threshold),
            ("dependency_weight", self.dependency_weight),
            ("pattern_weight", self.pattern_weight),
            ("dependency_boost", self.dependency_boost),
            ("pattern_boost", self.pattern_boost),
            ("verify_below", self.verify_below),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{name} must be within [0, 1], got {value}")));
            }
        }
        Ok(())
    }
}

/// Gap discovery thresholds. Significance buckets depend on these constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    pub min_nodes: usize,
    pub min_edges: usize,
    pub min_cluster_size: usize,
    pub keywords_per_cluster: usize,
    pub max_gaps: usize,
    /// Pairs linked more densely than this are not reported as gaps.
    pub max_connectivity: f64,
    /// Modularity resolution; 1.0 is standard modularity.
    pub resolution: f64,
    pub high_threshold: f64,
    pub medium_threshold: f64,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            min_nodes: 5,
            min_edges: 2,
            min_cluster_size: 2,
            keywords_per_cluster: 5,
            max_gaps: 10,
            max_connectivity: 0.2,
            resolution: 1.0,
            high_threshold: 7.0,
            medium_threshold: 5.5,
        }
    }
}

/// Idea generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaConfig {
    pub count: usize,
    pub novelty_ceiling: u8,
    pub novelty_floor: u8,
    pub novelty_step: u8,
    pub temperature: f64,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

impl Default for IdeaConfig {
    fn default() -> Self {
        Self {
            count: 5,
            novelty_ceiling: 85,
            novelty_floor: 70,
            novelty_step: 5,
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 60,
        }
    }
}

impl IdeaConfig {
    /// Rank-based novelty score: `max(floor, ceiling - rank * step)`.
    pub fn novelty_score(&self, rank: usize) -> u8 {
        let drop = (rank as u64).saturating_mul(self.novelty_step as u64);
        let score = (self.novelty_ceiling as u64).saturating_sub(drop);
        score.max(self.novelty_floor as u64).min(100) as u8
    }
}

/// Knowledge-base lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    pub endpoint: String,
    pub entity_data_url: String,
    pub language: String,
    pub timeout_secs: u64,
    pub accept_above: f64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.wikidata.org/w/api.php".into(),
            entity_data_url: "https://www.wikidata.org/wiki/Special:EntityData".into(),
            language: "en".into(),
            timeout_secs: 3,
            accept_above: 0.9,
        }
    }
}

/// Settings persisted in `gapforge.json`; every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    embedder: Option<EmbedderKind>,
    extraction: ExtractionConfig,
    gaps: GapConfig,
    ideas: IdeaConfig,
    verifier: VerifierConfig,
}

/// Top-level GapForge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapforgeConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub embedder: EmbedderKind,
    /// Embedding dimension for the hashing backend.
    pub embedding_dim: usize,
    pub extraction: ExtractionConfig,
    pub gaps: GapConfig,
    pub ideas: IdeaConfig,
    pub verifier: VerifierConfig,
}

impl GapforgeConfig {
    /// Create configuration from the settings file, environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_paths = DataPaths::new(data_dir)?;

        let settings: Settings = match std::fs::read_to_string(&data_paths.settings_file) {
            Ok(raw) => {
                info!("Loaded settings from {}", data_paths.settings_file.display());
                serde_json::from_str(&raw).map_err(|e| {
                    Error::Config(format!(
                        "Invalid settings file {}: {}",
                        data_paths.settings_file.display(),
                        e
                    ))
                })?
            }
            Err(_) => Settings::default(),
        };

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        let embedder = match std::env::var("GAPFORGE_EMBEDDER") {
            Ok(raw) => raw.parse()?,
            Err(_) => settings.embedder.unwrap_or_default(),
        };

        let mut extraction = settings.extraction;
        if let Some(threshold) = std::env::var("GAPFORGE_SEMANTIC_THRESHOLD")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            extraction.semantic_threshold = threshold;
        }
        if extraction.gazetteer_path.is_none() {
            extraction.gazetteer_path = std::env::var("GAPFORGE_GAZETTEER")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    data_paths
                        .gazetteer_file
                        .exists()
                        .then(|| data_paths.gazetteer_file.clone())
                });
        }
        extraction.validate()?;

        Ok(Self {
            port,
            data_paths,
            embedder,
            embedding_dim: 256,
            extraction,
            gaps: settings.gaps,
            ideas: settings.ideas,
            verifier: settings.verifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_novelty_sequence() {
        let cfg = IdeaConfig::default();
        let scores: Vec<u8> = (0..5).map(|r| cfg.novelty_score(r)).collect();
        assert_eq!(scores, vec![85, 80, 75, 70, 70]);
        assert_eq!(cfg.novelty_score(1_000), 70);
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("gapforge.json"),
            r#"{"gaps": {"max_gaps": 3}, "extraction": {"semantic_threshold": 0.6}}"#,
        )
        .unwrap();

        let config = GapforgeConfig::from_env(dir.path()).unwrap();
        assert_eq!(config.gaps.max_gaps, 3);
        assert_eq!(config.gaps.min_nodes, 5);
        assert!(config.data_paths.models.is_dir());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let cfg = ExtractionConfig {
            semantic_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_embedder_kind_parse() {
        assert_eq!("ONNX".parse::<EmbedderKind>().unwrap(), EmbedderKind::Onnx);
        assert_eq!("off".parse::<EmbedderKind>().unwrap(), EmbedderKind::None);
        assert!("bert".parse::<EmbedderKind>().is_err());
    }
}
