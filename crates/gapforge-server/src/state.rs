//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use gapforge_core::{GapforgeConfig, Result};
use gapforge_extract::{Extractor, RuleModel};
use gapforge_gaps::GapDiscovery;
use gapforge_ideas::{ChatClient, GenerativeService, IdeaGenerator, LLMConfig, LLMStatus};
use gapforge_infer::EmbedderBackend;
use gapforge_verify::EntityVerifier;
use tracing::{info, warn};

/// Read-only engines built once at startup and shared by every request.
pub struct AppState {
    pub config: GapforgeConfig,
    pub embedder: Arc<dyn EmbedderBackend>,
    pub extractor: Extractor,
    pub gaps: Arc<GapDiscovery>,
    pub ideas: IdeaGenerator,
    /// Client for the resolved provider; `None` without credentials.
    pub chat: Option<ChatClient>,
    pub llm_status: LLMStatus,
    pub verifier: EntityVerifier,
}

impl AppState {
    /// Build state, reading LLM credentials from `llm-config.json` and the
    /// environment.
    pub fn new(config: GapforgeConfig, embedder: Arc<dyn EmbedderBackend>) -> Result<Self> {
        let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
        Self::with_llm_config(config, embedder, llm_config)
    }

    pub fn with_llm_config(
        config: GapforgeConfig,
        embedder: Arc<dyn EmbedderBackend>,
        llm_config: LLMConfig,
    ) -> Result<Self> {
        let model = RuleModel::load(config.extraction.gazetteer_path.as_deref())?;
        let extractor = Extractor::new(
            Arc::new(model),
            Some(embedder.clone()),
            config.extraction.clone(),
        )?;
        info!(
            "Extractor ready: model {}, embedder {}",
            extractor.model_version(),
            extractor.embedder_name().unwrap_or("none")
        );

        let gaps = Arc::new(GapDiscovery::new(config.gaps.clone(), Some(embedder.clone())));
        let ideas = IdeaGenerator::new(config.ideas.clone());
        let timeout = Duration::from_secs(config.ideas.timeout_secs);
        let chat = ChatClient::from_config(&llm_config, timeout).ok();
        match &chat {
            Some(client) => info!("Idea generation via {}", client.name()),
            None => warn!("No generative service configured, idea generation disabled"),
        }
        let verifier = EntityVerifier::wikidata(config.verifier.clone());

        Ok(Self {
            config,
            embedder,
            extractor,
            gaps,
            ideas,
            chat,
            llm_status: llm_config.status(),
            verifier,
        })
    }
}
