//! Gap → ideas.

use std::time::Duration;

use gapforge_core::{Error, Gap, GapContext, IdeaConfig, IdeaResponse, Result};
use tracing::info;

use crate::client::GenerativeService;
use crate::parse::parse_ideas;
use crate::prompt::build_messages;
use crate::types::CompletionRequest;

pub struct IdeaGenerator {
    config: IdeaConfig,
}

impl IdeaGenerator {
    pub fn new(config: IdeaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IdeaConfig {
        &self.config
    }

    /// Ask `service` for bridging ideas. The whole call is bounded by the
    /// configured timeout.
    pub async fn generate<S: GenerativeService>(&self, service: &S, gap: &Gap) -> Result<IdeaResponse> {
        if gap.title.trim().is_empty() {
            return Err(Error::Validation("Gap must have a title".into()));
        }
        if gap.cluster_1_keywords.is_empty() && gap.cluster_2_keywords.is_empty() {
            return Err(Error::Validation("Gap must carry cluster keywords".into()));
        }

        let request = CompletionRequest {
            messages: build_messages(gap, self.config.count),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        info!("Generating {} ideas with {} for '{}'", self.config.count, service.name(), gap.title);

        let seconds = self.config.timeout_secs;
        let raw = tokio::time::timeout(Duration::from_secs(seconds), service.complete(request))
            .await
            .map_err(|_| Error::Timeout {
                service: service.name(),
                seconds,
            })??;

        let ideas = parse_ideas(&raw, &self.config, gap.semantic_distance)?;
        Ok(IdeaResponse {
            ideas,
            gap_context: GapContext::from(gap),
        })
    }
}
