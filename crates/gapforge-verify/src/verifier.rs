//! Label → advisory type suggestion.

use std::time::Duration;

use gapforge_core::{Error, Result, VerificationResult, VerifierConfig};
use tracing::{info, warn};

use crate::knowledge::KnowledgeBase;
use crate::mapping::map_classes;
use crate::wikidata::WikidataClient;

/// Confidence attached to a mapped knowledge-base class.
pub const MATCH_CONFIDENCE: f64 = 0.95;

pub struct EntityVerifier<K = WikidataClient> {
    kb: K,
    config: VerifierConfig,
}

impl EntityVerifier<WikidataClient> {
    pub fn wikidata(config: VerifierConfig) -> Self {
        Self::new(WikidataClient::new(&config), config)
    }
}

impl<K: KnowledgeBase> EntityVerifier<K> {
    pub fn new(kb: K, config: VerifierConfig) -> Self {
        Self { kb, config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Look `label` up. Lookup failures land in the result's `error`; only an
    /// empty label is an error.
    pub async fn verify(&self, label: &str) -> Result<VerificationResult> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::Validation("Entity label must not be empty".into()));
        }

        let seconds = self.config.timeout_secs;
        let lookup = tokio::time::timeout(Duration::from_secs(seconds), self.kb.lookup(label)).await;
        let entity = match lookup {
            Ok(Ok(entity)) => entity,
            Ok(Err(e)) => {
                warn!("{} lookup for '{}' failed: {}", self.kb.name(), label, e);
                return Ok(VerificationResult::failed(e.to_string()));
            }
            Err(_) => {
                warn!("{} lookup for '{}' timed out", self.kb.name(), label);
                return Ok(VerificationResult::failed(format!(
                    "{} timed out after {}s",
                    self.kb.name(),
                    seconds
                )));
            }
        };

        let Some(entity) = entity else {
            return Ok(VerificationResult::not_found(format!(
                "'{label}' not found in {}",
                self.kb.name()
            )));
        };

        let described = match &entity.description {
            Some(d) => format!("{} ({}): {}", entity.label, entity.id, d),
            None => format!("{} ({})", entity.label, entity.id),
        };
        match map_classes(&entity.instance_of) {
            Some(entity_type) => {
                info!("Verified '{}' as {} via {}", label, entity_type, entity.id);
                Ok(VerificationResult::suggested(
                    entity_type,
                    MATCH_CONFIDENCE,
                    format!("Matched {described}"),
                ))
            }
            None => Ok(VerificationResult::not_found(format!(
                "Found {described}, but its classes do not map to an entity type"
            ))),
        }
    }
}
