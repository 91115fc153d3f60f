//! Wikidata lookup: entity search, then the entity's `P31` (instance of) claims.

use std::future::Future;
use std::time::Duration;

use gapforge_core::{Error, Result, VerifierConfig};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::knowledge::{KbEntity, KnowledgeBase};

const SERVICE: &str = "wikidata";
const USER_AGENT: &str = concat!("gapforge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct WikidataClient {
    http: Client,
    endpoint: String,
    entity_data_url: String,
    language: String,
    timeout: Duration,
}

impl WikidataClient {
    pub fn new(config: &VerifierConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.endpoint.clone(),
            entity_data_url: config.entity_data_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let raw = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(Error::Upstream {
                service: SERVICE.into(),
                status: status.as_u16(),
                message: gapforge_core::error::excerpt(&raw, 200),
            });
        }
        serde_json::from_str(&raw).map_err(|e| Error::parse(format!("Invalid Wikidata response: {e}"), &raw))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                service: SERVICE.into(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            Error::Upstream {
                service: SERVICE.into(),
                status: 0,
                message: format!("Request failed: {e}"),
            }
        }
    }
}

/// `instance of` class ids from an entity document.
fn instance_of(document: &Value, id: &str) -> Vec<String> {
    document["entities"][id]["claims"]["P31"]
        .as_array()
        .map(|claims| {
            claims
                .iter()
                .filter_map(|c| c["mainsnak"]["datavalue"]["value"]["id"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl KnowledgeBase for WikidataClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn lookup(&self, label: &str) -> impl Future<Output = Result<Option<KbEntity>>> + Send {
        let label = label.to_string();
        async move {
            let search = self
                .get_json(
                    &self.endpoint,
                    &[
                        ("action", "wbsearchentities"),
                        ("search", label.as_str()),
                        ("language", self.language.as_str()),
                        ("limit", "1"),
                        ("format", "json"),
                    ],
                )
                .await?;
            let Some(hit) = search["search"].get(0) else {
                debug!("No Wikidata match for '{}'", label);
                return Ok(None);
            };
            let Some(id) = hit["id"].as_str() else {
                return Ok(None);
            };

            let url = format!("{}/{}.json", self.entity_data_url, id);
            let document = self.get_json(&url, &[]).await?;
            Ok(Some(KbEntity {
                id: id.to_string(),
                label: hit["label"].as_str().unwrap_or(&label).to_string(),
                description: hit["description"].as_str().map(str::to_string),
                instance_of: instance_of(&document, id),
            }))
        }
    }
}
