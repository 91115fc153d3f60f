//! LLM provider configuration and selection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{LLMProvider, LLMStatus};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Stored LLM configuration (`llm-config.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: "auto".into(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.into(),
            groq_model: DEFAULT_GROQ_MODEL.into(),
        }
    }
}

/// A provider with the model and key to call it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => {
                    info!("Loaded LLM config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring invalid LLM config {}: {}", config_path.display(), e);
                    LLMConfig::default()
                }
            },
            Err(_) => LLMConfig::default(),
        };

        // Env vars as fallback for API keys
        let env_key = |name: &str| std::env::var(name).ok().filter(|k| !k.trim().is_empty());
        if config.openai_api_key.is_none() {
            config.openai_api_key = env_key("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = env_key("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = env_key("GROQ_API_KEY");
        }

        config
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        let pick = |provider: LLMProvider, key: &Option<String>, model: &str| {
            key.as_ref().map(|k| ResolvedProvider {
                provider,
                model: model.to_string(),
                api_key: k.clone(),
            })
        };

        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "openai" => pick(LLMProvider::OpenAI, &self.openai_api_key, &self.openai_model),
                "anthropic" => pick(LLMProvider::Anthropic, &self.anthropic_api_key, &self.anthropic_model),
                "groq" => pick(LLMProvider::Groq, &self.groq_api_key, &self.groq_model),
                _ => None,
            };
        }

        // Auto mode: Anthropic > Groq > OpenAI
        pick(LLMProvider::Anthropic, &self.anthropic_api_key, &self.anthropic_model)
            .or_else(|| pick(LLMProvider::Groq, &self.groq_api_key, &self.groq_model))
            .or_else(|| pick(LLMProvider::OpenAI, &self.openai_api_key, &self.openai_model))
    }

    pub fn status(&self) -> LLMStatus {
        let resolved = self.resolve_provider();
        LLMStatus {
            preferred_provider: self.preferred_provider.clone(),
            active_provider: resolved.as_ref().map(|r| r.provider.to_string()),
            active_model: resolved.map(|r| r.model),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_prefers_anthropic_then_groq() {
        let mut config = LLMConfig {
            openai_api_key: Some("sk-openai".into()),
            groq_api_key: Some("gsk".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::Groq);
        config.anthropic_api_key = Some("sk-ant".into());
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::Anthropic);
    }

    #[test]
    fn test_explicit_preference_without_key() {
        let config = LLMConfig {
            preferred_provider: "openai".into(),
            groq_api_key: Some("gsk".into()),
            ..Default::default()
        };
        assert!(config.resolve_provider().is_none());
        assert!(LLMConfig::default().resolve_provider().is_none());
        assert_eq!(config.status().active_provider, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");
        std::fs::write(&path, r#"{"preferred_provider": "groq", "groq_api_key": "gsk-file", "groq_model": "llama-3.1-8b-instant"}"#).unwrap();
        let config = LLMConfig::load(&path);
        let resolved = config.resolve_provider().unwrap();
        assert_eq!(resolved.api_key, "gsk-file");
        assert_eq!(resolved.model, "llama-3.1-8b-instant");
    }
}
