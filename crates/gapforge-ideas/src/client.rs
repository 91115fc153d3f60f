//! Non-streaming chat-completion clients.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API with the system prompt as a top-level field.

use std::future::Future;
use std::time::Duration;

use gapforge_core::{Error, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::{LLMConfig, ResolvedProvider};
use crate::types::{CompletionRequest, LLMProvider};

/// A generative text service returning one completion per call.
pub trait GenerativeService: Send + Sync {
    /// Identifier such as `groq:llama-3.3-70b-versatile`.
    fn name(&self) -> String;

    fn complete(&self, request: CompletionRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Error for a request that needs a provider when none has credentials.
pub fn unconfigured() -> Error {
    Error::Config(
        "No generative service configured. Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GROQ_API_KEY, or add a key to llm-config.json.".into(),
    )
}

/// Map a non-success response to the external-service error taxonomy.
pub fn classify_failure(service: &str, status: StatusCode, body: &str) -> Error {
    let lower = body.to_lowercase();
    let quota = status == StatusCode::PAYMENT_REQUIRED
        || (status == StatusCode::TOO_MANY_REQUESTS
            && (lower.contains("insufficient_quota") || lower.contains("billing")));
    let message = upstream_message(body);
    if quota {
        Error::Quota {
            service: service.to_string(),
            message,
            hint: format!("Check the {service} plan and billing details, or configure another provider."),
        }
    } else {
        Error::Upstream {
            service: service.to_string(),
            status: status.as_u16(),
            message,
        }
    }
}

/// The provider's own error message when the body carries one.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| gapforge_core::error::excerpt(body, 200))
}

/// Chat client bound to one resolved provider.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    provider: LLMProvider,
    model: String,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(resolved: ResolvedProvider, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            endpoint: resolved.provider.endpoint().to_string(),
            provider: resolved.provider,
            model: resolved.model,
            api_key: resolved.api_key,
            timeout,
        }
    }

    /// Client for the configured provider; unconfigured credentials are a
    /// configuration error.
    pub fn from_config(config: &LLMConfig, timeout: Duration) -> Result<Self> {
        let resolved = config.resolve_provider().ok_or_else(unconfigured)?;
        Ok(Self::new(resolved, timeout))
    }

    /// Send requests to `endpoint` instead of the provider default.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    fn body(&self, request: &CompletionRequest) -> Value {
        match self.provider {
            LLMProvider::OpenAI | LLMProvider::Groq => {
                let messages: Vec<Value> = request
                    .messages
                    .iter()
                    .map(|m| json!({"role": m.role, "content": m.content}))
                    .collect();
                json!({
                    "model": self.model,
                    "messages": messages,
                    "temperature": request.temperature,
                    "max_tokens": request.max_tokens,
                })
            }
            LLMProvider::Anthropic => {
                let messages: Vec<Value> = request
                    .messages
                    .iter()
                    .filter(|m| m.role != "system")
                    .map(|m| json!({"role": m.role, "content": m.content}))
                    .collect();
                let mut body = json!({
                    "model": self.model,
                    "messages": messages,
                    "temperature": request.temperature,
                    "max_tokens": request.max_tokens,
                });
                if let Some(system) = request.messages.iter().find(|m| m.role == "system") {
                    body["system"] = json!(system.content);
                }
                body
            }
        }
    }

    fn extract_text(&self, raw: &str) -> Result<String> {
        let parsed: Value = serde_json::from_str(raw)
            .map_err(|e| Error::parse(format!("{} returned invalid JSON: {}", self.provider, e), raw))?;
        let text = match self.provider {
            LLMProvider::OpenAI | LLMProvider::Groq => parsed["choices"][0]["message"]["content"].as_str(),
            LLMProvider::Anthropic => parsed["content"][0]["text"].as_str(),
        };
        text.map(str::to_string)
            .ok_or_else(|| Error::parse(format!("{} response has no completion text", self.provider), raw))
    }
}

impl GenerativeService for ChatClient {
    fn name(&self) -> String {
        format!("{}:{}", self.provider, self.model)
    }

    fn complete(&self, request: CompletionRequest) -> impl Future<Output = Result<String>> + Send {
        async move {
            let service = self.provider.to_string();
            let body = self.body(&request);
            debug!("Requesting completion from {} with model {}", self.endpoint, self.model);

            let mut call = self
                .http
                .post(&self.endpoint)
                .header("Content-Type", "application/json")
                .timeout(self.timeout)
                .json(&body);
            call = match self.provider {
                LLMProvider::OpenAI | LLMProvider::Groq => {
                    call.header("Authorization", format!("Bearer {}", self.api_key))
                }
                LLMProvider::Anthropic => call
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01"),
            };

            let timeout_error = || Error::Timeout {
                service: service.clone(),
                seconds: self.timeout.as_secs(),
            };
            let response = call.send().await.map_err(|e| {
                if e.is_timeout() {
                    timeout_error()
                } else {
                    Error::Upstream {
                        service: service.clone(),
                        status: 0,
                        message: format!("Request failed: {e}"),
                    }
                }
            })?;

            let status = response.status();
            let raw = response.text().await.map_err(|e| {
                if e.is_timeout() {
                    timeout_error()
                } else {
                    Error::Upstream {
                        service: service.clone(),
                        status: status.as_u16(),
                        message: format!("Failed to read response: {e}"),
                    }
                }
            })?;

            if !status.is_success() {
                let err = classify_failure(&service, status, &raw);
                error!("{}", err);
                return Err(err);
            }
            self.extract_text(&raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    fn client(provider: LLMProvider) -> ChatClient {
        ChatClient::new(
            ResolvedProvider {
                provider,
                model: "test-model".into(),
                api_key: "key".into(),
            },
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_quota_classification() {
        let quota = classify_failure(
            "openai",
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "You exceeded your current quota", "code": "insufficient_quota"}}"#,
        );
        match quota {
            Error::Quota { message, hint, .. } => {
                assert_eq!(message, "You exceeded your current quota");
                assert!(hint.contains("billing"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            classify_failure("groq", StatusCode::PAYMENT_REQUIRED, ""),
            Error::Quota { .. }
        ));
        assert!(matches!(
            classify_failure("groq", StatusCode::TOO_MANY_REQUESTS, "slow down"),
            Error::Upstream { status: 429, .. }
        ));
    }

    #[test]
    fn test_anthropic_body_lifts_system_prompt() {
        let request = CompletionRequest {
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hello")],
            temperature: 0.7,
            max_tokens: 100,
        };
        let body = client(LLMProvider::Anthropic).body(&request);
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);

        let body = client(LLMProvider::Groq).body(&request);
        assert!(body.get("system").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_text() {
        let openai = client(LLMProvider::OpenAI);
        assert_eq!(
            openai
                .extract_text(r#"{"choices": [{"message": {"content": "[]"}}]}"#)
                .unwrap(),
            "[]"
        );
        assert!(matches!(openai.extract_text("<html>"), Err(Error::Parse { .. })));
        let anthropic = client(LLMProvider::Anthropic);
        assert_eq!(
            anthropic.extract_text(r#"{"content": [{"type": "text", "text": "ok"}]}"#).unwrap(),
            "ok"
        );
    }

    #[test]
    fn test_unconfigured_is_config_error() {
        let result = ChatClient::from_config(&LLMConfig::default(), Duration::from_secs(1));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
