//! LLM provider abstraction for example generation.
//!
//! Supports Ollama (local models, the default), Anthropic and OpenAI-compatible
//! APIs. Uses blocking HTTP via `ureq`; generation is strictly sequential and
//! each provider owns its request timeout.

use serde_json::Value;
use std::time::Duration;

/// Errors from LLM provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("empty response from LLM")]
    EmptyResponse,
    #[error("provider '{0}' requires an API key (set {1})")]
    MissingApiKey(String, &'static str),
    #[error("unknown provider: '{0}'. Available: {1}")]
    UnknownProvider(String, String),
}

/// A completed LLM response.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The text content of the response.
    pub text: String,
    /// Input tokens used (from API response, if reported).
    pub input_tokens: Option<u64>,
    /// Output tokens used (from API response, if reported).
    pub output_tokens: Option<u64>,
}

/// Abstraction over LLM API providers.
pub trait LlmProvider {
    /// Send a completion request with system and user messages.
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError>;

    /// The model name (for display/logging).
    fn model_name(&self) -> &str;
}

fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_global(Some(timeout))
            .build(),
    )
}

fn api_error(json: &Value) -> Option<ProviderError> {
    let err = json.get("error")?;
    let message = err
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| err.as_str())
        .unwrap_or("unknown error")
        .to_string();
    Some(ProviderError::Api {
        status: 400,
        message,
    })
}

// ---------------------------------------------------------------------------
// Ollama generate API
// ---------------------------------------------------------------------------

/// Ollama provider using the non-streaming `/api/generate` endpoint.
#[cfg(feature = "ollama")]
pub struct OllamaProvider {
    model: String,
    base_url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "ollama")]
impl OllamaProvider {
    pub const DEFAULT_MODEL: &str = "qwen3:32b";
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

    pub fn new(model: Option<String>, base_url: Option<String>, timeout: Duration) -> Self {
        Self {
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            agent: agent_with_timeout(timeout),
        }
    }
}

#[cfg(feature = "ollama")]
impl LlmProvider for OllamaProvider {
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.model,
            "system": system,
            "prompt": user,
            "stream": false
        });

        let mut response = self
            .agent
            .post(&url)
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let json: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(err) = api_error(&json) {
            return Err(err);
        }

        let text = json
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or(ProviderError::EmptyResponse)?
            .to_string();

        Ok(LlmResponse {
            text,
            input_tokens: json.get("prompt_eval_count").and_then(|t| t.as_u64()),
            output_tokens: json.get("eval_count").and_then(|t| t.as_u64()),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Anthropic Messages API
// ---------------------------------------------------------------------------

/// Anthropic provider using the Messages API.
#[cfg(feature = "anthropic")]
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

#[cfg(feature = "anthropic")]
impl AnthropicProvider {
    pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
    const API_URL: &str = "https://api.anthropic.com/v1/messages";

    pub fn new(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            agent: agent_with_timeout(timeout),
        }
    }
}

#[cfg(feature = "anthropic")]
impl LlmProvider for AnthropicProvider {
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 4096,
            "system": system,
            "messages": [
                {"role": "user", "content": user}
            ]
        });

        let mut response = self
            .agent
            .post(Self::API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let json: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(err) = api_error(&json) {
            return Err(err);
        }

        // Extract text from content blocks
        let text = json
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|arr| {
                arr.iter()
                    .find_map(|block| block.get("text").and_then(|t| t.as_str()))
            })
            .ok_or(ProviderError::EmptyResponse)?
            .to_string();

        let usage = json.get("usage");
        Ok(LlmResponse {
            text,
            input_tokens: usage
                .and_then(|u| u.get("input_tokens"))
                .and_then(|t| t.as_u64()),
            output_tokens: usage
                .and_then(|u| u.get("output_tokens"))
                .and_then(|t| t.as_u64()),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// OpenAI Chat Completions API
// ---------------------------------------------------------------------------

/// OpenAI-compatible provider (works with OpenAI, Azure, local proxies).
#[cfg(feature = "openai")]
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "openai")]
impl OpenAiProvider {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    const DEFAULT_BASE_URL: &str = "https://api.openai.com";

    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            agent: agent_with_timeout(timeout),
        }
    }
}

#[cfg(feature = "openai")]
impl LlmProvider for OpenAiProvider {
    fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 4096,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ]
        });

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let json: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(err) = api_error(&json) {
            return Err(err);
        }

        // Extract text from choices
        let text = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|c| c.as_str())
            .ok_or(ProviderError::EmptyResponse)?
            .to_string();

        let usage = json.get("usage");
        Ok(LlmResponse {
            text,
            input_tokens: usage
                .and_then(|u| u.get("prompt_tokens"))
                .and_then(|t| t.as_u64()),
            output_tokens: usage
                .and_then(|u| u.get("completion_tokens"))
                .and_then(|t| t.as_u64()),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Create a provider by name.
///
/// Cloud providers need `api_key`; Ollama ignores it.
pub fn create_provider(
    provider_name: &str,
    api_key: Option<&str>,
    model: Option<&str>,
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    match provider_name {
        #[cfg(feature = "ollama")]
        "ollama" => Ok(Box::new(OllamaProvider::new(
            model.map(String::from),
            base_url.map(String::from),
            timeout,
        ))),
        #[cfg(feature = "anthropic")]
        "anthropic" => {
            let key = api_key.ok_or_else(|| {
                ProviderError::MissingApiKey("anthropic".to_string(), "ANTHROPIC_API_KEY")
            })?;
            Ok(Box::new(AnthropicProvider::new(
                key.to_string(),
                model.map(String::from),
                timeout,
            )))
        }
        #[cfg(feature = "openai")]
        "openai" => {
            let key = api_key.ok_or_else(|| {
                ProviderError::MissingApiKey("openai".to_string(), "OPENAI_API_KEY")
            })?;
            Ok(Box::new(OpenAiProvider::new(
                key.to_string(),
                model.map(String::from),
                base_url.map(String::from),
                timeout,
            )))
        }
        other => Err(ProviderError::UnknownProvider(
            other.to_string(),
            available_providers().join(", "),
        )),
    }
}

/// Environment variable holding the API key for a provider, if it needs one.
pub fn api_key_env(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}

/// List compiled-in provider names.
pub fn available_providers() -> Vec<&'static str> {
    vec![
        #[cfg(feature = "ollama")]
        "ollama",
        #[cfg(feature = "anthropic")]
        "anthropic",
        #[cfg(feature = "openai")]
        "openai",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_providers_default_features() {
        assert_eq!(available_providers(), vec!["ollama", "anthropic", "openai"]);
    }

    #[test]
    fn test_create_ollama_without_key() {
        let provider =
            create_provider("ollama", None, Some("llama3"), None, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.model_name(), "llama3");
    }

    #[test]
    fn test_cloud_provider_requires_key() {
        let err = create_provider("openai", None, None, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::MissingApiKey(_, "OPENAI_API_KEY")));
    }

    #[test]
    fn test_unknown_provider() {
        let err = create_provider("gemini", None, None, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_api_error_extraction() {
        let json = serde_json::json!({"error": "model 'x' not found"});
        let err = api_error(&json).unwrap();
        assert!(err.to_string().contains("model 'x' not found"));
        assert!(api_error(&serde_json::json!({"response": "ok"})).is_none());
    }

    #[test]
    fn test_api_key_env() {
        assert_eq!(api_key_env("anthropic"), Some("ANTHROPIC_API_KEY"));
        assert_eq!(api_key_env("ollama"), None);
    }
}
