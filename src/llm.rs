//! Language-model client abstraction and implementations.
//!
//! Callers depend only on [`LlmClient`], which exposes one capability:
//! `complete(system, user) → text`. Implementations:
//!
//! - **[`OllamaClient`]**: `POST {url}/api/chat` on a local Ollama instance
//!   (default `http://localhost:11434`).
//! - **[`OpenAiClient`]**: `POST {url}/chat/completions` on the OpenAI API
//!   or any compatible endpoint (default `https://api.openai.com/v1`).
//!   Requires `OPENAI_API_KEY`.
//!
//! Use [`create_client`] to pick the implementation from configuration.
//!
//! Every request is bounded by `llm.timeout_secs`. A timed-out or failed
//! call is returned as an error and never retried here; retry policy
//! belongs to the caller.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::LlmConfig;

const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";
const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";

/// A chat-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier (e.g. `"llama3.2"`).
    fn model_name(&self) -> &str;

    /// Complete a single exchange. An empty `system` sends only the user
    /// message.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Instantiate the client named by `llm.provider`.
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider.as_str() {
        "ollama" => Ok(Box::new(OllamaClient::new(config)?)),
        "openai" => Ok(Box::new(OpenAiClient::new(config)?)),
        other => bail!("Unsupported LLM provider: {}", other),
    }
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

fn chat_messages(system: &str, user: &str) -> Vec<Value> {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": user }));
    messages
}

// ============ Ollama ============

pub struct OllamaClient {
    model: String,
    url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| OLLAMA_DEFAULT_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            model: config.model.clone(),
            url,
            client: http_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(system, user),
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "Ollama connection error (is Ollama running at {}?): {}",
                    self.url,
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, body_text);
        }

        let json: Value = response.json().await?;
        parse_ollama_response(&json)
    }
}

fn parse_ollama_response(json: &Value) -> Result<String> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid Ollama response: missing message.content"))
}

// ============ OpenAI ============

pub struct OpenAiClient {
    model: String,
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not in the environment.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let url = config
            .url
            .clone()
            .unwrap_or_else(|| OPENAI_DEFAULT_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            model: config.model.clone(),
            url,
            api_key,
            client: http_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(system, user),
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body_text);
        }

        let json: Value = response.json().await?;
        parse_openai_response(&json)
    }
}

fn parse_openai_response(json: &Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid OpenAI response: missing choices[0].message.content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_skip_empty_system() {
        let messages = chat_messages("", "hello");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");

        let messages = chat_messages("be terse", "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "hello");
    }

    #[test]
    fn test_parse_ollama_response() {
        let json = json!({ "model": "llama3.2", "message": { "role": "assistant", "content": "hi" }, "done": true });
        assert_eq!(parse_ollama_response(&json).unwrap(), "hi");
        assert!(parse_ollama_response(&json!({ "done": true })).is_err());
    }

    #[test]
    fn test_parse_openai_response() {
        let json = json!({ "choices": [ { "index": 0, "message": { "role": "assistant", "content": "answer" } } ] });
        assert_eq!(parse_openai_response(&json).unwrap(), "answer");
        assert!(parse_openai_response(&json!({ "choices": [] })).is_err());
    }

    #[test]
    fn test_create_ollama_client() {
        let config = LlmConfig {
            url: Some("http://gpu-box:11434/".to_string()),
            ..LlmConfig::default()
        };
        let client = create_client(&config).unwrap();
        assert_eq!(client.model_name(), "llama3.2");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        assert!(create_client(&config).is_err());
    }
}
