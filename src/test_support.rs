//! Test doubles for the language-model and retrieval seams.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::llm::LlmClient;
use crate::protocol::WireSnippet;
use crate::retrieval::RetrievalBackend;

/// Returns a fixed reply (or error) and records every `(system, user)` call.
pub struct ScriptedLlm {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

/// Returns the same snippets for every query and records the queries.
pub struct StaticBackend {
    snippets: Vec<WireSnippet>,
    queries: Mutex<Vec<String>>,
}

impl StaticBackend {
    pub fn new(snippets: Vec<WireSnippet>) -> Self {
        Self {
            snippets,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrievalBackend for StaticBackend {
    async fn retrieve(&self, query: &str) -> Result<Vec<WireSnippet>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.snippets.clone())
    }
}

/// Fails every retrieval with a fixed message.
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl RetrievalBackend for FailingBackend {
    async fn retrieve(&self, _query: &str) -> Result<Vec<WireSnippet>> {
        Err(anyhow!(self.message.clone()))
    }
}
