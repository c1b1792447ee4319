//! Retrieval backends used by the manager.
//!
//! - **[`RemoteToolClient`]** calls a running tool server over HTTP.
//! - **[`LocalRetriever`]** executes the same tool call in-process, for
//!   single-binary use and tests.
//!
//! Both speak the `document_retriever` call shape, so argument validation
//! and result format are identical either way.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::protocol::{
    ToolCall, ToolExecutionResponse, ToolResult, ToolSpecification, ToolsListResponse,
    WireSnippet,
};
use crate::tools::ToolRegistry;

/// Source of snippets for a retrieval query.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<WireSnippet>>;
}

/// HTTP client for the tool server.
pub struct RemoteToolClient {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteToolClient {
    /// `timeout_secs` bounds each request; failed requests are not retried.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Fetch the server's tool listing.
    pub async fn list_tools(&self) -> Result<Vec<ToolSpecification>> {
        let url = format!("{}/mcp/v1/tools", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call MCP server: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Failed to call MCP server: {} {}", status, body_text);
        }

        let list: ToolsListResponse = response.json().await?;
        Ok(list.tools)
    }

    /// Execute an arbitrary tool call.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let url = format!("{}/mcp/v1/tools/execute", self.base_url);
        tracing::info!(%url, tool = %call.name, "calling MCP server");

        let response = self
            .client
            .post(&url)
            .json(call)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call MCP server: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Failed to call MCP server: {} {}", status, body_text);
        }

        let body: ToolExecutionResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Error processing MCP response: {}", e))?;
        Ok(body.result)
    }
}

#[async_trait]
impl RetrievalBackend for RemoteToolClient {
    async fn retrieve(&self, query: &str) -> Result<Vec<WireSnippet>> {
        let result = self.execute(&ToolCall::document_retriever(query)).await?;
        tracing::info!(count = result.snippets.len(), "retrieved snippets");
        Ok(result.snippets)
    }
}

/// In-process retrieval through a [`ToolRegistry`].
pub struct LocalRetriever {
    tools: Arc<ToolRegistry>,
}

impl LocalRetriever {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl RetrievalBackend for LocalRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<WireSnippet>> {
        let value = self.tools.execute(&ToolCall::document_retriever(query))?;
        let result: ToolResult = serde_json::from_value(value)?;
        tracing::info!(count = result.snippets.len(), "retrieved snippets");
        Ok(result.snippets)
    }
}
