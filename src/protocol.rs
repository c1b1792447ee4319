//! Tool protocol wire types.
//!
//! These are the request and response bodies exchanged between the manager
//! and the tool server, independent of the HTTP transport that carries them.
//!
//! ```json
//! // request
//! { "name": "document_retriever", "arguments": { "query": "Q3 revenue" } }
//! // response
//! { "result": { "snippets": [ { "content": "...", "source": "q3.md", "section": "Revenue" } ] } }
//! ```
//!
//! Snippet scores are retrieval-internal and never cross the wire.

use doc_analyst_core::models::Snippet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The only tool the knowledge base server exposes.
pub const DOCUMENT_RETRIEVER: &str = "document_retriever";

/// Description of a callable tool, as returned by the list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpecification {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsListResponse {
    pub tools: Vec<ToolSpecification>,
}

/// A request to execute a tool by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    /// Absent on the wire means no arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Build a `document_retriever` call for `query`.
    pub fn document_retriever(query: &str) -> Self {
        let mut arguments = Map::new();
        arguments.insert("query".to_string(), Value::String(query.to_string()));
        Self {
            name: DOCUMENT_RETRIEVER.to_string(),
            arguments,
        }
    }
}

/// A snippet as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSnippet {
    pub content: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl From<Snippet> for WireSnippet {
    fn from(s: Snippet) -> Self {
        Self {
            content: s.content,
            source: s.source,
            section: s.section,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub snippets: Vec<WireSnippet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResponse {
    pub result: ToolResult,
}

/// Failure of a tool call, classified for the caller.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name.
    #[error("Tool '{0}' not found")]
    NotFound(String),
    /// The arguments do not satisfy the tool's input contract.
    #[error("{0}")]
    BadRequest(String),
    /// The tool failed while executing.
    #[error("Error executing tool: {0}")]
    Internal(String),
}

impl ToolError {
    /// Machine-readable error code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NotFound(_) => "not_found",
            ToolError::BadRequest(_) => "bad_request",
            ToolError::Internal(_) => "internal",
        }
    }
}

/// Extract a required string argument.
pub fn require_str<'a>(arguments: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    match arguments.get(key) {
        None => Err(ToolError::BadRequest(format!(
            "Missing required argument: {}",
            key
        ))),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ToolError::BadRequest(format!(
            "Argument '{}' must be a string",
            key
        ))),
    }
}
