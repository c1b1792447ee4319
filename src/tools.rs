//! Tool trait, registry, and the built-in `document_retriever` tool.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │           ToolRegistry           │
//! │  ┌────────────────────────────┐  │
//! │  │ document_retriever         │  │
//! │  │  Arc<Corpus> + SearchParams│  │
//! │  └────────────────────────────┘  │
//! └───────────────┬──────────────────┘
//!                 ▼
//!   list() · execute(ToolCall) → { "result": ... }
//! ```
//!
//! The registry resolves the tool name (unknown names are
//! [`ToolError::NotFound`]); each tool validates its own arguments.

use doc_analyst_core::models::Corpus;
use doc_analyst_core::search::{search, SearchParams};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::protocol::{
    require_str, ToolCall, ToolError, ToolResult, ToolSpecification, WireSnippet,
    DOCUMENT_RETRIEVER,
};

/// A named capability callable through the tool protocol.
///
/// Execution is synchronous; the HTTP server runs it on the blocking pool.
pub trait Tool: Send + Sync {
    /// Identifier used in [`ToolCall::name`].
    fn name(&self) -> &str;

    /// One-line description for discovery.
    fn description(&self) -> &str;

    /// JSON Schema of the `arguments` object.
    fn input_schema(&self) -> Value;

    /// Execute with the caller's arguments.
    fn execute(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError>;

    fn specification(&self) -> ToolSpecification {
        ToolSpecification {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Keyword retrieval over the loaded knowledge base.
pub struct DocumentRetrieverTool {
    corpus: Arc<Corpus>,
    params: SearchParams,
}

impl DocumentRetrieverTool {
    pub fn new(corpus: Arc<Corpus>, params: SearchParams) -> Self {
        Self { corpus, params }
    }
}

impl Tool for DocumentRetrieverTool {
    fn name(&self) -> &str {
        DOCUMENT_RETRIEVER
    }

    fn description(&self) -> &str {
        "Retrieves relevant text snippets from the knowledge base based on a search query"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query for document retrieval"
                }
            },
            "required": ["query"]
        })
    }

    fn execute(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let query = require_str(arguments, "query")?;

        let snippets: Vec<WireSnippet> = search(&self.corpus, query, &self.params)
            .into_iter()
            .map(WireSnippet::from)
            .collect();

        tracing::debug!(query, count = snippets.len(), "document_retriever executed");

        serde_json::to_value(ToolResult { snippets }).map_err(|e| ToolError::Internal(e.to_string()))
    }
}

/// Registry of tools served by the knowledge base.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry holding the `document_retriever` tool.
    pub fn with_builtins(corpus: Arc<Corpus>, params: SearchParams) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DocumentRetrieverTool::new(corpus, params)));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Descriptions of all registered tools, in registration order.
    pub fn list(&self) -> Vec<ToolSpecification> {
        self.tools.iter().map(|t| t.specification()).collect()
    }

    /// Resolve and execute a tool call, returning the tool's raw result.
    pub fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let tool = self
            .find(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        tool.execute(&call.arguments)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
