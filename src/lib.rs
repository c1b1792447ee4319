//! # doc-analyst
//!
//! Question answering over a local markdown knowledge base.
//!
//! A manager asks a language model whether a question needs internal
//! documents. If it does, the manager calls the `document_retriever` tool
//! (in-process or on a tool server over HTTP), and a specialist synthesizes
//! an answer that cites the retrieved sections.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌────────────────┐
//! │ Question │──▶│   Manager    │──▶│  Tool server   │
//! └──────────┘   │ (LLM decide) │   │ /mcp/v1/tools  │
//!                └──────┬───────┘   └───────┬────────┘
//!                       │ snippets          │ keyword search
//!                       ▼                   ▼
//!                ┌──────────────┐   ┌────────────────┐
//!                │  Specialist  │   │ Corpus (*.md)  │
//!                │ (cited text) │   └────────────────┘
//!                └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! doc-analyst serve                           # start the tool server
//! doc-analyst ask --query "How did Q3 go?"     # answer one question
//! doc-analyst ask --interactive               # question loop
//! doc-analyst search "q3 revenue"             # inspect retrieval
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration, env overrides, validation |
//! | [`corpus`] | Knowledge base loader |
//! | [`protocol`] | Tool protocol wire types and errors |
//! | [`tools`] | `Tool` trait, registry, `document_retriever` |
//! | [`server`] | Tool server (Axum) with CORS |
//! | [`llm`] | Language-model client trait, Ollama and OpenAI clients |
//! | [`retrieval`] | Remote and in-process retrieval backends |
//! | [`manager`] | Decision policy and routing |
//! | [`specialist`] | Cited answer synthesis |
//! | [`orchestrator`] | End-to-end flow and interactive loop |
//! | [`search`] | `search` CLI command |
//!
//! Retrieval and scoring live in [`doc_analyst_core`].

pub mod config;
pub mod corpus;
pub mod llm;
pub mod manager;
pub mod orchestrator;
pub mod protocol;
pub mod retrieval;
pub mod search;
pub mod server;
pub mod specialist;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

pub use llm::LlmClient;
pub use protocol::{ToolCall, ToolError, WireSnippet};
pub use retrieval::RetrievalBackend;
pub use tools::{Tool, ToolRegistry};
