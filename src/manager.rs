//! Manager: decides whether a question needs the knowledge base and, if so,
//! fetches snippets for it.
//!
//! The decision itself is delegated to a language model through a fixed
//! instruction template. Any failure in that step (unreachable model,
//! unparsable reply, unusable decision) falls back to retrieving with the
//! question itself.

use anyhow::Result;
use doc_analyst_core::decision::{parse_decision, Decision, DecisionError};
use std::sync::Arc;

use crate::llm::LlmClient;
use crate::protocol::WireSnippet;
use crate::retrieval::RetrievalBackend;

/// Instructions sent to the decision-maker with every question.
pub const DECISION_PROMPT: &str = r#"You are an orchestrator. Determine if the user's question requires our internal knowledge base.

USE document_retriever for:
- Questions about OUR systems/performance/plans
- Queries needing factual internal data
- Comparative analysis requiring concrete data
- Questions about metrics, architecture, or roadmap

DON'T USE for:
- General knowledge questions
- Definitional/conceptual questions
- Questions about external topics

Format your response as JSON:
{
  "use_tool": true/false,
  "query": "search query if tool needed",
  "reason": "explanation for decision"
}

Examples:
User: "How does Q3 performance compare to Q2?"
Response: {"use_tool": true, "query": "Q3 performance metrics Q2 comparison", "reason": "Needs internal performance data"}

User: "What is machine learning?"
Response: {"use_tool": false, "query": "", "reason": "General knowledge question"}"#;

/// Produces a [`Decision`] for each question.
pub struct DecisionPolicy {
    llm: Arc<dyn LlmClient>,
}

impl DecisionPolicy {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Ask the decision-maker and validate its reply.
    pub async fn try_decide(&self, question: &str) -> Result<Decision, DecisionError> {
        let reply = self
            .llm
            .complete(DECISION_PROMPT, question)
            .await
            .map_err(|e| DecisionError::Upstream(e.to_string()))?;
        parse_decision(&reply)
    }

    /// Decide for `question`. Never fails: errors yield
    /// [`Decision::fallback`].
    pub async fn decide(&self, question: &str) -> Decision {
        match self.try_decide(question).await {
            Ok(decision) => decision,
            Err(err) => {
                tracing::error!(error = %err, "error in tool decision, defaulting to tool use");
                Decision::fallback(question)
            }
        }
    }
}

/// Outcome of routing a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Routing {
    /// Answer without knowledge base context.
    Direct { decision: Decision },
    /// Snippets were retrieved for `decision.query`.
    Retrieved {
        decision: Decision,
        snippets: Vec<WireSnippet>,
    },
}

impl Routing {
    pub fn decision(&self) -> &Decision {
        match self {
            Routing::Direct { decision } | Routing::Retrieved { decision, .. } => decision,
        }
    }

    /// Retrieved snippets, or `None` when nothing usable was retrieved.
    pub fn snippets(&self) -> Option<&[WireSnippet]> {
        match self {
            Routing::Retrieved { snippets, .. } if !snippets.is_empty() => Some(snippets),
            _ => None,
        }
    }
}

pub struct Manager {
    policy: DecisionPolicy,
    backend: Arc<dyn RetrievalBackend>,
}

impl Manager {
    pub fn new(llm: Arc<dyn LlmClient>, backend: Arc<dyn RetrievalBackend>) -> Self {
        Self {
            policy: DecisionPolicy::new(llm),
            backend,
        }
    }

    /// Decide, then retrieve if the decision asks for it.
    ///
    /// Retrieval failures are returned to the caller.
    pub async fn route(&self, question: &str) -> Result<Routing> {
        tracing::info!(question, "manager processing question");

        let decision = self.policy.decide(question).await;
        tracing::info!(
            use_tool = decision.use_tool,
            query = %decision.query,
            reason = %decision.reason,
            "tool decision"
        );

        if !decision.use_tool {
            tracing::info!("no tool needed, proceeding without context");
            return Ok(Routing::Direct { decision });
        }

        tracing::info!(query = %decision.query, "searching knowledge base");
        let snippets = self.backend.retrieve(&decision.query).await?;
        Ok(Routing::Retrieved { decision, snippets })
    }
}
