//! Specialist: synthesizes a cited answer from the question and any
//! retrieved snippets.
//!
//! Snippets are presented to the model numbered in retrieval order. The
//! reply gets a `Sources Referenced:` footer listing those numbers unless
//! the model already wrote one. Citation correctness inside the prose is
//! up to the model.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::llm::LlmClient;
use crate::protocol::WireSnippet;

pub const SYNTHESIS_PROMPT: &str = r#"You are a meticulous technical analyst. Your job is to synthesize a clear, concise answer based only on the provided context and the user's question.

RULES:
1. Answer ONLY from the provided context
2. Always cite sources using inline citations [1], [2], etc.
3. If insufficient information, state this explicitly
4. Be precise with numbers, dates, and technical terms
5. Organize your answer with clear structure

ANSWER FORMAT:
[Your detailed answer with inline citations]

---
Sources Referenced:
[1] filename.md (Section: Section Name)
[2] filename.md (Section: Section Name)"#;

const SOURCES_MARKER: &str = "Sources Referenced:";

pub struct Specialist {
    llm: Arc<dyn LlmClient>,
}

impl Specialist {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Produce the final answer. Model failures become an error message in
    /// the returned text rather than an `Err`.
    pub async fn synthesize(&self, question: &str, snippets: Option<&[WireSnippet]>) -> String {
        tracing::info!(question, "specialist synthesizing answer");

        let snippets = snippets.filter(|s| !s.is_empty());
        let user = build_user_prompt(question, snippets);

        let reply = match self.llm.complete(SYNTHESIS_PROMPT, &user).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "LLM API error");
                format!("Error generating response: {}", e)
            }
        };

        let answer = format_response(reply, snippets);
        tracing::info!("answer synthesis complete");
        answer
    }
}

/// `[i] source (Section: heading)`, numbered from 1.
pub fn citation_label(index: usize, snippet: &WireSnippet) -> String {
    let mut label = format!("[{}] {}", index, snippet.source);
    if let Some(section) = snippet.section.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(label, " (Section: {})", section);
    }
    label
}

pub fn build_user_prompt(question: &str, snippets: Option<&[WireSnippet]>) -> String {
    match snippets {
        Some(snippets) if !snippets.is_empty() => {
            let mut context = String::from("RETRIEVED CONTEXT:\n\n");
            for (i, snippet) in snippets.iter().enumerate() {
                let _ = write!(
                    context,
                    "{}\n{}\n\n",
                    citation_label(i + 1, snippet),
                    snippet.content
                );
            }
            format!(
                "User Question: {}\n\n{}\n\nBased on the provided context, please answer the user's question.",
                question, context
            )
        }
        _ => format!(
            "User Question: {}\n\nNo specific context was provided. Please answer based on general knowledge.",
            question
        ),
    }
}

/// Append a numbered source list when snippets were used and the reply
/// does not already carry one.
pub fn format_response(reply: String, snippets: Option<&[WireSnippet]>) -> String {
    let snippets = match snippets {
        Some(s) if !s.is_empty() => s,
        _ => return reply,
    };

    let mut response = reply;
    if !response.contains(SOURCES_MARKER) {
        let sources: Vec<String> = snippets
            .iter()
            .enumerate()
            .map(|(i, s)| citation_label(i + 1, s))
            .collect();
        let _ = write!(response, "\n\n---\n{}\n{}", SOURCES_MARKER, sources.join("\n"));
    }

    response.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedLlm;

    fn snippets() -> Vec<WireSnippet> {
        vec![
            WireSnippet {
                content: "Q3 revenue grew 8%.".to_string(),
                source: "q3.md".to_string(),
                section: Some("Revenue".to_string()),
            },
            WireSnippet {
                content: "Headcount flat.".to_string(),
                source: "hr.md".to_string(),
                section: None,
            },
        ]
    }

    #[test]
    fn test_citation_labels() {
        let s = snippets();
        assert_eq!(citation_label(1, &s[0]), "[1] q3.md (Section: Revenue)");
        assert_eq!(citation_label(2, &s[1]), "[2] hr.md");
    }

    #[test]
    fn test_prompt_with_context_numbers_snippets_in_order() {
        let s = snippets();
        let prompt = build_user_prompt("How did Q3 go?", Some(&s));
        assert!(prompt.starts_with("User Question: How did Q3 go?"));
        let first = prompt.find("[1] q3.md (Section: Revenue)\nQ3 revenue grew 8%.").unwrap();
        let second = prompt.find("[2] hr.md\nHeadcount flat.").unwrap();
        assert!(first < second);
        assert!(prompt.ends_with("please answer the user's question."));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_user_prompt("What is DNS?", None);
        assert!(prompt.contains("No specific context was provided"));
        assert_eq!(build_user_prompt("What is DNS?", Some(&[])), prompt);
    }

    #[test]
    fn test_format_appends_sources() {
        let s = snippets();
        let out = format_response("Revenue grew [1].  \n".to_string(), Some(&s));
        assert_eq!(
            out,
            "Revenue grew [1].  \n\n\n---\nSources Referenced:\n[1] q3.md (Section: Revenue)\n[2] hr.md"
        );
    }

    #[test]
    fn test_format_keeps_existing_sources() {
        let s = snippets();
        let reply = "Revenue grew [1].\n\n---\nSources Referenced:\n[1] q3.md\n".to_string();
        let out = format_response(reply, Some(&s));
        assert_eq!(out.matches(SOURCES_MARKER).count(), 1);
        assert!(out.ends_with("[1] q3.md"));
    }

    #[test]
    fn test_format_without_snippets_untouched() {
        let reply = "  DNS maps names to addresses.\n".to_string();
        assert_eq!(format_response(reply.clone(), None), reply);
    }

    #[tokio::test]
    async fn test_synthesize_uses_system_prompt() {
        let llm = Arc::new(ScriptedLlm::replying("Revenue grew [1]."));
        let s = snippets();
        let answer = Specialist::new(llm.clone()).synthesize("How did Q3 go?", Some(&s)).await;
        assert!(answer.starts_with("Revenue grew [1]."));
        assert!(answer.contains("Sources Referenced:"));
        let calls = llm.calls();
        assert_eq!(calls[0].0, SYNTHESIS_PROMPT);
        assert!(calls[0].1.contains("RETRIEVED CONTEXT:"));
    }

    #[tokio::test]
    async fn test_synthesize_reports_llm_error() {
        let llm = Arc::new(ScriptedLlm::failing("model not found"));
        let answer = Specialist::new(llm).synthesize("What is DNS?", None).await;
        assert_eq!(answer, "Error generating response: model not found");
    }
}
