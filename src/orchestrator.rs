//! End-to-end question answering: manager routing, then synthesis.
//!
//! ```text
//! question ─▶ DecisionPolicy ─▶ (RetrievalBackend) ─▶ Specialist ─▶ answer
//! ```
//!
//! Every question produces visible text. A failure anywhere in the flow is
//! reported as an apology carrying the cause.

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::Config;
use crate::corpus::load_corpus;
use crate::llm::{create_client, LlmClient};
use crate::manager::Manager;
use crate::retrieval::{LocalRetriever, RemoteToolClient, RetrievalBackend};
use crate::specialist::Specialist;
use crate::tools::ToolRegistry;

pub struct Orchestrator {
    manager: Manager,
    specialist: Specialist,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, backend: Arc<dyn RetrievalBackend>) -> Self {
        Self {
            manager: Manager::new(llm.clone(), backend),
            specialist: Specialist::new(llm),
        }
    }

    /// Build from config. With `local`, the knowledge base is loaded
    /// in-process; otherwise retrieval goes through the tool server at
    /// `[server].url`.
    pub fn from_config(config: &Config, local: bool) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::from(create_client(&config.llm)?);

        let backend: Arc<dyn RetrievalBackend> = if local {
            let corpus = Arc::new(load_corpus(&config.knowledge_base.path));
            let tools = ToolRegistry::with_builtins(corpus, config.retrieval.search_params());
            Arc::new(LocalRetriever::new(Arc::new(tools)))
        } else {
            Arc::new(RemoteToolClient::new(
                &config.server.base_url(),
                config.server.timeout_secs,
            )?)
        };

        tracing::info!(model = llm.model_name(), local, "orchestrator initialized");
        Ok(Self::new(llm, backend))
    }

    /// Answer a question. Never fails.
    pub async fn process_question(&self, question: &str) -> String {
        let start = Instant::now();
        tracing::info!(question, "processing question");

        match self.answer(question).await {
            Ok(answer) => {
                tracing::info!(
                    elapsed_secs = start.elapsed().as_secs_f64(),
                    "question processed"
                );
                answer
            }
            Err(e) => {
                let message = format!("Error processing question: {}", e);
                tracing::error!("{}", message);
                format!(
                    "I apologize, but I encountered an error while processing your question: {}",
                    message
                )
            }
        }
    }

    async fn answer(&self, question: &str) -> Result<String> {
        let routing = self.manager.route(question).await?;

        match routing.snippets() {
            Some(snippets) => {
                tracing::info!(count = snippets.len(), "using retrieved context");
                Ok(self.specialist.synthesize(question, Some(snippets)).await)
            }
            None => {
                tracing::info!("proceeding without retrieved context");
                Ok(self.specialist.synthesize(question, None).await)
            }
        }
    }

    /// Read questions from `input` until `quit`, `exit`, `q`, or end of
    /// input, writing answers to `output`.
    pub async fn interactive<R, W>(&self, mut input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(output, "Multi-Agent Document Analysis System")?;
        writeln!(output, "Type 'quit' or 'exit' to end the session")?;
        writeln!(output, "{}", "-".repeat(50))?;

        loop {
            write!(output, "\nYour question: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                writeln!(output, "\nGoodbye!")?;
                break;
            }

            let question = line.trim();
            if matches!(question.to_lowercase().as_str(), "quit" | "exit" | "q") {
                writeln!(output, "Goodbye!")?;
                break;
            }
            if question.is_empty() {
                writeln!(output, "Please enter a question.")?;
                continue;
            }

            writeln!(output, "\nProcessing...")?;
            let answer = self.process_question(question).await;
            writeln!(output, "\nAnswer:\n{}", answer)?;
            writeln!(output, "{}", "-".repeat(50))?;
        }

        Ok(())
    }
}
