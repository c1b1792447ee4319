//! # doc-analyst CLI
//!
//! ## Usage
//!
//! ```bash
//! doc-analyst --config ./config/doc-analyst.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `doc-analyst serve` | Start the knowledge base tool server |
//! | `doc-analyst ask --query "<question>"` | Answer a single question |
//! | `doc-analyst ask --interactive` | Interactive question loop |
//! | `doc-analyst search "<query>"` | Print ranked snippets for a query |
//! | `doc-analyst tools` | Print the tool listing as JSON |
//!
//! ## Examples
//!
//! ```bash
//! # Serve ./knowledge_base on localhost:8000
//! doc-analyst serve
//!
//! # Ask through the running tool server
//! doc-analyst ask -q "How does Q3 performance compare to Q2?"
//!
//! # Ask without a tool server
//! doc-analyst ask --local -q "What is on the Q4 roadmap?"
//! ```

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use doc_analyst::config::{self, Config};
use doc_analyst::orchestrator::Orchestrator;
use doc_analyst::protocol::ToolsListResponse;
use doc_analyst::search;
use doc_analyst::server;
use doc_analyst::tools::ToolRegistry;
use doc_analyst_core::models::Corpus;

/// doc-analyst: question answering over a local markdown knowledge base.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means built-in defaults; environment variables such
/// as `KNOWLEDGE_BASE_PATH` and `MODEL_NAME` override either.
#[derive(Parser)]
#[command(
    name = "doc-analyst",
    about = "Question answering over a local markdown knowledge base",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/doc-analyst.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the knowledge base tool server.
    ///
    /// Loads `*.md` files from `[knowledge_base].path` and serves the
    /// tool protocol on `[server].bind`.
    Serve,

    /// Answer questions using the manager and specialist.
    ///
    /// Without `--query`, reads a question from piped stdin or starts the
    /// interactive loop.
    Ask {
        /// Single question to process (non-interactive mode).
        #[arg(long, short)]
        query: Option<String>,

        /// Run in interactive mode.
        #[arg(long, short)]
        interactive: bool,

        /// Search the knowledge base in-process instead of calling the
        /// tool server.
        #[arg(long)]
        local: bool,
    },

    /// Search the knowledge base and print ranked snippets with scores.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the tool listing served by `serve`.
    Tools,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    init_logging(&cfg);

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ask {
            query,
            interactive,
            local,
        } => {
            let orchestrator = Orchestrator::from_config(&cfg, local)?;
            match query {
                Some(q) => {
                    let answer = orchestrator.process_question(&q).await;
                    println!("{}", answer);
                }
                None if !interactive && !atty::is(atty::Stream::Stdin) => {
                    let mut question = String::new();
                    std::io::stdin().read_to_string(&mut question)?;
                    if question.trim().is_empty() {
                        anyhow::bail!("No question provided on stdin");
                    }
                    let answer = orchestrator.process_question(question.trim()).await;
                    println!("{}", answer);
                }
                None => {
                    if !interactive {
                        println!("No query provided. Starting interactive mode...");
                    }
                    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                    orchestrator.interactive(stdin, std::io::stdout()).await?;
                }
            }
        }
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &query, limit)?;
        }
        Commands::Tools => {
            let corpus = Arc::new(Corpus::empty());
            let tools = ToolRegistry::with_builtins(corpus, cfg.retrieval.search_params());
            let listing = ToolsListResponse {
                tools: tools.list(),
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }

    Ok(())
}
