//! `doc-analyst search`: run the retrieval engine locally and print ranked
//! results with scores.

use anyhow::{bail, Result};
use doc_analyst_core::models::Snippet;
use doc_analyst_core::search::search;

use crate::config::Config;
use crate::corpus::load_corpus;

pub fn run_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        bail!("--limit must be >= 1");
    }
    let results = search_corpus(config, query, limit);

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, snippet) in results.iter().enumerate() {
        print_result(i + 1, snippet);
    }

    Ok(())
}

/// Load the configured knowledge base and search it.
pub fn search_corpus(config: &Config, query: &str, limit: Option<usize>) -> Vec<Snippet> {
    let corpus = load_corpus(&config.knowledge_base.path);
    let mut params = config.retrieval.search_params();
    if let Some(limit) = limit {
        params.final_limit = limit;
    }
    search(&corpus, query, &params)
}

fn print_result(rank: usize, snippet: &Snippet) {
    let section = snippet.section.as_deref().unwrap_or("-");
    println!(
        "{}. [{}] {} (Section: {})",
        rank, snippet.score, snippet.source, section
    );
    for line in snippet.content.lines().take(3) {
        println!("    {}", line);
    }
    println!();
}
