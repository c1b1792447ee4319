//! Retrieval engine over an in-memory [`Corpus`].
//!
//! # Algorithm
//!
//! 1. Tokenize the query (lowercase, whitespace split).
//! 2. Split every document into sections.
//! 3. Score each section body; drop sections that score 0.
//! 4. Stable sort by score (desc). Ties keep discovery order, i.e. corpus
//!    order then section order.
//! 5. Truncate to `final_limit`.
//!
//! The engine holds no state between calls.

use crate::models::{Corpus, Snippet};
use crate::score::{score, tokenize, ScoreParams};
use crate::section::split_sections;

/// Default number of snippets returned per query.
pub const DEFAULT_FINAL_LIMIT: usize = 5;

/// Retrieval tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum snippets to return.
    pub final_limit: usize,
    pub score: ScoreParams,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            final_limit: DEFAULT_FINAL_LIMIT,
            score: ScoreParams::default(),
        }
    }
}

/// Search `corpus` for sections relevant to `query`.
///
/// An empty or whitespace-only query yields no terms and therefore no
/// results.
pub fn search(corpus: &Corpus, query: &str, params: &SearchParams) -> Vec<Snippet> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut snippets: Vec<Snippet> = Vec::new();

    for doc in corpus.documents() {
        for section in split_sections(&doc.body) {
            let s = score(&terms, &section.body, &params.score);
            if s == 0 {
                continue;
            }
            snippets.push(Snippet {
                content: section.body,
                source: doc.name.clone(),
                section: Some(section.heading),
                score: s,
            });
        }
    }

    // `sort_by` is stable, which keeps discovery order among equal scores.
    snippets.sort_by(|a, b| b.score.cmp(&a.score));
    snippets.truncate(params.final_limit);
    snippets
}
