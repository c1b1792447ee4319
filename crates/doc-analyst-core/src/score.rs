//! Keyword relevance scoring.
//!
//! A section's score is the sum, over every query term, of the number of
//! non-overlapping occurrences of that term in the lowercased section text,
//! plus a flat bonus when the whole query appears verbatim.
//!
//! Terms are not deduplicated: a term repeated in the query is counted
//! once per repetition.

use serde::Deserialize;

/// Default flat bonus for an exact phrase match.
pub const DEFAULT_PHRASE_BONUS: u64 = 5;

/// How often the exact phrase bonus is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusMode {
    /// Once per scoring call.
    #[default]
    PerCall,
    /// Once per query term, so an `n`-term query matching the phrase earns
    /// `n` bonuses.
    PerTerm,
}

impl BonusMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BonusMode::PerCall => "per_call",
            BonusMode::PerTerm => "per_term",
        }
    }
}

/// Tuning knobs for [`score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreParams {
    pub phrase_bonus: u64,
    pub bonus_mode: BonusMode,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            phrase_bonus: DEFAULT_PHRASE_BONUS,
            bonus_mode: BonusMode::PerCall,
        }
    }
}

/// Lowercase a query and split it on whitespace.
///
/// Order and duplicates are preserved.
pub fn tokenize(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Score `content` against pre-tokenized query terms.
///
/// Returns 0 for an empty term list; the empty phrase never earns a bonus.
pub fn score(terms: &[String], content: &str, params: &ScoreParams) -> u64 {
    if terms.is_empty() {
        return 0;
    }

    let content = content.to_lowercase();
    let phrase_hit = content.contains(&terms.join(" "));

    let mut total: u64 = terms
        .iter()
        .map(|term| content.matches(term.as_str()).count() as u64)
        .sum();

    if phrase_hit {
        let bonus = match params.bonus_mode {
            BonusMode::PerCall => params.phrase_bonus,
            BonusMode::PerTerm => params.phrase_bonus.saturating_mul(terms.len() as u64),
        };
        total = total.saturating_add(bonus);
    }

    total
}
