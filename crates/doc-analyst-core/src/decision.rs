//! Retrieval decision payload and its validating parser.
//!
//! The decision-maker replies with structured text shaped like
//! `{"use_tool": bool, "query": "...", "reason": "..."}`. Nothing past
//! [`parse_decision`] sees the raw text: callers get either a valid
//! [`Decision`] or a [`DecisionError`] describing what was wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason recorded on the fail-open default decision.
pub const FALLBACK_REASON: &str = "Error in decision making, defaulting to tool use";

/// Whether a question needs the knowledge base, and what to search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub use_tool: bool,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub reason: String,
}

impl Decision {
    /// The fail-open default: retrieve using the original question.
    pub fn fallback(question: &str) -> Self {
        Self {
            use_tool: true,
            query: question.to_string(),
            reason: FALLBACK_REASON.to_string(),
        }
    }
}

/// Why a decision could not be obtained.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The decision-maker could not be reached or returned an error.
    #[error("decision call failed: {0}")]
    Upstream(String),
    /// The reply was not a JSON object of the expected shape.
    #[error("malformed decision payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The reply parsed but is not usable.
    #[error("invalid decision: {0}")]
    Invalid(String),
}

/// Parse and validate a decision reply.
///
/// Surrounding whitespace is ignored. `use_tool` is required; `query` and
/// `reason` default to empty strings. A decision that asks for the tool
/// without a query is rejected.
pub fn parse_decision(text: &str) -> Result<Decision, DecisionError> {
    let decision: Decision = serde_json::from_str(text.trim())?;

    if decision.use_tool && decision.query.trim().is_empty() {
        return Err(DecisionError::Invalid(
            "use_tool is true but query is empty".to_string(),
        ));
    }

    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_decision() {
        let d = parse_decision(
            r#"{"use_tool": true, "query": "Q3 performance metrics Q2 comparison", "reason": "Needs internal performance data"}"#,
        )
        .unwrap();
        assert!(d.use_tool);
        assert_eq!(d.query, "Q3 performance metrics Q2 comparison");
        assert_eq!(d.reason, "Needs internal performance data");
    }

    #[test]
    fn test_parse_no_tool_with_whitespace() {
        let d = parse_decision(
            "\n  {\"use_tool\": false, \"query\": \"\", \"reason\": \"General knowledge question\"}  \n",
        )
        .unwrap();
        assert!(!d.use_tool);
        assert!(d.query.is_empty());
    }

    #[test]
    fn test_optional_fields_default() {
        let d = parse_decision(r#"{"use_tool": false}"#).unwrap();
        assert_eq!(d.query, "");
        assert_eq!(d.reason, "");
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_decision("Sure! I think we should search the docs.").unwrap_err();
        assert!(matches!(err, DecisionError::Malformed(_)));
    }

    #[test]
    fn test_missing_use_tool_is_malformed() {
        let err = parse_decision(r#"{"query": "roadmap"}"#).unwrap_err();
        assert!(matches!(err, DecisionError::Malformed(_)));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err = parse_decision(r#"{"use_tool": "yes", "query": "roadmap"}"#).unwrap_err();
        assert!(matches!(err, DecisionError::Malformed(_)));
    }

    #[test]
    fn test_tool_without_query_is_invalid() {
        let err = parse_decision(r#"{"use_tool": true, "query": "  "}"#).unwrap_err();
        assert!(matches!(err, DecisionError::Invalid(_)));
    }

    #[test]
    fn test_fallback_uses_question() {
        let d = Decision::fallback("How did Q3 go?");
        assert!(d.use_tool);
        assert_eq!(d.query, "How did Q3 go?");
        assert_eq!(d.reason, FALLBACK_REASON);
    }
}
