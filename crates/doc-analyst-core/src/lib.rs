//! # doc-analyst core
//!
//! Pure retrieval and routing logic for doc-analyst: data models, the
//! heading-based section splitter, the keyword relevance scorer, the
//! retrieval engine over an in-memory corpus, and the decision payload
//! parser.
//!
//! This crate performs no filesystem or network I/O and has no async
//! runtime dependency. The application crate loads documents, talks to
//! language models, and serves the tool protocol on top of it.

pub mod decision;
pub mod models;
pub mod score;
pub mod search;
pub mod section;

pub use decision::{parse_decision, Decision, DecisionError};
pub use models::{Corpus, Document, Section, Snippet};
pub use score::{BonusMode, ScoreParams};
pub use search::{search, SearchParams};
