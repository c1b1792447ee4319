//! Core data models shared by the retrieval engine and the application crate.
//!
//! Documents are loaded once and never mutated. Sections and snippets are
//! derived per retrieval call and are never cached.

use serde::Serialize;

/// A named raw-text document from the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name of the document (e.g. `"q3_report.md"`).
    pub name: String,
    /// Full raw text content.
    pub body: String,
}

impl Document {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// An immutable, ordered collection of documents.
///
/// Built once at startup and shared by reference (usually behind an `Arc`)
/// with every component that searches it. Iteration order is the order the
/// documents were supplied in, which is also the tie-break order for
/// equally scored snippets.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// A corpus with no documents. Every search against it returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A heading-delimited slice of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text with `#` markers and surrounding whitespace removed.
    pub heading: String,
    /// Trimmed body text. Never empty.
    pub body: String,
}

/// A ranked, attributable excerpt returned by the retrieval engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Trimmed section body.
    pub content: String,
    /// Name of the document the section came from.
    pub source: String,
    /// Heading of the section, if any.
    pub section: Option<String>,
    /// Keyword relevance score. Always greater than zero.
    pub score: u64,
}
