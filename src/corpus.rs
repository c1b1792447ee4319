//! Knowledge base loader.
//!
//! Reads every `*.md` file directly inside the knowledge base directory
//! (no recursion) into an immutable [`Corpus`]. Documents are named by file
//! name and ordered by name so retrieval ties break deterministically.
//!
//! Loading never fails: a missing or unreadable directory produces an
//! empty corpus, and a file that cannot be read is skipped. Both cases are
//! logged as warnings.

use anyhow::Result;
use doc_analyst_core::models::{Corpus, Document};
use globset::{Glob, GlobMatcher};
use std::path::Path;
use walkdir::WalkDir;

/// File pattern for knowledge base documents.
pub const DOCUMENT_GLOB: &str = "*.md";

pub fn load_corpus(root: &Path) -> Corpus {
    if !root.is_dir() {
        tracing::warn!(path = %root.display(), "knowledge base path not found");
        return Corpus::empty();
    }

    let matcher = match document_matcher() {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "invalid document pattern");
            return Corpus::empty();
        }
    };

    let mut documents = Vec::new();

    let walker = WalkDir::new(root).min_depth(1).max_depth(1);
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %root.display(), error = %e, "failed to read knowledge base entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !matcher.is_match(&name) {
            continue;
        }

        match std::fs::read_to_string(entry.path()) {
            Ok(body) => documents.push(Document::new(name, body)),
            Err(e) => {
                tracing::warn!(file = %entry.path().display(), error = %e, "error loading document");
            }
        }
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!(
        count = documents.len(),
        path = %root.display(),
        "loaded documents from knowledge base"
    );

    Corpus::new(documents)
}

fn document_matcher() -> Result<GlobMatcher> {
    Ok(Glob::new(DOCUMENT_GLOB)?.compile_matcher())
}
