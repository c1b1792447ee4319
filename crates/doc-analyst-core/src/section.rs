//! Heading-based section splitter.
//!
//! Splits a markdown-style document into `(heading, body)` sections. A line
//! is a heading marker when it starts with `#`. Text before the first
//! heading belongs to a section named [`DEFAULT_HEADING`].
//!
//! # Algorithm
//!
//! 1. Scan the text line by line.
//! 2. On a heading marker, emit the accumulated body under the current
//!    heading if it is non-empty after trimming, then start a new section
//!    whose heading is the marker line with `#` characters and surrounding
//!    whitespace stripped.
//! 3. Append every other line (plus `\n`) to the accumulated body.
//! 4. After the scan, emit the final body if it is non-empty after trimming.
//!
//! A heading immediately followed by another heading produces no section:
//! empty bodies are dropped.
//!
//! # Example
//!
//! ```rust
//! use doc_analyst_core::section::split_sections;
//!
//! let sections = split_sections("# Intro\nQ3 revenue grew.\n# Outlook\nQ4 plans unclear.\n");
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].heading, "Intro");
//! assert_eq!(sections[1].body, "Q4 plans unclear.");
//! ```

use crate::models::Section;

/// Heading assigned to content that precedes the first heading marker.
pub const DEFAULT_HEADING: &str = "Introduction";

/// Split document text into ordered, non-empty sections.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut heading = DEFAULT_HEADING.to_string();
    let mut body = String::new();

    for line in text.split('\n') {
        if is_heading_marker(line) {
            push_section(&mut sections, &heading, &body);
            heading = heading_text(line);
            body.clear();
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }

    push_section(&mut sections, &heading, &body);
    sections
}

fn is_heading_marker(line: &str) -> bool {
    line.starts_with('#')
}

fn heading_text(line: &str) -> String {
    line.trim_matches('#').trim().to_string()
}

fn push_section(sections: &mut Vec<Section>, heading: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    sections.push(Section {
        heading: heading.to_string(),
        body: trimmed.to_string(),
    });
}
