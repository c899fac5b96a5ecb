//! The per-URL extraction result.

use serde::Serialize;

use crate::lead::pick_lead_with_cap;
use crate::reflow::CleanParagraph;

/// Title, source URL and cleaned body of one article.
///
/// An article with an empty title and no paragraphs is the degenerate result
/// of a failed extraction, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Article {
    /// Extracted title; empty when no strategy or metadata supplied one.
    pub title: String,
    /// The URL the article was requested for.
    pub url: String,
    /// Cleaned paragraphs in document order.
    pub paragraphs: Vec<CleanParagraph>,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>, paragraphs: Vec<CleanParagraph>) -> Self {
        Self { title: title.into(), url: url.into(), paragraphs }
    }

    /// The stub produced when extraction fails.
    pub fn empty(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }

    /// Whether no body text was extracted.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// One or two sentence lead, capped at `cap` characters for the second
    /// sentence to be appended.
    pub fn lead(&self, cap: usize) -> String {
        pick_lead_with_cap(&self.paragraphs, cap)
    }

    /// Host of the source URL, or the URL itself when it has no host.
    pub fn source_host(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.url.clone())
    }

    /// Number of whitespace-separated words in the body.
    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.body().split_whitespace().count()).sum()
    }
}
