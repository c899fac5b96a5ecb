//! The weekly digest: an index of leads followed by the article bodies.

use serde::Serialize;

use crate::article::Article;

/// Display title for articles without one.
pub const UNTITLED: &str = "Cím nélkül";

/// Anchor of the digest index, target of the "back to intro" links.
pub const INTRO_ANCHOR: &str = "INTRO";

/// One article in a digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestEntry {
    /// 1-based position in the index
    pub index: usize,
    pub article: Article,
    pub lead: String,
    /// The article title, or [`UNTITLED`]
    pub display_title: String,
    /// Anchor of the article body section
    pub anchor: String,
}

/// A rovat's articles for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub rovat: String,
    pub week: String,
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    /// Builds the digest, picking each article's lead with `lead_cap`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rovat_core::{Article, Digest};
    ///
    /// let digest = Digest::new("Gazdaság", "2024. 2. hét", vec![Article::empty("https://pelda.hu/1")], 220);
    /// assert_eq!(digest.entries[0].display_title, "Cím nélkül");
    /// assert_eq!(digest.entries[0].anchor, "cikk_0");
    /// ```
    pub fn new(rovat: impl Into<String>, week: impl Into<String>, articles: Vec<Article>, lead_cap: usize) -> Self {
        let entries = articles
            .into_iter()
            .enumerate()
            .map(|(i, article)| {
                let display_title =
                    if article.title.trim().is_empty() { UNTITLED.to_string() } else { article.title.clone() };
                DigestEntry { index: i + 1, lead: article.lead(lead_cap), display_title, anchor: format!("cikk_{i}"), article }
            })
            .collect();

        Self { rovat: rovat.into(), week: week.into(), entries }
    }

    /// Header line of the digest.
    pub fn heading(&self) -> String {
        format!("Weekly News | {}", self.rovat)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose extraction produced no body text.
    pub fn empty_articles(&self) -> usize {
        self.entries.iter().filter(|e| e.article.is_empty()).count()
    }
}
