//! Reader-mode main-content detection.
//!
//! Paragraphs vote for the containers that hold them: each `<p>`/`<pre>` with
//! enough text adds its [`paragraph_score`] to its parent and half of it to its
//! grandparent. Containers start from their tag and class/id weight, and the
//! total is scaled down by link density. The best container, together with
//! qualifying siblings, is the main content.

use std::collections::HashMap;

use crate::parse::{Document, Element};
use crate::preprocess::PreprocessConfig;
use crate::reflow::RawFragment;
use crate::scoring::{ScoreConfig, base_tag_score, class_id_weight, link_density, paragraph_score};
use crate::{Result, RovatError};

/// Tags that may hold the main content
const CANDIDATE_TAGS: &[&str] = &["div", "article", "section", "main", "td", "blockquote"];

/// Configuration for reader-mode extraction
#[derive(Debug, Clone)]
pub struct ReadabilityConfig {
    /// Minimum score the best candidate must reach
    pub min_score: f64,
    /// Paragraphs shorter than this many characters cast no vote
    pub min_paragraph_len: usize,
    /// Sibling score threshold (multiplier of top score)
    pub sibling_threshold: f64,
    /// List items with a higher link density are treated as navigation
    pub max_list_link_density: f64,
    /// Tag and class/id weights
    pub score: ScoreConfig,
    /// Cleanup applied before scoring
    pub preprocess: PreprocessConfig,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            min_score: 20.0,
            min_paragraph_len: 25,
            sibling_threshold: 0.2,
            max_list_link_density: 0.5,
            score: ScoreConfig::default(),
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// The detected main content of a page.
#[derive(Debug, Clone)]
pub struct MainContent<'a> {
    /// Best scoring container
    pub top: Element<'a>,
    /// Score of `top` after the link-density penalty
    pub top_score: f64,
    /// `top` plus included siblings, in document order
    pub blocks: Vec<Element<'a>>,
}

/// Finds the main-content container of a (preprocessed) document.
///
/// # Errors
///
/// [`RovatError::NoContent`] when no paragraph casts a vote, and
/// [`RovatError::NotReadable`] when the best candidate scores below
/// `min_score`.
pub fn main_content<'a>(doc: &'a Document, config: &ReadabilityConfig) -> Result<MainContent<'a>> {
    let mut candidates: Vec<(Element<'a>, f64)> = Vec::new();
    let mut index = HashMap::new();

    for paragraph in doc.select("p, pre")? {
        let text = paragraph.normalized_text();
        if text.chars().count() < config.min_paragraph_len {
            continue;
        }
        let score = paragraph_score(&text, &config.score);

        let parent = paragraph.parent();
        let grandparent = parent.and_then(|p| p.parent());

        for (ancestor, share) in [(parent, score), (grandparent, score / 2.0)] {
            let Some(ancestor) = ancestor.filter(is_candidate) else {
                continue;
            };
            let slot = *index.entry(ancestor.inner().id()).or_insert_with(|| {
                candidates.push((ancestor, base_tag_score(&ancestor) + class_id_weight(&ancestor, &config.score)));
                candidates.len() - 1
            });
            candidates[slot].1 += share;
        }
    }

    for (element, score) in candidates.iter_mut() {
        *score *= 1.0 - link_density(element);
    }

    let (top, top_score) = candidates
        .iter()
        .copied()
        .fold(None::<(Element<'a>, f64)>, |best, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        })
        .ok_or(RovatError::NoContent)?;

    if top_score < config.min_score {
        return Err(RovatError::NotReadable { score: top_score, threshold: config.min_score });
    }

    let scores: HashMap<_, f64> = candidates.iter().map(|(el, score)| (el.inner().id(), *score)).collect();
    let sibling_floor = top_score * config.sibling_threshold;

    // Siblings qualify as candidates near the top score, or as long,
    // link-light paragraphs.
    let blocks = match top.parent() {
        Some(parent) => parent
            .children()
            .filter(|sibling| {
                if sibling.same_node(&top) {
                    return true;
                }
                if scores.get(&sibling.inner().id()).is_some_and(|score| *score >= sibling_floor) {
                    return true;
                }
                sibling.is("p") && sibling.normalized_text().chars().count() > 80 && link_density(sibling) < 0.25
            })
            .collect(),
        None => vec![top],
    };

    Ok(MainContent { top, top_score, blocks })
}

fn is_candidate(element: &Element<'_>) -> bool {
    CANDIDATE_TAGS.iter().any(|tag| element.is(tag))
}

/// Walks the main content for paragraph and list-item text, in document order.
///
/// List items get the bullet marker; an item that is mostly a link is
/// dropped as related-content navigation. Paragraphs nested inside a list
/// item are covered by the item's own text.
pub fn collect_fragments(content: &MainContent<'_>, config: &ReadabilityConfig) -> Vec<RawFragment> {
    let mut fragments = Vec::new();

    for block in &content.blocks {
        for element in block.descendants() {
            let is_item = element.is("li");
            if !is_item && !element.is("p") {
                continue;
            }
            if element.has_ancestor_within("li", block) {
                continue;
            }
            if is_item && link_density(&element) > config.max_list_link_density {
                continue;
            }

            let text = element.normalized_text();
            if text.is_empty() {
                continue;
            }
            fragments.push(if is_item { RawFragment::list_item(text) } else { RawFragment::paragraph(text) });
        }
    }

    fragments
}
