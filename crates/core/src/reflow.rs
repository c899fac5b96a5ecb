//! Paragraph reflow: turns extracted text fragments into publishable units.
//!
//! Extraction backends hand over text in whatever pieces the page markup
//! happened to use. [`reflow`] normalizes those pieces, drops junk and stray
//! short fragments, glues prose back together until it reads as a complete
//! sentence, and keeps list items as standalone bullet lines.
//!
//! # Example
//!
//! ```rust
//! use rovat_core::reflow::{RawFragment, ReflowConfig, reflow};
//! use rovat_core::JunkClassifier;
//!
//! let fragments = vec![
//!     RawFragment::paragraph("Hirdetés"),
//!     RawFragment::paragraph("A jegybank kedden bejelentette, hogy az alapkamat"),
//!     RawFragment::paragraph("változatlanul 6,5 százalékon marad."),
//!     RawFragment::list_item("Infláció: 4,2 százalék"),
//! ];
//!
//! let paragraphs = reflow(fragments, JunkClassifier::bundled(), &ReflowConfig::default());
//! assert_eq!(paragraphs.len(), 2);
//! assert!(paragraphs[0].text.ends_with("százalékon marad."));
//! assert_eq!(paragraphs[1].text, "• Infláció: 4,2 százalék");
//! ```

use serde::Serialize;
use tracing::debug;

use crate::junk::JunkClassifier;
use crate::text::{self, BULLET};

/// Length thresholds of the reflow engine, in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflowConfig {
    /// Non-list fragments shorter than this are dropped unless they end in `:`.
    pub min_fragment_len: usize,
    /// A trailing unfinished buffer is kept only when longer than this.
    pub salvage_len: usize,
    /// A buffer longer than this counts as complete without terminal punctuation.
    pub long_paragraph_len: usize,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self { min_fragment_len: 35, salvage_len: 60, long_paragraph_len: 200 }
    }
}

/// Structural role of an extracted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    Paragraph,
    ListItem,
}

/// One piece of extracted text, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    pub text: String,
    pub role: FragmentRole,
}

impl RawFragment {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self { text: text.into(), role: FragmentRole::Paragraph }
    }

    /// A list item. The bullet marker is added here if the text lacks one.
    pub fn list_item(text: impl Into<String>) -> Self {
        let text = text.into();
        let text = if text::is_list_item(&text) { text } else { format!("{BULLET}{}", text.trim_start()) };
        Self { text, role: FragmentRole::ListItem }
    }
}

/// A finished unit of article text.
///
/// Never empty and never junk. Prose units end a sentence, are long, or were
/// salvaged at the end of the sequence; list items carry their marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanParagraph {
    pub text: String,
    pub is_list_item: bool,
}

impl CleanParagraph {
    pub fn prose(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_list_item: false }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_list_item: true }
    }

    /// Text without the list marker.
    pub fn body(&self) -> &str {
        if self.is_list_item { text::list_item_body(&self.text) } else { &self.text }
    }
}

/// Single forward pass over fragments, holding the unfinished prose buffer.
pub struct Reflow<'a> {
    junk: &'a JunkClassifier,
    config: &'a ReflowConfig,
    buffer: String,
    emitted: Vec<CleanParagraph>,
}

impl<'a> Reflow<'a> {
    pub fn new(junk: &'a JunkClassifier, config: &'a ReflowConfig) -> Self {
        Self { junk, config, buffer: String::new(), emitted: Vec::new() }
    }

    /// Feeds one fragment through the pre-filter and the merge step.
    pub fn push(&mut self, fragment: RawFragment) {
        let mut text = text::normalize(&fragment.text);
        let is_list = fragment.role == FragmentRole::ListItem || text::is_list_item(&text);
        if is_list && !text::is_list_item(&text) {
            text = format!("{BULLET}{text}");
        }

        if !self.keep(&text, is_list) {
            return;
        }

        if is_list {
            self.flush_buffer();
            self.emit(text, true);
            return;
        }

        if self.buffer.is_empty() {
            self.buffer = text;
        } else {
            self.buffer.push(' ');
            self.buffer.push_str(&text);
        }

        if text::is_complete_unit(&self.buffer, self.config.long_paragraph_len) {
            self.flush_buffer();
        }
    }

    /// Applies the end-of-sequence salvage rule and returns the emitted units.
    pub fn finish(mut self) -> Vec<CleanParagraph> {
        if !self.buffer.is_empty() {
            let remainder = std::mem::take(&mut self.buffer);
            if remainder.chars().count() > self.config.salvage_len {
                self.emit(remainder, false);
            } else {
                debug!(text = %remainder, "dropping short unfinished remainder");
            }
        }
        self.emitted
    }

    fn keep(&self, text: &str, is_list: bool) -> bool {
        if text.is_empty() {
            return false;
        }
        if is_list && text::list_item_body(text).is_empty() {
            return false;
        }
        if let Some(pattern) = self.junk_match(text, is_list) {
            debug!(text, pattern, "dropping junk fragment");
            return false;
        }
        is_list || text.ends_with(':') || text.chars().count() >= self.config.min_fragment_len
    }

    fn junk_match(&self, text: &str, is_list: bool) -> Option<&'a str> {
        let junk: &'a JunkClassifier = self.junk;
        junk.matching_pattern(text)
            .or_else(|| if is_list { junk.matching_pattern(text::list_item_body(text)) } else { None })
    }

    fn flush_buffer(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.emit(text, false);
        }
    }

    fn emit(&mut self, text: String, is_list_item: bool) {
        // Merging can assemble a junk line out of innocent fragments.
        if let Some(pattern) = self.junk_match(&text, is_list_item) {
            debug!(text = %text, pattern, "dropping merged junk paragraph");
            return;
        }
        self.emitted.push(CleanParagraph { text, is_list_item });
    }
}

/// Cleans and merges a fragment sequence.
///
/// Never fails; an empty or all-junk input yields an empty sequence.
pub fn reflow<I>(fragments: I, junk: &JunkClassifier, config: &ReflowConfig) -> Vec<CleanParagraph>
where
    I: IntoIterator<Item = RawFragment>,
{
    let mut state = Reflow::new(junk, config);
    for fragment in fragments {
        state.push(fragment);
    }
    state.finish()
}
