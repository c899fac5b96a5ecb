//! The ordered extraction strategies.
//!
//! Each strategy turns a fetched [`Page`] into cleaned paragraphs, or into an
//! error that the chain treats as "nothing here". Strategies share the
//! [`Cleaner`] so every backend goes through the same reflow rules.

use std::sync::Arc;

use tracing::debug;

use crate::generic::{GenericConfig, extract_blocks_excluding, extract_text, text_to_fragments};
use crate::junk::JunkClassifier;
use crate::parse::{Document, Element};
use crate::preprocess::PreprocessConfig;
use crate::readability::{ReadabilityConfig, collect_fragments, main_content};
use crate::reflow::{CleanParagraph, RawFragment, ReflowConfig, reflow};
use crate::siteconfig::{SiteRule, SiteRules};
use crate::{Result, RovatError};

/// A fetched page handed to the strategies.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    /// Lowercase host of `url`; empty for URLs without one
    pub host: String,
    pub html: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        let host = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default();
        Self { url, host, html: html.into() }
    }
}

/// What a strategy produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyOutput {
    pub title: Option<String>,
    pub paragraphs: Vec<CleanParagraph>,
}

/// Junk patterns plus reflow thresholds, shared by all strategies.
#[derive(Debug, Clone)]
pub struct Cleaner {
    pub junk: Arc<JunkClassifier>,
    pub reflow: ReflowConfig,
}

impl Cleaner {
    pub fn new(junk: Arc<JunkClassifier>, reflow: ReflowConfig) -> Self {
        Self { junk, reflow }
    }

    pub fn clean<I: IntoIterator<Item = RawFragment>>(&self, fragments: I) -> Vec<CleanParagraph> {
        reflow(fragments, &self.junk, &self.reflow)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self { junk: Arc::new(JunkClassifier::default()), reflow: ReflowConfig::default() }
    }
}

/// One backend of the extraction chain.
///
/// An `Ok` with no paragraphs and an `Err` both mean the chain moves on.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, page: &Page, cleaner: &Cleaner) -> Result<StrategyOutput>;
}

/// Readability-style main-content detection.
#[derive(Debug, Clone, Default)]
pub struct ReaderMode {
    pub config: ReadabilityConfig,
}

impl ReaderMode {
    pub fn new(config: ReadabilityConfig) -> Self {
        Self { config }
    }
}

impl ExtractionStrategy for ReaderMode {
    fn name(&self) -> &'static str {
        "reader-mode"
    }

    fn attempt(&self, page: &Page, cleaner: &Cleaner) -> Result<StrategyOutput> {
        let doc = Document::parse_with_preprocessing(&page.html, &self.config.preprocess);
        let content = main_content(&doc, &self.config)?;
        let fragments = collect_fragments(&content, &self.config);
        debug!(fragments = fragments.len(), score = content.top_score, "reader-mode candidate");

        Ok(StrategyOutput { title: doc.short_title(), paragraphs: cleaner.clean(fragments) })
    }
}

/// Hand-tuned selectors for known hosts.
#[derive(Debug, Clone)]
pub struct DomainRules {
    rules: Arc<SiteRules>,
    generic: GenericConfig,
}

impl DomainRules {
    pub fn new(rules: Arc<SiteRules>, generic: GenericConfig) -> Self {
        Self { rules, generic }
    }

    fn blocks(&self, doc: &Document, rule: &SiteRule) -> Result<Vec<String>> {
        let Some(body) = first_match(doc, &rule.body)? else {
            return Err(RovatError::NoContent);
        };

        let mut excluded: Vec<Element<'_>> = Vec::new();
        for selector in &rule.strip {
            excluded.extend(body.select(selector)?);
        }

        Ok(extract_blocks_excluding(&body, &self.generic, &excluded))
    }

    fn lead(&self, doc: &Document, rule: &SiteRule) -> Result<Option<String>> {
        if let Some(lead) = first_match(doc, &rule.lead)? {
            let text = lead.normalized_text();
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
        Ok(rule
            .lead_meta
            .iter()
            .find_map(|name| doc.get_meta_content(name))
            .or_else(|| doc.extract_description()))
    }

    fn title(&self, doc: &Document, rule: &SiteRule) -> Result<Option<String>> {
        Ok(first_match(doc, &rule.title)?
            .map(|el| el.normalized_text())
            .filter(|title| !title.is_empty()))
    }
}

impl ExtractionStrategy for DomainRules {
    fn name(&self) -> &'static str {
        "domain-rules"
    }

    fn attempt(&self, page: &Page, cleaner: &Cleaner) -> Result<StrategyOutput> {
        let Some(rule) = self.rules.for_host(&page.host) else {
            return Ok(StrategyOutput::default());
        };

        let doc = Document::parse(&page.html);
        let mut blocks = self.blocks(&doc, rule)?;

        if let Some(lead) = self.lead(&doc, rule)?
            && blocks.first().is_none_or(|first| *first != lead)
        {
            blocks.insert(0, lead);
        }

        let title = self.title(&doc, rule)?.or_else(|| doc.short_title());
        let fragments = blocks.into_iter().map(RawFragment::paragraph);
        Ok(StrategyOutput { title, paragraphs: cleaner.clean(fragments) })
    }
}

fn first_match<'a>(doc: &'a Document, selectors: &[String]) -> Result<Option<Element<'a>>> {
    for selector in selectors {
        if let Some(el) = doc.select_first(selector)? {
            return Ok(Some(el));
        }
    }
    Ok(None)
}

/// Recall-oriented text extraction over the whole page.
#[derive(Debug, Clone, Default)]
pub struct GenericFallback {
    pub config: GenericConfig,
}

impl GenericFallback {
    pub fn new(config: GenericConfig) -> Self {
        Self { config }
    }
}

impl ExtractionStrategy for GenericFallback {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn attempt(&self, page: &Page, cleaner: &Cleaner) -> Result<StrategyOutput> {
        let doc = Document::parse_with_preprocessing(&page.html, &PreprocessConfig::recall());
        let text = extract_text(&doc, &self.config);
        if text.is_empty() {
            return Err(RovatError::NoContent);
        }
        Ok(StrategyOutput { title: None, paragraphs: cleaner.clean(text_to_fragments(&text)) })
    }
}

/// The default chain: reader mode, then domain rules, then the generic fallback.
pub fn default_chain(
    readability: ReadabilityConfig, rules: Arc<SiteRules>, generic: GenericConfig,
) -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(ReaderMode::new(readability)),
        Box::new(DomainRules::new(rules, generic.clone())),
        Box::new(GenericFallback::new(generic)),
    ]
}
