use crate::error::{Result, RovatError};
use crate::parse::parse_selector;

/// A single line of a site rule file
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// CSS selector of an article body container
    Body(String),
    /// CSS selector of the lead/intro element
    Lead(String),
    /// Meta tag (`name` or `property`) holding the lead
    LeadMeta(String),
    /// CSS selector of the article title
    Title(String),
    /// CSS selector of elements to skip inside the body
    Strip(String),
    /// Sample URL the rule was written against
    TestUrl(String),
}

/// Extraction rule for one host suffix
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteRule {
    /// Body selectors, tried in order; the first that matches wins
    pub body: Vec<String>,
    /// Lead selectors, tried in order
    pub lead: Vec<String>,
    /// Meta names consulted for the lead when no lead selector matches
    pub lead_meta: Vec<String>,
    /// Title selectors, tried in order
    pub title: Vec<String>,
    /// Strip selectors
    pub strip: Vec<String>,
    /// Test URLs
    pub test_urls: Vec<String>,
}

impl SiteRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directive to this rule
    pub fn add_directive(&mut self, directive: Directive) {
        match directive {
            Directive::Body(selector) => self.body.push(selector),
            Directive::Lead(selector) => self.lead.push(selector),
            Directive::LeadMeta(name) => self.lead_meta.push(name),
            Directive::Title(selector) => self.title.push(selector),
            Directive::Strip(selector) => self.strip.push(selector),
            Directive::TestUrl(url) => self.test_urls.push(url),
        }
    }

    /// Whether the rule can drive an extraction on its own
    pub fn has_extraction_config(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
            && self.lead.is_empty()
            && self.lead_meta.is_empty()
            && self.title.is_empty()
            && self.strip.is_empty()
    }
}

/// Parse a `key: value` directive line
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(RovatError::SiteConfigError("Empty or comment line".to_string()));
    }

    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| RovatError::SiteConfigError(format!("Invalid directive format: {line}")))?;
    let key = key.trim();
    let value = value.trim();

    if value.is_empty() {
        return Err(RovatError::SiteConfigError(format!("Missing value for {key}")));
    }

    match key {
        "body" => selector(value).map(Directive::Body),
        "lead" => selector(value).map(Directive::Lead),
        "title" => selector(value).map(Directive::Title),
        "strip" => selector(value).map(Directive::Strip),
        "lead_meta" => Ok(Directive::LeadMeta(value.to_string())),
        "test_url" => Ok(Directive::TestUrl(value.to_string())),
        _ => Err(RovatError::SiteConfigError(format!("Unknown directive: {key}"))),
    }
}

/// Validates a CSS selector so broken rules fail at load time.
fn selector(value: &str) -> Result<String> {
    parse_selector(value)?;
    Ok(value.to_string())
}
