use std::sync::LazyLock;

use regex::Regex;

use crate::parse::Element;

/// Configuration for content scoring
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Weight for positive class/ID patterns
    pub positive_weight: f64,
    /// Weight for negative class/ID patterns
    pub negative_weight: f64,
    /// Maximum paragraph score from character count
    pub max_char_density_score: f64,
    /// Characters per point for paragraph length scoring
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self { positive_weight: 25.0, negative_weight: -25.0, max_char_density_score: 3.0, chars_per_point: 100 }
    }
}

/// Positive patterns that suggest an element contains main content
pub(crate) static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|cikk|szoveg|tartalom)")
        .expect("positive pattern compiles")
});

/// Negative patterns that suggest an element does NOT contain main content
pub(crate) static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social|newsletter|hirdetes|ajanlo|kapcsolodo|hirlevel|megosztas)",
    )
    .expect("negative pattern compiles")
});

/// Calculate the base score for an element based on its tag name
///
/// - ARTICLE: +10, SECTION and MAIN: +8
/// - DIV: +5
/// - TD, BLOCKQUOTE: +3
/// - FORM and list/metadata elements: -3
/// - Headings, HEADER, FOOTER, NAV: -5
pub fn base_tag_score(element: &Element<'_>) -> f64 {
    match element.tag_name().as_str() {
        "article" => 10.0,
        "section" | "main" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "pre" => 0.0,
        "form" => -3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Calculate the class/ID weight adjustment for an element
///
/// Returns `positive_weight` if the id or a class name matches the positive
/// patterns, `negative_weight` if it matches only the negative ones. The id is
/// checked before the classes.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let names = element
        .attr("id")
        .into_iter()
        .chain(element.attr("class").into_iter().flat_map(str::split_whitespace));

    for name in names {
        if POSITIVE.is_match(name) {
            return config.positive_weight;
        }
        if NEGATIVE.is_match(name) {
            return config.negative_weight;
        }
    }

    0.0
}

/// Whether a class or id value marks an element as unlikely to hold content.
pub fn is_unlikely_name(name: &str, keep_positive: bool) -> bool {
    NEGATIVE.is_match(name) && !(keep_positive && POSITIVE.is_match(name))
}

/// Score contributed by one paragraph to its ancestors: one point, plus one
/// per comma, plus one per `chars_per_point` characters up to the cap.
pub fn paragraph_score(text: &str, config: &ScoreConfig) -> f64 {
    let commas = text.chars().filter(|c| matches!(c, ',' | '，')).count() as f64;
    let length_points =
        ((text.chars().count() / config.chars_per_point.max(1)) as f64).min(config.max_char_density_score);
    1.0 + commas + length_points
}

/// Calculate the link density of an element
///
/// Link density is the ratio of link text characters to total text characters.
/// Returns a value from 0.0 (no links) to 1.0 (all text is in links).
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = element.text().chars().filter(|c| !c.is_whitespace()).count();

    if text_length == 0 {
        return 0.0;
    }

    let link_text_length = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().filter(|c| !c.is_whitespace()).count())
        .sum::<usize>();

    (link_text_length as f64 / text_length as f64).min(1.0)
}
