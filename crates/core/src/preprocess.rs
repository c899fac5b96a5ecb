use std::sync::LazyLock;

use regex::Regex;

use crate::scoring::is_unlikely_name;

/// Tags whose whole subtree never carries article text.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas", "form", "template"];

/// Tags never unwrapped by the unlikely-candidate pass.
const PROTECTED_TAGS: &[&str] = &["html", "head", "body", "article", "main"];

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("hidden style pattern compiles")
});

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Whether to remove script, style, iframe, svg, canvas and form subtrees
    pub remove_non_content: bool,
    /// Whether to remove HTML comments
    pub remove_comments: bool,
    /// Whether to remove `hidden`, `aria-hidden="true"` and `display:none` elements
    pub remove_hidden: bool,
    /// Whether to unwrap elements whose class or id looks like boilerplate
    pub remove_unlikely: bool,
    /// Whether to keep positive candidates even if they match unlikely patterns
    pub keep_positive: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            remove_non_content: true,
            remove_comments: true,
            remove_hidden: true,
            remove_unlikely: true,
            keep_positive: true,
        }
    }
}

impl PreprocessConfig {
    /// Cleanup that keeps every visible element in place, for extractors that
    /// favour recall over precision.
    pub fn recall() -> Self {
        Self { remove_unlikely: false, ..Self::default() }
    }
}

/// Preprocess HTML by removing non-content elements in a single streaming
/// pass. On a rewriter error the input is returned unchanged.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut output: Vec<u8> = Vec::with_capacity(html.len());

    let document_content_handlers = if config.remove_comments {
        vec![lol_html::doc_comments!(|c| {
            c.remove();
            Ok(())
        })]
    } else {
        vec![]
    };

    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("*", |el| {
                let tag = el.tag_name().to_ascii_lowercase();

                if config.remove_non_content && NON_CONTENT_TAGS.contains(&tag.as_str()) {
                    el.remove();
                    return Ok(());
                }

                if config.remove_hidden
                    && (el.has_attribute("hidden")
                        || el.get_attribute("aria-hidden").is_some_and(|v| v.eq_ignore_ascii_case("true"))
                        || el.get_attribute("style").is_some_and(|s| HIDDEN_STYLE.is_match(&s)))
                {
                    el.remove();
                    return Ok(());
                }

                if config.remove_unlikely && !PROTECTED_TAGS.contains(&tag.as_str()) {
                    let unlikely = el.get_attribute("id").is_some_and(|id| is_unlikely_name(&id, config.keep_positive))
                        || el.get_attribute("class").is_some_and(|class| {
                            class.split_whitespace().any(|name| is_unlikely_name(name, config.keep_positive))
                        });
                    if unlikely {
                        el.remove_and_keep_content();
                    }
                }

                Ok(())
            })],
            document_content_handlers,
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    match String::from_utf8(output) {
        Ok(processed) if !processed.is_empty() => processed,
        Ok(_) => html.to_string(),
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
