//! Recall-oriented text extraction used when structural detection fails.
//!
//! The walker keeps every visible text block outside page chrome. A block is
//! a block-level element with no block-level descendants, or a run of inline
//! content between such elements. Blocks that are mostly link text are
//! dropped, and list items come out as `- item` lines.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use crate::parse::{Document, Element};
use crate::reflow::RawFragment;
use crate::scoring::link_density;
use crate::text::normalize;

/// Subtrees that are page chrome rather than article text.
const SKIP_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "figure", "form", "h1", "script", "style", "noscript", "template", "button",
    "select", "iframe", "svg",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "body", "center", "dd", "details", "div", "dl", "dt", "fieldset", "figcaption",
    "h2", "h3", "h4", "h5", "h6", "html", "li", "main", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot",
    "th", "thead", "tr", "ul",
];

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern compiles"));

/// Configuration for the generic fallback
#[derive(Debug, Clone)]
pub struct GenericConfig {
    /// Blocks with a higher share of link text are dropped
    pub max_link_density: f64,
}

impl Default for GenericConfig {
    fn default() -> Self {
        Self { max_link_density: 0.5 }
    }
}

/// Extracts the visible text of a document as blocks separated by blank lines.
pub fn extract_text(doc: &Document, config: &GenericConfig) -> String {
    let root = doc.body().unwrap_or_else(|| doc.root());
    extract_blocks(&root, config).join("\n\n")
}

/// Collects the text blocks under `root`, in document order.
pub fn extract_blocks(root: &Element<'_>, config: &GenericConfig) -> Vec<String> {
    extract_blocks_excluding(root, config, &[])
}

/// [`extract_blocks`], leaving out the subtrees rooted at `excluded`.
pub fn extract_blocks_excluding(root: &Element<'_>, config: &GenericConfig, excluded: &[Element<'_>]) -> Vec<String> {
    let mut walker = BlockWalker { config, excluded, blocks: Vec::new() };
    walker.walk(*root);
    walker.blocks
}

/// Splits extracted text on blank lines into paragraph fragments.
/// `- ` prefixed blocks are recognized as list items downstream.
pub fn text_to_fragments(text: &str) -> Vec<RawFragment> {
    BLANK_LINE
        .split(&text.replace("\r\n", "\n"))
        .map(normalize)
        .filter(|block| !block.is_empty())
        .map(RawFragment::paragraph)
        .collect()
}

fn is_block(element: &Element<'_>) -> bool {
    BLOCK_TAGS.iter().any(|tag| element.is(tag))
}

fn is_skipped(element: &Element<'_>) -> bool {
    SKIP_TAGS.iter().any(|tag| element.is(tag))
}

struct BlockWalker<'c, 'a> {
    config: &'c GenericConfig,
    excluded: &'c [Element<'a>],
    blocks: Vec<String>,
}

/// Inline content gathered between two block boundaries.
#[derive(Default)]
struct InlineRun {
    text: String,
    link_chars: usize,
}

impl InlineRun {
    fn push(&mut self, text: &str, is_link: bool) {
        if is_link {
            self.link_chars += text.chars().filter(|c| !c.is_whitespace()).count();
        }
        // Only <br> breaks lines; source newlines are layout.
        self.text.push_str(&text.replace(['\n', '\r'], " "));
    }
}

impl BlockWalker<'_, '_> {
    fn walk(&mut self, element: Element<'_>) {
        if self.skips(&element) {
            return;
        }

        if element.is("li") {
            self.push_block(element.normalized_text(), link_density(&element), "- ");
            return;
        }

        if !self.has_structure(&element) {
            self.push_block(element.normalized_text(), link_density(&element), "");
            return;
        }

        let mut run = InlineRun::default();
        for node in element.inner().children() {
            if let Some(text) = node.value().as_text() {
                run.push(text, false);
                continue;
            }
            let Some(child) = ElementRef::wrap(node).map(Element::from) else {
                continue;
            };
            if self.skips(&child) {
                continue;
            }
            if child.is("br") {
                run.text.push('\n');
                continue;
            }
            if is_block(&child) || self.has_structure(&child) {
                self.flush(&mut run);
                self.walk(child);
                continue;
            }
            if child.is("a") {
                run.push(&child.text(), true);
            } else {
                let links: String = child.select("a").unwrap_or_default().iter().map(|a| a.text()).collect();
                run.link_chars += links.chars().filter(|c| !c.is_whitespace()).count();
                run.push(&child.text(), false);
            }
        }
        self.flush(&mut run);
    }

    fn skips(&self, element: &Element<'_>) -> bool {
        is_skipped(element) || self.excluded.iter().any(|ex| ex.same_node(element))
    }

    /// Whether a block boundary, a line break or a skipped subtree sits below
    /// `element`.
    fn has_structure(&self, element: &Element<'_>) -> bool {
        element.descendants().skip(1).any(|d| is_block(&d) || d.is("br") || self.skips(&d))
    }

    /// Emits the run, one block per blank-line separated part.
    fn flush(&mut self, run: &mut InlineRun) {
        let run = std::mem::take(run);
        let total = run.text.chars().filter(|c| !c.is_whitespace()).count();
        let density = if total == 0 { 0.0 } else { run.link_chars as f64 / total as f64 };
        for part in BLANK_LINE.split(&run.text) {
            self.push_block(normalize(part), density, "");
        }
    }

    fn push_block(&mut self, text: String, density: f64, prefix: &str) {
        if text.is_empty() || density > self.config.max_link_density {
            return;
        }
        self.blocks.push(format!("{prefix}{text}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(html: &str) -> Vec<String> {
        let doc = Document::parse(html);
        let body = doc.body().unwrap();
        extract_blocks(&body, &GenericConfig::default())
    }

    #[test]
    fn test_collects_leaf_blocks_in_order() {
        let out = blocks(
            r#"<body>
                <div><h2>Alcím</h2><p>Első bekezdés szövege.</p></div>
                <blockquote>Idézet a szövegből.</blockquote>
                <table><tr><td>Cella szöveg egy.</td><td>Cella szöveg kettő.</td></tr></table>
            </body>"#,
        );
        assert_eq!(
            out,
            vec!["Alcím", "Első bekezdés szövege.", "Idézet a szövegből.", "Cella szöveg egy.", "Cella szöveg kettő."]
        );
    }

    #[test]
    fn test_skips_page_chrome() {
        let out = blocks(
            r#"<body>
                <header>Fejléc</header>
                <nav><p>Menü</p></nav>
                <h1>Főcím</h1>
                <p>Törzsszöveg.</p>
                <aside><p>Ajánló</p></aside>
                <footer><p>Impresszum</p></footer>
            </body>"#,
        );
        assert_eq!(out, vec!["Törzsszöveg."]);
    }

    #[test]
    fn test_list_items_get_hyphen_marker() {
        let out = blocks("<body><ul><li>egy</li><li>kettő <b>vastag</b></li></ul></body>");
        assert_eq!(out, vec!["- egy", "- kettő vastag"]);
    }

    #[test]
    fn test_direct_text_in_container_div() {
        let out = blocks("<body><div>Közvetlen szöveg <b>kiemeléssel</b><p>Bekezdés.</p>Utána még szöveg.</div></body>");
        assert_eq!(out, vec!["Közvetlen szöveg kiemeléssel", "Bekezdés.", "Utána még szöveg."]);
    }

    #[test]
    fn test_double_line_breaks_split_blocks() {
        let out = blocks(
            "<body><div>\n  <b>Első sor.</b>\n  <br><br>\n  Második\n  <br>\n  folytatás.\n  <br> <br>\n  Harmadik.</div></body>",
        );
        assert_eq!(out, vec!["Első sor.", "Második folytatás.", "Harmadik."]);
    }

    #[test]
    fn test_link_heavy_blocks_are_dropped() {
        let out = blocks(
            r#"<body>
                <div><a href="/1">Címlap</a> <a href="/2">Gazdaság</a></div>
                <p>Szöveg egy <a href="/x">hivatkozással</a> a mondat végén is folytatva.</p>
                <ul><li><a href="/c">Kapcsolódó cikk címe</a></li></ul>
            </body>"#,
        );
        assert_eq!(out, vec!["Szöveg egy hivatkozással a mondat végén is folytatva."]);
    }

    #[test]
    fn test_excluded_subtrees_are_left_out() {
        let doc = Document::parse(
            r#"<body><div class="cikk">
                <p>Megtartott bekezdés.</p>
                <div class="share"><p>Oszd meg!</p></div>
                <p>Szöveg <span class="promo">reklám</span> folytatása.</p>
            </div></body>"#,
        );
        let root = doc.select_first("div.cikk").unwrap().unwrap();
        let mut excluded = doc.select(".share").unwrap();
        excluded.extend(doc.select(".promo").unwrap());

        let out = extract_blocks_excluding(&root, &GenericConfig::default(), &excluded);
        assert_eq!(out, vec!["Megtartott bekezdés.", "Szöveg folytatása."]);
    }

    #[test]
    fn test_text_to_fragments_splits_on_blank_lines() {
        let fragments = text_to_fragments("Első blokk\nfolytatás\n\n  \n- lista elem\r\n\r\nHarmadik");
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Első blokk folytatás", "- lista elem", "Harmadik"]);
    }

    #[test]
    fn test_extract_text_joins_with_blank_lines() {
        let doc = Document::parse("<body><p>Egy.</p><p>Kettő.</p></body>");
        assert_eq!(extract_text(&doc, &GenericConfig::default()), "Egy.\n\nKettő.");
    }
}
