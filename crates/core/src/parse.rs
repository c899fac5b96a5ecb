//! HTML parsing and DOM navigation.
//!
//! [`Document`] and [`Element`] wrap `scraper` so the extraction strategies can
//! query by CSS selector and walk parents, children and descendants without
//! touching the underlying tree types.
//!
//! # Example
//!
//! ```rust
//! use rovat_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Cím</h1>
//!             <p class="lead">Bevezető</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let leads = doc.select("p.lead").unwrap();
//! assert_eq!(leads[0].text(), "Bevezető");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::text::normalize;
use crate::{Result, RovatError};

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML as-is. Malformed markup is repaired by the HTML5 parser,
    /// so this never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses HTML after running it through [`preprocess_html`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rovat_core::parse::Document;
    /// use rovat_core::preprocess::PreprocessConfig;
    ///
    /// let html = "<body><script>track()</script><p>Szöveg</p></body>";
    /// let doc = Document::parse_with_preprocessing(html, &PreprocessConfig::default());
    /// assert!(!doc.text_content().contains("track"));
    /// ```
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Self {
        let cleaned = preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    /// The underlying `scraper::Html`.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `<html>` element.
    pub fn root(&self) -> Element<'_> {
        Element::from(self.html.root_element())
    }

    /// The `<body>` element, if the parser produced one.
    pub fn body(&self) -> Option<Element<'_>> {
        self.select_first("body").ok().flatten()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RovatError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(Element::from).collect())
    }

    /// The first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(Element::from))
    }

    /// Text of the `<title>` element, whitespace-normalized.
    pub fn title(&self) -> Option<String> {
        self.select_first("title")
            .ok()
            .flatten()
            .map(|el| el.normalized_text())
            .filter(|t| !t.is_empty())
    }

    /// All text content of the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| RovatError::HtmlParseError(format!("Invalid selector {selector:?}: {e}")))
}

/// A single element in a parsed [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Element<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Element<'a> {
    pub(crate) fn inner(&self) -> ElementRef<'a> {
        self.element
    }

    /// Concatenation of all descendant text nodes.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Descendant text with whitespace collapsed.
    pub fn normalized_text(&self) -> String {
        normalize(&self.text())
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_ascii_lowercase()
    }

    pub fn is(&self, tag: &str) -> bool {
        self.element.value().name().eq_ignore_ascii_case(tag)
    }

    /// The nearest parent that is an element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Element::from)
    }

    /// Direct element children in document order.
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.children().filter_map(ElementRef::wrap).map(Element::from)
    }

    /// This element and all element descendants, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.descendants().filter_map(ElementRef::wrap).map(Element::from)
    }

    /// Whether `self` and `other` are the same node.
    pub fn same_node(&self, other: &Element<'_>) -> bool {
        self.element.id() == other.element.id()
    }

    /// Whether an element with the given tag sits strictly between `self`
    /// and `boundary`. Stops at the document root when `boundary` is not an
    /// ancestor.
    pub fn has_ancestor_within(&self, tag: &str, boundary: &Element<'_>) -> bool {
        let mut current = self.parent();
        while let Some(el) = current {
            if el.same_node(boundary) {
                return false;
            }
            if el.is(tag) {
                return true;
            }
            current = el.parent();
        }
        false
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RovatError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(Element::from).collect())
    }
}
