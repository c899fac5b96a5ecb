use serde_json::Value;

use crate::Document;
use crate::text::normalize;

/// Separators publishers put between an article title and the site name.
const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " – ", " — ", " :: ", " / ", " » "];

impl Document {
    /// Extract title with priority fallback:
    /// 1. JSON-LD `headline`
    /// 2. Open Graph `og:title`
    /// 3. Twitter `twitter:title`
    /// 4. `<title>` element
    /// 5. First `<h1>` element
    ///
    /// JSON-LD lives in `<script>` tags, so call this on a document parsed
    /// without preprocessing.
    pub fn extract_title(&self) -> Option<String> {
        if let Some(headline) = self.json_ld_string("headline") {
            return Some(headline);
        }

        if let Some(title) = self.get_meta_content("og:title") {
            return Some(title);
        }

        if let Some(title) = self.get_meta_content("twitter:title") {
            return Some(title);
        }

        if let Some(title) = self.title() {
            return Some(title);
        }

        self.select_first("h1")
            .ok()
            .flatten()
            .map(|h1| h1.normalized_text())
            .filter(|text| !text.is_empty())
    }

    /// The `<title>` (or `og:title`) with the site-name suffix removed.
    pub fn short_title(&self) -> Option<String> {
        self.title()
            .or_else(|| self.get_meta_content("og:title"))
            .map(|title| shorten_title(&title))
    }

    /// Extract description with priority fallback:
    /// 1. Open Graph `og:description`
    /// 2. Meta `description`
    pub fn extract_description(&self) -> Option<String> {
        self.get_meta_content("og:description")
            .or_else(|| self.get_meta_content("description"))
    }

    /// Get meta tag content by name or property attribute, normalized and
    /// non-empty.
    pub fn get_meta_content(&self, attr: &str) -> Option<String> {
        ["name", "property"].iter().find_map(|key| {
            let selector = format!("meta[{key}=\"{attr}\"]");
            self.select(&selector)
                .ok()?
                .iter()
                .filter_map(|el| el.attr("content"))
                .map(normalize)
                .find(|content| !content.is_empty())
        })
    }

    /// Parses every JSON-LD block, flattening top-level arrays and `@graph`
    /// containers into one list of objects. Unparsable blocks are skipped.
    fn extract_json_ld(&self) -> Vec<Value> {
        let mut items = Vec::new();
        let Ok(elements) = self.select("script[type=\"application/ld+json\"]") else {
            return items;
        };

        for el in elements {
            let Ok(value) = serde_json::from_str::<Value>(el.text().trim()) else {
                continue;
            };
            flatten_json_ld(value, &mut items);
        }
        items
    }

    fn json_ld_string(&self, key: &str) -> Option<String> {
        self.extract_json_ld().iter().find_map(|item| {
            item.get(key)
                .and_then(Value::as_str)
                .map(normalize)
                .filter(|s| !s.is_empty())
        })
    }
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(values) => values.into_iter().for_each(|v| flatten_json_ld(v, out)),
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, out);
            }
            out.push(Value::Object(map));
        }
        _ => {}
    }
}

/// Removes a site-name prefix or suffix from a page title.
///
/// The title is split on common separators and the longest part with at
/// least four words is kept. The original is returned when no part
/// qualifies or when the shortened title is implausibly short or long.
///
/// ```rust
/// use rovat_core::metadata::shorten_title;
///
/// assert_eq!(
///     shorten_title("A jegybank nem nyúlt az alapkamathoz | Példa Hírportál"),
///     "A jegybank nem nyúlt az alapkamathoz"
/// );
/// assert_eq!(shorten_title("Kamatdöntés | Portfolio"), "Kamatdöntés | Portfolio");
/// ```
pub fn shorten_title(title: &str) -> String {
    let title = normalize(title);

    let best: Option<String> = {
        let mut parts: Vec<&str> = vec![title.as_str()];
        for separator in TITLE_SEPARATORS {
            parts = parts.into_iter().flat_map(|part| part.split(separator)).collect();
        }

        if parts.len() < 2 {
            return title;
        }

        parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| part.split_whitespace().count() >= 4)
            .fold(None::<&str>, |longest, part| match longest {
                Some(current) if current.chars().count() >= part.chars().count() => Some(current),
                _ => Some(part),
            })
            .map(str::to_string)
    };

    match best {
        Some(short) if (15..=150).contains(&short.chars().count()) => short,
        _ => title,
    }
}
