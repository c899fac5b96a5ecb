use crate::Result;
use crate::digest::{Digest, DigestEntry};

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,
}

/// Plain text formatter for digests
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, digest: &Digest) -> Result<String> {
        convert_to_text(digest, &self.config)
    }
}

/// Render a digest as plain text: the Markdown layout without link markup.
pub fn convert_to_text(digest: &Digest, config: &TextConfig) -> Result<String> {
    let mut blocks: Vec<String> = Vec::new();

    let heading = digest.heading();
    blocks.push(format!("{heading}\n{}", "=".repeat(heading.chars().count())));
    if !digest.week.is_empty() {
        blocks.push(digest.week.clone());
    }

    for entry in &digest.entries {
        blocks.push(index_entry(entry, config.line_width));
    }

    for entry in &digest.entries {
        blocks.push("-".repeat(40));
        blocks.extend(article_section(entry, config.line_width));
    }

    Ok(blocks.join("\n\n") + "\n")
}

fn index_entry(entry: &DigestEntry, width: usize) -> String {
    let title = format!("{}. {}", entry.index, entry.display_title);
    if entry.lead.is_empty() { title } else { format!("{title}\n{}", wrap_text(&entry.lead, width)) }
}

fn article_section(entry: &DigestEntry, width: usize) -> Vec<String> {
    let title = &entry.display_title;
    let mut blocks = vec![
        format!("{title}\n{}", "-".repeat(title.chars().count())),
        format!("Source: {}", entry.article.source_host()),
    ];

    for paragraph in &entry.article.paragraphs {
        blocks.push(wrap_text(&paragraph.text, width));
    }

    blocks
}

/// Wrap text to specified line width
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut current_line: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::reflow::CleanParagraph;

    fn digest() -> Digest {
        let article = Article::new(
            "A forint gyengült",
            "https://www.portfolio.hu/deviza/1",
            vec![
                CleanParagraph::prose("A forint kedden gyengült. Az euró drágult."),
                CleanParagraph::bullet("• EUR/HUF: 395,2"),
            ],
        );
        Digest::new("Gazdaság", "2024. 2. hét", vec![article], 220)
    }

    #[test]
    fn test_layout() {
        let text = convert_to_text(&digest(), &TextConfig::default()).unwrap();

        assert!(text.starts_with("Weekly News | Gazdaság\n======================\n\n2024. 2. hét"));
        assert!(text.contains("1. A forint gyengült\nA forint kedden gyengült. Az euró drágult."));
        assert!(text.contains("A forint gyengült\n-----------------\n\nSource: www.portfolio.hu"));
        assert!(text.contains("\n\n• EUR/HUF: 395,2\n"));
    }

    #[test]
    fn test_no_link_markup() {
        let text = TextFormatter::new(TextConfig::default()).convert(&digest()).unwrap();
        assert!(!text.contains(">>>"));
        assert!(!text.contains('#'));
        assert!(!text.contains("]("));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("egy kettő három négy", 9), "egy kettő\nhárom\nnégy");
        assert_eq!(wrap_text("nincs tördelés", 0), "nincs tördelés");
    }

    #[test]
    fn test_wrap_counts_characters_not_bytes() {
        assert_eq!(wrap_text("őő űű", 5), "őő űű");
    }
}
