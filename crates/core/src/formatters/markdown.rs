use crate::Result;
use crate::digest::{Digest, DigestEntry, INTRO_ANCHOR};

/// Configuration for Markdown output
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with the rovat, week and article count
    pub include_frontmatter: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { include_frontmatter: true }
    }
}

/// Render a digest as Markdown.
///
/// Layout: heading and week line, the index (numbered title, lead and a
/// link to the body), a rule, then every article with its source host and
/// a link back to the index. Rules separate the articles.
pub fn convert_to_markdown(digest: &Digest, config: &MarkdownConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(digest));
        output.push('\n');
    }

    output.push_str(&format!("**{}**\n\n", escape_markdown(&digest.heading())));
    if !digest.week.is_empty() {
        output.push_str(&format!("{}\n\n", escape_markdown(&digest.week)));
    }
    output.push_str(&format!("<a id=\"{INTRO_ANCHOR}\"></a>\n\n"));

    for entry in &digest.entries {
        output.push_str(&index_entry(entry));
    }

    output.push_str("---\n\n");

    for (i, entry) in digest.entries.iter().enumerate() {
        output.push_str(&article_section(entry));
        if i + 1 < digest.entries.len() {
            output.push_str("---\n\n");
        }
    }

    Ok(output.trim_end().to_string() + "\n")
}

fn index_entry(entry: &DigestEntry) -> String {
    let mut out = format!("**{}. {}**\n\n", entry.index, escape_markdown(&entry.display_title));
    if !entry.lead.is_empty() {
        out.push_str(&format!("{}\n\n", escape_markdown(&entry.lead)));
    }
    out.push_str(&format!("[read article >>>](#{})\n\n", entry.anchor));
    out
}

fn article_section(entry: &DigestEntry) -> String {
    let mut out = format!("<a id=\"{}\"></a>\n\n## {}\n\n", entry.anchor, escape_markdown(&entry.display_title));
    out.push_str(&format!("Source: {}\n\n", entry.article.source_host()));

    for paragraph in &entry.article.paragraphs {
        if paragraph.is_list_item {
            out.push_str(&format!("- {}\n\n", escape_markdown(paragraph.body())));
        } else {
            out.push_str(&format!("{}\n\n", escape_markdown(&paragraph.text)));
        }
    }

    out.push_str(&format!("[back to intro >>>](#{INTRO_ANCHOR})\n\n"));
    out
}

/// Generate TOML frontmatter for a digest
fn generate_frontmatter(digest: &Digest) -> String {
    let mut frontmatter = String::from("+++");
    frontmatter.push_str(&format!("\nrovat = {}", toml_escape_string(&digest.rovat)));
    frontmatter.push_str(&format!("\nweek = {}", toml_escape_string(&digest.week)));
    frontmatter.push_str(&format!("\narticles = {}", digest.len()));
    frontmatter.push_str("\n+++\n");
    frontmatter
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

/// Escapes characters that would start Markdown markup mid-text.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '\\' | '*' | '_' | '[' | ']' | '<' | '>' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, digest: &Digest) -> Result<String> {
        convert_to_markdown(digest, &self.config)
    }
}
