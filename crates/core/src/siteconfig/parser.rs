use crate::error::{Result, RovatError};
use crate::siteconfig::directives::{SiteRule, parse_directive};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Site rule file parser
#[derive(Debug)]
pub struct ConfigParser;

impl ConfigParser {
    /// Parse a single site rule file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SiteRule> {
        let file = std::fs::File::open(&path).map_err(|e| {
            RovatError::SiteConfigError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;

        Self::parse_reader(BufReader::new(file))
    }

    /// Parse site rules from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<SiteRule> {
        let mut rule = SiteRule::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_number = idx + 1;
            let line =
                line.map_err(|e| RovatError::SiteConfigError(format!("Read error at line {line_number}: {e}")))?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let directive = parse_directive(line)
                .map_err(|e| RovatError::SiteConfigError(format!("Parse error at line {line_number}: {e}")))?;
            rule.add_directive(directive);
        }

        Ok(rule)
    }

    /// Parse site rules from a string
    pub fn parse_string(content: &str) -> Result<SiteRule> {
        Self::parse_reader(content.as_bytes())
    }
}
