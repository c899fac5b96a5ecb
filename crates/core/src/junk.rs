//! Pattern-based detection of advertising and boilerplate lines.
//!
//! The pattern list is data, not code: the bundled list lives in
//! `data/junk_patterns.txt` and callers can load their own file with
//! [`JunkClassifier::from_file`]. Each non-empty, non-`#` line is one regular
//! expression, matched case-insensitively. A line is junk if any pattern
//! matches it.
//!
//! # Example
//!
//! ```rust
//! use rovat_core::JunkClassifier;
//!
//! let junk = JunkClassifier::bundled();
//! assert!(junk.is_junk("Hirdetés"));
//! assert!(!junk.is_junk("A jegybank változatlanul hagyta az alapkamatot."));
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::{RegexBuilder, RegexSet, RegexSetBuilder};

use crate::{Result, RovatError};

/// Source of the bundled pattern list.
pub const BUNDLED_PATTERNS: &str = include_str!("../data/junk_patterns.txt");

static BUNDLED: LazyLock<JunkClassifier> =
    LazyLock::new(|| JunkClassifier::from_source(BUNDLED_PATTERNS).expect("bundled junk patterns compile"));

/// Compiled, ordered set of junk patterns.
#[derive(Debug, Clone)]
pub struct JunkClassifier {
    set: RegexSet,
    patterns: Vec<String>,
}

impl JunkClassifier {
    /// Compiles a list of patterns.
    ///
    /// # Errors
    ///
    /// Returns [`RovatError::PatternError`] naming the 1-based position of the
    /// first pattern that fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let numbered: Vec<(usize, String)> = patterns
            .into_iter()
            .enumerate()
            .map(|(idx, p)| (idx + 1, p.as_ref().to_string()))
            .collect();
        Self::compile(numbered)
    }

    /// Parses a pattern file body: one pattern per line, blank lines and
    /// `#` comments ignored. Error line numbers refer to the source text.
    pub fn from_source(source: &str) -> Result<Self> {
        let numbered = source
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') { None } else { Some((idx + 1, line.to_string())) }
            })
            .collect();
        Self::compile(numbered)
    }

    /// Loads and compiles a pattern file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RovatError::FileNotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_source(&source)
    }

    /// The classifier built from the bundled pattern list.
    pub fn bundled() -> &'static JunkClassifier {
        &BUNDLED
    }

    fn compile(numbered: Vec<(usize, String)>) -> Result<Self> {
        for (line, pattern) in &numbered {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| RovatError::PatternError { line: *line, message: e.to_string() })?;
        }

        let patterns: Vec<String> = numbered.into_iter().map(|(_, p)| p).collect();
        let set = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| RovatError::PatternError { line: 0, message: e.to_string() })?;

        Ok(Self { set, patterns })
    }

    /// Whether the (already normalized) line matches any junk pattern.
    pub fn is_junk(&self, line: &str) -> bool {
        self.set.is_match(line)
    }

    /// The first pattern, in list order, that matches the line.
    pub fn matching_pattern(&self, line: &str) -> Option<&str> {
        self.set
            .matches(line)
            .iter()
            .next()
            .map(|idx| self.patterns[idx].as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for JunkClassifier {
    fn default() -> Self {
        Self::bundled().clone()
    }
}
