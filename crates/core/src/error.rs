//! Error types for rovat operations.
//!
//! [`RovatError`] covers the internal seams of the pipeline: fetching a page,
//! running a single extraction strategy, compiling junk patterns and loading
//! site rules. The public extraction entry points never surface these to the
//! caller; they are logged and folded into an empty [`crate::Article`].
//!
//! # Example
//!
//! ```rust
//! use rovat_core::{RovatError, Result};
//!
//! fn first_block(blocks: &[String]) -> Result<&str> {
//!     blocks.first().map(String::as_str).ok_or(RovatError::NoContent)
//! }
//! # assert!(first_block(&[]).is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetch, extraction and configuration failures.
#[derive(Error, Debug)]
pub enum RovatError {
    /// Transport errors from reqwest (DNS, connection reset, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The fetch did not complete within the configured timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid or unsupported URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML could not be parsed or a CSS selector was invalid.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The best content candidate scored below the reader-mode threshold.
    #[error("Content is not readable (score {score} below threshold {threshold})")]
    NotReadable { score: f64, threshold: f64 },

    /// No content could be extracted from the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading pattern or rule files, or writing output.
    #[error("Failed to access file: {0}")]
    WriteError(#[from] std::io::Error),

    /// A junk pattern failed to compile.
    #[error("Invalid junk pattern on line {line}: {message}")]
    PatternError { line: usize, message: String },

    /// A site rule file could not be parsed.
    #[error("Site rule error: {0}")]
    SiteConfigError(String),

    /// Serializing a digest failed.
    #[error("Serialization failed: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl RovatError {
    /// Whether this error came from the network boundary rather than from parsing.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RovatError::HttpError(_) | RovatError::Timeout { .. } | RovatError::HttpStatus { .. }
        )
    }
}

/// Result type alias for [`RovatError`].
pub type Result<T> = std::result::Result<T, RovatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RovatError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_not_readable_error() {
        let err = RovatError::NotReadable { score: 15.0, threshold: 20.0 };
        assert!(err.to_string().contains("15"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_pattern_error_names_line() {
        let err = RovatError::PatternError { line: 7, message: "unclosed group".to_string() };
        assert_eq!(err.to_string(), "Invalid junk pattern on line 7: unclosed group");
    }

    #[test]
    fn test_transport_classification() {
        assert!(RovatError::Timeout { timeout: 25 }.is_transport());
        assert!(RovatError::HttpStatus { status: 503, url: "https://example.com".into() }.is_transport());
        assert!(!RovatError::NoContent.is_transport());
        assert!(!RovatError::HtmlParseError("bad selector".into()).is_transport());
    }
}
