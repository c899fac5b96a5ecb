pub mod article;
pub mod digest;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod formatters;
pub mod generic;
pub mod junk;
pub mod lead;
pub mod metadata;
pub mod parse;
pub mod preprocess;
pub mod readability;
pub mod reflow;
pub mod scoring;
pub mod siteconfig;
pub mod strategy;
pub mod text;

pub use article::Article;
pub use digest::{Digest, DigestEntry, UNTITLED};
pub use error::{Result, RovatError};
pub use extractor::{Extractor, ExtractorConfig, ExtractorConfigBuilder};
pub use fetch::{FetchConfig, FetchResponse, Fetcher, HttpFetcher, fetch_file};
pub use formatters::{JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_json, convert_to_markdown, convert_to_text};
pub use junk::JunkClassifier;
pub use lead::pick_lead;
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use readability::ReadabilityConfig;
pub use reflow::{CleanParagraph, RawFragment, ReflowConfig, reflow};
#[doc(hidden)]
pub use scoring::{ScoreConfig, base_tag_score, class_id_weight, link_density};
pub use siteconfig::{ConfigLoader, ConfigLoaderBuilder, ConfigParser, Directive, SiteRule, SiteRules};
pub use strategy::{Cleaner, ExtractionStrategy, Page, StrategyOutput};
pub use text::normalize;
