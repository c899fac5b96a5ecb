//! Per-host extraction rules.
//!
//! A rule file holds `key: value` directives for one host suffix, e.g.
//! `vg.hu.txt`:
//!
//! ```text
//! body: div.article-text
//! lead: .lead
//! lead_meta: og:description
//! strip: .related-content
//! ```
//!
//! Selectors are CSS. A handful of rules ships with the crate; a user
//! directory can add hosts or replace bundled rules.

pub mod directives;
pub mod loader;
pub mod parser;

pub use directives::{Directive, SiteRule};
pub use loader::{ConfigLoader, ConfigLoaderBuilder, SiteRules};
pub use parser::ConfigParser;
