use crate::error::{Result, RovatError};
use crate::siteconfig::directives::SiteRule;
use crate::siteconfig::parser::ConfigParser;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rules shipped with the crate, keyed by host suffix.
const BUNDLED_RULES: &[(&str, &str)] = &[
    ("economx.hu", include_str!("../../site_rules/economx.hu.txt")),
    ("portfolio.hu", include_str!("../../site_rules/portfolio.hu.txt")),
    ("vg.hu", include_str!("../../site_rules/vg.hu.txt")),
];

/// Site rules indexed by host suffix
#[derive(Debug, Clone, Default)]
pub struct SiteRules {
    rules: HashMap<String, SiteRule>,
}

impl SiteRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, replacing any rule already stored for `host`
    pub fn insert(&mut self, host: impl Into<String>, rule: SiteRule) {
        self.rules.insert(normalize_host(&host.into()), rule);
    }

    /// Rule for a host, walking from the full host to its parent suffixes.
    ///
    /// `www.vg.hu` resolves to a `www.vg.hu` rule if present, then `vg.hu`.
    /// A bare top-level domain is never consulted.
    pub fn for_host(&self, host: &str) -> Option<&SiteRule> {
        let host = normalize_host(host);
        let mut candidate = host.as_str();

        loop {
            if let Some(rule) = self.rules.get(candidate) {
                return Some(rule);
            }
            match candidate.split_once('.') {
                Some((_, parent)) if parent.contains('.') => candidate = parent,
                _ => return None,
            }
        }
    }

    /// Hosts with a rule, sorted
    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn register(rules: &mut SiteRules, host: &str, rule: SiteRule) {
    for test_url in stray_test_urls(host, &rule) {
        warn!(host, test_url, "test_url does not belong to the rule's host");
    }
    rules.insert(host, rule);
}

/// Test URLs that are unparsable or whose host is not `host` or one of its subdomains.
fn stray_test_urls<'a>(host: &str, rule: &'a SiteRule) -> Vec<&'a str> {
    let host = normalize_host(host);
    let suffix = format!(".{host}");

    rule.test_urls
        .iter()
        .map(String::as_str)
        .filter(|test_url| {
            let url_host = url::Url::parse(test_url)
                .ok()
                .and_then(|url| url.host_str().map(normalize_host));
            !url_host.is_some_and(|url_host| url_host == host || url_host.ends_with(&suffix))
        })
        .collect()
}

/// Loads bundled and user site rules
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// User rule directory; one `<host>.txt` file per host suffix
    custom_dir: Option<PathBuf>,
    /// Fail when `custom_dir` does not exist
    require_custom_dir: bool,
    /// Include the rules shipped with the crate
    bundled: bool,
}

impl ConfigLoader {
    /// Create a loader with bundled rules only
    pub fn new() -> Self {
        Self { custom_dir: None, require_custom_dir: false, bundled: true }
    }

    /// Load all rules. User rules replace bundled rules for the same host.
    ///
    /// A user file that fails to parse is logged and skipped.
    pub fn load(&self) -> Result<SiteRules> {
        let mut rules = SiteRules::new();

        if self.bundled {
            for (host, source) in BUNDLED_RULES {
                register(&mut rules, host, ConfigParser::parse_string(source)?);
            }
        }

        if let Some(dir) = &self.custom_dir {
            if !dir.is_dir() {
                if self.require_custom_dir {
                    return Err(RovatError::FileNotFound(dir.clone()));
                }
                return Ok(rules);
            }
            self.load_dir(dir, &mut rules)?;
        }

        Ok(rules)
    }

    fn load_dir(&self, dir: &Path, rules: &mut SiteRules) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();

        for path in files {
            let Some(host) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match ConfigParser::parse_file(&path) {
                Ok(rule) => {
                    debug!(host, path = %path.display(), "loaded site rule");
                    register(rules, host, rule);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unparsable site rule file"),
            }
        }

        Ok(())
    }

    /// Default user rule directory (`<config dir>/rovat/sites`)
    pub fn default_custom_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rovat").join("sites"))
    }
}

/// Builder for ConfigLoader
#[derive(Debug)]
pub struct ConfigLoaderBuilder {
    custom_dir: Option<PathBuf>,
    bundled: bool,
}

impl ConfigLoaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { custom_dir: None, bundled: true }
    }

    /// Set the user rule directory. It must exist when the rules are loaded.
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Include or leave out the bundled rules
    pub fn bundled(mut self, bundled: bool) -> Self {
        self.bundled = bundled;
        self
    }

    /// Build the ConfigLoader
    pub fn build(self) -> ConfigLoader {
        ConfigLoader { require_custom_dir: self.custom_dir.is_some(), custom_dir: self.custom_dir, bundled: self.bundled }
    }
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ConfigLoader {
    /// Bundled rules plus the default user directory when it exists
    fn default() -> Self {
        Self { custom_dir: Self::default_custom_dir(), require_custom_dir: false, bundled: true }
    }
}
