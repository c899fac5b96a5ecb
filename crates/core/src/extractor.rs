//! The extraction chain and its bounded fan-out.
//!
//! [`Extractor::extract`] fetches one URL and runs the strategy chain over
//! it. It never fails: transport errors, timeouts and strategies that find
//! nothing all end in an [`Article`], empty in the worst case.
//!
//! # Example
//!
//! ```rust
//! use rovat_core::{Extractor, ExtractorConfig};
//!
//! let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
//! let html = r#"<html><head><title>Egy hosszabb cím a cikkhez | Portál</title></head><body>
//!     <div class="article-body">
//!         <p>A jegybank kedden bejelentette, hogy az alapkamat változatlanul marad, mert az infláció lassul.</p>
//!         <p>Az elemzők többsége, a piaci konszenzusnak megfelelően, erre a döntésre számított.</p>
//!     </div></body></html>"#;
//!
//! let article = extractor.extract_html("https://pelda.hu/cikk", html);
//! assert_eq!(article.title, "Egy hosszabb cím a cikkhez");
//! assert_eq!(article.paragraphs.len(), 2);
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::article::Article;
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher};
use crate::generic::GenericConfig;
use crate::junk::JunkClassifier;
use crate::lead::DEFAULT_LEAD_CAP;
use crate::parse::Document;
use crate::readability::ReadabilityConfig;
use crate::reflow::ReflowConfig;
use crate::siteconfig::{ConfigLoader, SiteRules};
use crate::strategy::{Cleaner, ExtractionStrategy, Page, default_chain};
use crate::{Result, RovatError};

/// Every tunable of the pipeline.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Timeout and User-Agent of the fetch step
    pub fetch: FetchConfig,
    /// Maximum number of URLs processed at once by [`Extractor::extract_all`]
    pub concurrency: usize,
    /// Reflow length thresholds
    pub reflow: ReflowConfig,
    /// Length under which a second sentence is added to the lead
    pub lead_cap: usize,
    /// Reader-mode scoring thresholds
    pub readability: ReadabilityConfig,
    /// Generic fallback settings
    pub generic: GenericConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            concurrency: 8,
            reflow: ReflowConfig::default(),
            lead_cap: DEFAULT_LEAD_CAP,
            readability: ReadabilityConfig::default(),
            generic: GenericConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a builder for ExtractorConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rovat_core::ExtractorConfig;
    ///
    /// let config = ExtractorConfig::builder().timeout(10).concurrency(4).build();
    /// assert_eq!(config.fetch.timeout, 10);
    /// ```
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }
}

/// Builder for ExtractorConfig.
#[derive(Debug, Clone)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractorConfig::default() }
    }

    /// Sets the fetch timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    /// Sets the concurrency limit. Zero is treated as one.
    pub fn concurrency(mut self, value: usize) -> Self {
        self.config.concurrency = value.max(1);
        self
    }

    /// Sets the reflow thresholds.
    pub fn reflow(mut self, reflow: ReflowConfig) -> Self {
        self.config.reflow = reflow;
        self
    }

    /// Sets the lead length cap.
    pub fn lead_cap(mut self, value: usize) -> Self {
        self.config.lead_cap = value;
        self
    }

    /// Sets the reader-mode configuration.
    pub fn readability(mut self, readability: ReadabilityConfig) -> Self {
        self.config.readability = readability;
        self
    }

    /// Sets the link-density ceiling of the generic fallback.
    pub fn max_link_density(mut self, value: f64) -> Self {
        self.config.generic.max_link_density = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the extraction chain for single URLs, local HTML, or URL batches.
///
/// Cloning is cheap; clones share the fetcher, patterns and rules.
#[derive(Clone)]
pub struct Extractor {
    config: Arc<ExtractorConfig>,
    fetcher: Arc<dyn Fetcher>,
    cleaner: Cleaner,
    rules: Arc<SiteRules>,
    strategies: Arc<Vec<Box<dyn ExtractionStrategy>>>,
}

impl Extractor {
    /// Extractor with the HTTP fetcher, bundled junk patterns and the
    /// bundled site rules.
    ///
    /// # Errors
    ///
    /// Fails only when the HTTP client cannot be built.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let rules = ConfigLoader::new().load()?;
        Ok(Self::with_parts(config, Arc::new(fetcher), Arc::new(JunkClassifier::default()), Arc::new(rules)))
    }

    /// Extractor from explicit parts.
    pub fn with_parts(
        config: ExtractorConfig, fetcher: Arc<dyn Fetcher>, junk: Arc<JunkClassifier>, rules: Arc<SiteRules>,
    ) -> Self {
        let strategies = default_chain(config.readability.clone(), Arc::clone(&rules), config.generic.clone());
        Self {
            cleaner: Cleaner::new(junk, config.reflow.clone()),
            config: Arc::new(config),
            fetcher,
            rules,
            strategies: Arc::new(strategies),
        }
    }

    /// Replaces the fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replaces the junk patterns.
    pub fn with_junk(mut self, junk: Arc<JunkClassifier>) -> Self {
        self.cleaner = Cleaner::new(junk, self.config.reflow.clone());
        self
    }

    /// Replaces the site rules.
    pub fn with_site_rules(mut self, rules: Arc<SiteRules>) -> Self {
        let strategies = default_chain(self.config.readability.clone(), Arc::clone(&rules), self.config.generic.clone());
        self.rules = rules;
        self.strategies = Arc::new(strategies);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn site_rules(&self) -> &SiteRules {
        &self.rules
    }

    /// Fetches a URL and extracts its article. Never fails.
    ///
    /// The strategy chain runs on the blocking pool so a large page does not
    /// hold up the fetches of other URLs.
    #[instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Article {
        let html = match self.fetch(url).await {
            Ok(html) => html,
            Err(e) if e.is_transport() => {
                warn!(error = %e, "fetch failed, returning empty article");
                return Article::empty(url);
            }
            Err(e) => {
                debug!(error = %e, "input rejected before fetching, returning empty article");
                return Article::empty(url);
            }
        };

        let extractor = self.clone();
        let owned_url = url.to_string();
        match tokio::task::spawn_blocking(move || extractor.extract_html(&owned_url, &html)).await {
            Ok(article) => article,
            Err(e) => {
                warn!(error = %e, "extraction did not complete, returning empty article");
                Article::empty(url)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let timeout = self.config.fetch.timeout;
        let response = tokio::time::timeout(Duration::from_secs(timeout), self.fetcher.fetch(url))
            .await
            .map_err(|_| RovatError::Timeout { timeout })??;
        response.into_body(url)
    }

    /// Runs the strategy chain over already fetched HTML.
    ///
    /// The first strategy with a non-empty result supplies the paragraphs.
    /// The title is the winner's, else one found by an earlier strategy, else
    /// the page metadata title, else empty.
    pub fn extract_html(&self, url: &str, html: &str) -> Article {
        let page = Page::new(url, html);
        let mut fallback_title: Option<String> = None;

        for strategy in self.strategies.iter() {
            match strategy.attempt(&page, &self.cleaner) {
                Ok(output) if !output.paragraphs.is_empty() => {
                    info!(strategy = strategy.name(), paragraphs = output.paragraphs.len(), url, "strategy succeeded");
                    let title = output
                        .title
                        .or(fallback_title)
                        .or_else(|| Document::parse(html).extract_title())
                        .unwrap_or_default();
                    return Article::new(title, url, output.paragraphs);
                }
                Ok(output) => {
                    debug!(strategy = strategy.name(), url, "strategy produced no paragraphs");
                    if fallback_title.is_none() {
                        fallback_title = output.title;
                    }
                }
                Err(e) => debug!(strategy = strategy.name(), url, error = %e, "strategy failed"),
            }
        }

        warn!(url, "no strategy produced content");
        Article::empty(url)
    }

    /// Extracts many URLs concurrently, at most `concurrency` at a time.
    ///
    /// Results are in input order. A task that panics yields an empty
    /// article for its URL. Dropping the returned future aborts all
    /// in-flight extractions.
    pub async fn extract_all(&self, urls: &[String]) -> Vec<Article> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (idx, url) in urls.iter().enumerate() {
            let extractor = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let url = url.clone();
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (idx, Article::empty(url));
                };
                let article = extractor.extract(&url).await;
                (idx, article)
            });
        }

        let mut results: Vec<Option<Article>> = vec![None; urls.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, article)) => results[idx] = Some(article),
                Err(e) => warn!(error = %e, "extraction task did not complete"),
            }
        }

        results
            .into_iter()
            .zip(urls)
            .map(|(article, url)| article.unwrap_or_else(|| Article::empty(url.as_str())))
            .collect()
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.config)
            .field("site_rules", &self.rules.len())
            .field("strategies", &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, FetchResponse>);

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            if url.contains("panic") {
                panic!("fetcher exploded");
            }
            self.0.get(url).cloned().ok_or(RovatError::Timeout { timeout: 1 })
        }
    }

    const PAGE: &str = r#"<html><head><title>A jegybank nem nyúlt az alapkamathoz | Példa</title></head><body>
        <div class="article-body">
            <p>A jegybank kedden bejelentette, hogy az alapkamat változatlanul marad, mert az infláció lassul.</p>
            <p>Az elemzők többsége, a piaci konszenzusnak megfelelően, erre a döntésre számított.</p>
        </div></body></html>"#;

    fn extractor(pages: &[(&str, FetchResponse)]) -> Extractor {
        let map = pages.iter().map(|(url, resp)| (url.to_string(), resp.clone())).collect();
        Extractor::with_parts(
            ExtractorConfig::default(),
            Arc::new(MapFetcher(map)),
            Arc::new(JunkClassifier::default()),
            Arc::new(SiteRules::new()),
        )
    }

    #[test]
    fn test_builder() {
        let config = ExtractorConfig::builder()
            .timeout(5)
            .user_agent("teszt/1.0")
            .concurrency(0)
            .lead_cap(100)
            .max_link_density(0.3)
            .build();
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "teszt/1.0");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.lead_cap, 100);
        assert_eq!(config.generic.max_link_density, 0.3);
    }

    #[test]
    fn test_extract_html_reader_mode() {
        let article = extractor(&[]).extract_html("https://pelda.hu/1", PAGE);
        assert_eq!(article.title, "A jegybank nem nyúlt az alapkamathoz");
        assert_eq!(article.paragraphs.len(), 2);
    }

    #[test]
    fn test_extract_html_metadata_title_for_generic_winner() {
        let html = r#"<html><head><meta property="og:title" content="Metaadat cím"></head><body>
            <table><tr><td>Az önkormányzat szerdán döntött a helyi buszjáratok sűrítéséről a belvárosban.</td></tr></table>
            </body></html>"#;
        let article = extractor(&[]).extract_html("https://pelda.hu/2", html);
        assert_eq!(article.title, "Metaadat cím");
        assert_eq!(article.paragraphs.len(), 1);
    }

    #[test]
    fn test_extract_html_nothing_found() {
        let article = extractor(&[]).extract_html("https://pelda.hu/3", "<html><body><nav>Menü</nav></body></html>");
        assert_eq!(article, Article::empty("https://pelda.hu/3"));
    }

    #[tokio::test]
    async fn test_extract_soft_fails_on_transport_error() {
        let article = extractor(&[]).extract("https://pelda.hu/nincs").await;
        assert_eq!(article.title, "");
        assert!(article.paragraphs.is_empty());
    }

    #[tokio::test]
    async fn test_extract_soft_fails_on_http_status() {
        let ex = extractor(&[("https://pelda.hu/404", FetchResponse { status: 404, body: PAGE.to_string() })]);
        assert!(ex.extract("https://pelda.hu/404").await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_all_preserves_order_and_survives_panics() {
        let ex = extractor(&[("https://pelda.hu/ok", FetchResponse::ok(PAGE))]);
        let urls = vec![
            "https://pelda.hu/panic".to_string(),
            "https://pelda.hu/ok".to_string(),
            "https://pelda.hu/hiba".to_string(),
        ];

        let articles = ex.extract_all(&urls).await;

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0], Article::empty("https://pelda.hu/panic"));
        assert_eq!(articles[1].paragraphs.len(), 2);
        assert_eq!(articles[1].url, "https://pelda.hu/ok");
        assert!(articles[2].is_empty());
    }

    /// Reader mode that burns CPU time on pages under `/lassu`.
    struct Stalling;

    impl ExtractionStrategy for Stalling {
        fn name(&self) -> &'static str {
            "stalling"
        }

        fn attempt(&self, page: &Page, cleaner: &Cleaner) -> Result<crate::strategy::StrategyOutput> {
            if page.url.contains("/lassu") {
                std::thread::sleep(Duration::from_millis(600));
            }
            crate::strategy::ReaderMode::default().attempt(page, cleaner)
        }
    }

    /// Answers `/gyors` after a short async sleep and records when it did.
    struct TimedFetcher {
        started: std::time::Instant,
        fast_done: std::sync::Mutex<Option<Duration>>,
    }

    #[async_trait]
    impl Fetcher for TimedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            if url.contains("/gyors") {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if let Ok(mut done) = self.fast_done.lock() {
                    *done = Some(self.started.elapsed());
                }
            }
            Ok(FetchResponse::ok(PAGE))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_slow_extraction_does_not_stall_other_fetches() {
        let fetcher = Arc::new(TimedFetcher { started: std::time::Instant::now(), fast_done: Default::default() });
        let mut ex = extractor(&[]).with_fetcher(fetcher.clone());
        ex.strategies = Arc::new(vec![Box::new(Stalling)]);

        let urls = vec!["https://pelda.hu/lassu".to_string(), "https://pelda.hu/gyors".to_string()];
        let articles = ex.extract_all(&urls).await;

        assert_eq!(articles[0].paragraphs.len(), 2);
        assert_eq!(articles[1].paragraphs.len(), 2);
        let fast_done = fetcher.fast_done.lock().unwrap().expect("fast fetch finished");
        assert!(fast_done < Duration::from_millis(400), "fast fetch finished after {fast_done:?}");
    }

    #[tokio::test]
    async fn test_extract_survives_panicking_strategy() {
        struct Exploding;
        impl ExtractionStrategy for Exploding {
            fn name(&self) -> &'static str {
                "exploding"
            }
            fn attempt(&self, _page: &Page, _cleaner: &Cleaner) -> Result<crate::strategy::StrategyOutput> {
                panic!("strategy exploded")
            }
        }

        let mut ex = extractor(&[("https://pelda.hu/ok", FetchResponse::ok(PAGE))]);
        ex.strategies = Arc::new(vec![Box::new(Exploding)]);
        assert_eq!(ex.extract("https://pelda.hu/ok").await, Article::empty("https://pelda.hu/ok"));
    }
}
