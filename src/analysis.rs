// src/analysis.rs
// =============================================================================
// The entry point of the estimator: analyze(mode, main_url, other_urls).
//
// Modes:
// - basic: just the main URL
// - smart: the main URL plus every URL the caller listed, in order
// - full:  crawl the site from the main URL, analyze every discovered page,
//          then extrapolate to the pages the crawl did not reach
//
// Any other mode string is not an error: it produces an empty result with
// zero totals.
//
// Pages are analyzed strictly one after another. Totals are plain sums, so
// order only matters for how the pages are listed.
// =============================================================================

use crate::config::EstimatorConfig;
use crate::crawl::crawl_website;
use crate::fetch::HttpFetcher;
use crate::page::{PageAnalyzer, PageResult, TokenRange};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Full-site lower bound = crawled total x this
pub const FULL_MIN_MULTIPLIER: f64 = 1.5;
/// Full-site upper bound = crawled total x this
pub const FULL_MAX_MULTIPLIER: f64 = 2.5;

/// The supported analysis modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Basic,
    Smart,
    Full,
}

impl Mode {
    /// Parses a mode name; unknown names give None
    pub fn parse(name: &str) -> Option<Mode> {
        match name {
            "basic" => Some(Mode::Basic),
            "smart" => Some(Mode::Smart),
            "full" => Some(Mode::Full),
            _ => None,
        }
    }
}

/// The result of one analyze() call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The mode string exactly as requested
    pub mode: String,
    pub pages: Vec<PageResult>,
    pub total_min_token: u64,
    pub total_max_token: u64,
    /// Only set in full mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_min_token: Option<u64>,
    /// Only set in full mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_max_token: Option<u64>,
}

impl AnalysisResult {
    fn from_pages(mode: &str, pages: Vec<PageResult>) -> Self {
        let total: TokenRange = pages.iter().map(PageResult::range).sum();
        Self {
            mode: mode.to_string(),
            pages,
            total_min_token: total.min,
            total_max_token: total.max,
            full_min_token: None,
            full_max_token: None,
        }
    }

    /// Adds the full-site extrapolation to the crawled totals
    fn with_extrapolation(mut self) -> Self {
        let full = extrapolate(TokenRange::new(self.total_min_token, self.total_max_token));
        self.full_min_token = Some(full.min);
        self.full_max_token = Some(full.max);
        self
    }

    /// Number of pages that could not be fetched
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_ok()).count()
    }
}

/// Estimates the whole site from the pages a crawl actually reached
pub fn extrapolate(crawled: TokenRange) -> TokenRange {
    crawled.scale(FULL_MIN_MULTIPLIER, FULL_MAX_MULTIPLIER)
}

/// Runs analyses with a shared HTTP client and tokenizer
#[derive(Debug)]
pub struct Estimator<'a> {
    fetcher: &'a HttpFetcher,
    tokenizer: &'a Tokenizer,
    config: EstimatorConfig,
}

impl<'a> Estimator<'a> {
    pub fn new(
        fetcher: &'a HttpFetcher,
        tokenizer: &'a Tokenizer,
        config: EstimatorConfig,
    ) -> Self {
        Self {
            fetcher,
            tokenizer,
            config,
        }
    }

    /// Analyzes a site in the given mode
    ///
    /// Never fails: unreachable pages show up as zero-token pages with an
    /// error, and an unknown mode gives an empty result.
    pub async fn analyze(
        &self,
        mode: &str,
        main_url: &str,
        other_urls: Option<&[String]>,
    ) -> AnalysisResult {
        let Some(parsed) = Mode::parse(mode) else {
            info!(%mode, "unsupported mode, nothing to analyze");
            return AnalysisResult::from_pages(mode, Vec::new());
        };

        let urls: Vec<String> = match parsed {
            Mode::Basic => vec![main_url.to_string()],
            Mode::Smart => std::iter::once(main_url.to_string())
                .chain(other_urls.unwrap_or_default().iter().cloned())
                .collect(),
            Mode::Full => crawl_website(self.fetcher, main_url, self.config.crawl_limits()).await,
        };

        info!(%mode, pages = urls.len(), "analyzing pages");
        let pages = self.analyze_pages(&urls).await;
        let result = AnalysisResult::from_pages(mode, pages);

        match parsed {
            Mode::Full => result.with_extrapolation(),
            Mode::Basic | Mode::Smart => result,
        }
    }

    async fn analyze_pages(&self, urls: &[String]) -> Vec<PageResult> {
        let analyzer = PageAnalyzer::new(self.fetcher, self.tokenizer, self.config.page_timeout);

        let mut pages = Vec::with_capacity(urls.len());
        for url in urls {
            pages.push(analyzer.analyze_page(url).await);
        }
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageDetails;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("test-agent").unwrap()
    }

    fn tokenizer() -> &'static Tokenizer {
        Tokenizer::shared().unwrap()
    }

    async fn mount_page(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    async fn small_site() -> MockServer {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/",
            concat!(
                "<html><body><h1>Shop</h1>",
                r#"<a href="/login">Sign in</a><a href="/cart">Cart</a>"#,
                "</body></html>",
            ),
        )
        .await;
        mount_page(
            &server,
            "/login",
            concat!(
                r#"<html><body><form><input name="user">"#,
                r#"<input type="submit" value="Log in"></form></body></html>"#,
            ),
        )
        .await;
        mount_page(
            &server,
            "/cart",
            r#"<html><body><p>Your cart</p><button type="submit">Checkout</button></body></html>"#,
        )
        .await;
        server
    }

    fn assert_totals_are_sums(result: &AnalysisResult) {
        let min: u64 = result.pages.iter().map(|p| p.min_token).sum();
        let max: u64 = result.pages.iter().map(|p| p.max_token).sum();
        assert_eq!(result.total_min_token, min);
        assert_eq!(result.total_max_token, max);
        assert!(result.total_min_token <= result.total_max_token);
        for page in &result.pages {
            assert!(page.min_token <= page.max_token);
        }
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("basic"), Some(Mode::Basic));
        assert_eq!(Mode::parse("smart"), Some(Mode::Smart));
        assert_eq!(Mode::parse("full"), Some(Mode::Full));
        assert_eq!(Mode::parse("Full"), None);
        assert_eq!(Mode::parse("turbo"), None);
    }

    #[test]
    fn test_extrapolation_floors() {
        assert_eq!(extrapolate(TokenRange::new(3, 3)), TokenRange::new(4, 7));
        assert_eq!(extrapolate(TokenRange::new(1000, 2000)), TokenRange::new(1500, 5000));
        assert_eq!(extrapolate(TokenRange::ZERO), TokenRange::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_mode_is_empty() {
        let fetcher = fetcher();
        let estimator = Estimator::new(&fetcher, tokenizer(), EstimatorConfig::default());

        let result = estimator.analyze("turbo", "http://127.0.0.1:1/", None).await;

        assert_eq!(result.mode, "turbo");
        assert!(result.pages.is_empty());
        assert_eq!(result.total_min_token, 0);
        assert_eq!(result.total_max_token, 0);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("full_min_token").is_none());
        assert!(json.get("full_max_token").is_none());
    }

    #[tokio::test]
    async fn test_basic_mode_analyzes_only_main_url() {
        let server = small_site().await;
        let fetcher = fetcher();
        let estimator = Estimator::new(&fetcher, tokenizer(), EstimatorConfig::default());

        let result = estimator.analyze("basic", &server.uri(), None).await;

        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.total_min_token, result.pages[0].min_token);
        assert_eq!(result.total_max_token, result.pages[0].max_token);
        assert!(result.full_min_token.is_none());
        assert!(result.full_max_token.is_none());
    }

    #[tokio::test]
    async fn test_smart_mode_keeps_order_and_duplicates() {
        let server = small_site().await;
        let fetcher = fetcher();
        let estimator = Estimator::new(&fetcher, tokenizer(), EstimatorConfig::default());
        let others = vec![
            format!("{}/cart", server.uri()),
            format!("{}/login", server.uri()),
            format!("{}/cart", server.uri()),
        ];

        let result = estimator.analyze("smart", &server.uri(), Some(&others)).await;

        let urls: Vec<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls[0], server.uri());
        assert_eq!(&urls[1..], others.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(result.pages[1], result.pages[3]);
        assert_totals_are_sums(&result);
        assert!(result.full_min_token.is_none());
    }

    #[tokio::test]
    async fn test_smart_mode_without_other_urls() {
        let server = small_site().await;
        let fetcher = fetcher();
        let estimator = Estimator::new(&fetcher, tokenizer(), EstimatorConfig::default());

        let result = estimator.analyze("smart", &server.uri(), None).await;

        assert_eq!(result.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_does_not_abort_analysis() {
        let server = small_site().await;
        let fetcher = fetcher();
        let estimator = Estimator::new(&fetcher, tokenizer(), EstimatorConfig::default());
        let others = vec![
            "http://127.0.0.1:1/".to_string(),
            format!("{}/missing", server.uri()),
            format!("{}/login", server.uri()),
        ];

        let result = estimator.analyze("smart", &server.uri(), Some(&others)).await;

        assert_eq!(result.pages.len(), 4);
        assert_eq!(result.failed_pages(), 2);
        assert!(matches!(result.pages[1].details, PageDetails::Failed { .. }));
        assert!(result.pages[2].error().unwrap().contains("404"));
        assert!(result.pages[3].is_ok());
        assert_totals_are_sums(&result);
    }

    #[tokio::test]
    async fn test_full_mode_crawls_and_extrapolates() {
        let server = small_site().await;
        let fetcher = fetcher();
        let estimator = Estimator::new(&fetcher, tokenizer(), EstimatorConfig::default());

        let result = estimator.analyze("full", &server.uri(), None).await;

        let urls: Vec<String> = result.pages.iter().map(|p| p.url.clone()).collect();
        assert_eq!(
            urls,
            vec![
                server.uri(),
                format!("{}/login", server.uri()),
                format!("{}/cart", server.uri()),
            ]
        );
        assert_totals_are_sums(&result);
        assert_eq!(
            result.full_min_token,
            Some((result.total_min_token as f64 * 1.5) as u64)
        );
        assert_eq!(
            result.full_max_token,
            Some((result.total_max_token as f64 * 2.5) as u64)
        );
    }

    #[tokio::test]
    async fn test_full_mode_respects_configured_page_budget() {
        let server = small_site().await;
        let fetcher = fetcher();
        let config = EstimatorConfig {
            full_max_pages: 1,
            ..EstimatorConfig::default()
        };
        let estimator = Estimator::new(&fetcher, tokenizer(), config);

        let result = estimator.analyze("full", &server.uri(), None).await;

        assert_eq!(result.pages.len(), 1);
        assert!(result.full_min_token.is_some());
    }
}
