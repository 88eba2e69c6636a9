// src/config.rs
// =============================================================================
// Runtime knobs for a single estimation run.
//
// Everything here has a default that matches how the estimator was
// calibrated (10s per analyzed page, 8s per crawled page, 30 pages / depth 2
// for full-site mode). The CLI can override each of them.
//
// The token cost constants live next to the code that uses them
// (page/estimate.rs, page/features.rs, analysis.rs) and are not tuned per run.
// =============================================================================

use std::time::Duration;

/// Default timeout for fetching a page that is being analyzed
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 10;

/// Default timeout for fetching a page only to discover its links
pub const DEFAULT_CRAWL_TIMEOUT_SECS: u64 = 8;

/// Full-site mode stops after this many discovered pages
pub const DEFAULT_FULL_MAX_PAGES: usize = 30;

/// Full-site mode follows links at most this many hops from the start page
pub const DEFAULT_FULL_MAX_DEPTH: usize = 2;

/// Settings shared by the page analyzer, the crawler and the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Timeout for each page analyzed
    pub page_timeout: Duration,
    /// Timeout for each page fetched by the crawler
    pub crawl_timeout: Duration,
    /// Page budget for full-site crawls
    pub full_max_pages: usize,
    /// Depth budget for full-site crawls (the start page is depth 0)
    pub full_max_depth: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            crawl_timeout: Duration::from_secs(DEFAULT_CRAWL_TIMEOUT_SECS),
            full_max_pages: DEFAULT_FULL_MAX_PAGES,
            full_max_depth: DEFAULT_FULL_MAX_DEPTH,
            user_agent: format!("site-token-estimator/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EstimatorConfig {
    /// The crawl limits used by full-site mode
    pub fn crawl_limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_pages: self.full_max_pages,
            max_depth: self.full_max_depth,
            timeout: self.crawl_timeout,
        }
    }
}

/// Bounds for one breadth-first crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Stop once this many pages have been discovered
    pub max_pages: usize,
    /// Pages deeper than this are never visited (start page = depth 0)
    pub max_depth: usize,
    /// Timeout for each crawl fetch
    pub timeout: Duration,
}
