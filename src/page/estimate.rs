// src/page/estimate.rs
// =============================================================================
// Turns one page into a token estimate.
//
// How the estimate is built:
// 1. Visible text -> token count -> scaled by 1.1 (min) and 1.5 (max)
// 2. Each <form> costs 1200..2000 tokens
// 3. Each submit control costs 300..600 tokens
// 4. Each detected feature adds its own cost range
// 5. The page total is the sum of those four ranges
//
// The constants are empirical. They were calibrated against real sites and
// must not be "fixed" without recalibrating.
//
// Fetch failures never escape from here: a page that cannot be downloaded is
// reported as zero tokens with an error message in its details.
// =============================================================================

use super::features::{detect_features, features_cost};
use super::html::{count_forms, count_submit_controls, parse_page, visible_text};
use super::range::TokenRange;
use crate::fetch::{HttpFetcher, StatusPolicy};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Multiplier applied to the raw text token count for the lower bound
pub const TEXT_MIN_FACTOR: f64 = 1.1;
/// Multiplier applied to the raw text token count for the upper bound
pub const TEXT_MAX_FACTOR: f64 = 1.5;
/// Cost of one <form>
pub const FORM_COST: TokenRange = TokenRange::new(1200, 2000);
/// Cost of one submit control
pub const BUTTON_COST: TokenRange = TokenRange::new(300, 600);

/// Where a page's tokens come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBreakdown {
    pub text_token: TokenRange,
    pub form_token: TokenRange,
    pub button_token: TokenRange,
    pub feature_token: TokenRange,
    pub features: Vec<String>,
    pub form_count: usize,
    pub button_count: usize,
}

impl TokenBreakdown {
    pub fn total(&self) -> TokenRange {
        self.text_token + self.form_token + self.button_token + self.feature_token
    }
}

/// Either a full breakdown or the reason the page could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageDetails {
    Breakdown(TokenBreakdown),
    Failed { error: String },
}

/// The estimate for a single URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub min_token: u64,
    pub max_token: u64,
    pub details: PageDetails,
}

impl PageResult {
    /// A page whose fetch failed: zero tokens, error in details
    pub fn failed(url: impl Into<String>, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            min_token: 0,
            max_token: 0,
            details: PageDetails::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn range(&self) -> TokenRange {
        TokenRange::new(self.min_token, self.max_token)
    }

    pub fn is_ok(&self) -> bool {
        self.error().is_none()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.details {
            PageDetails::Failed { error } => Some(error),
            PageDetails::Breakdown(_) => None,
        }
    }
}

/// Estimates a page from markup that has already been downloaded
///
/// Pure: the same markup always gives the same result.
pub fn estimate_markup(url: &str, markup: &str, tokenizer: &Tokenizer) -> PageResult {
    let document = parse_page(markup);

    let text = visible_text(&document);
    let text_token = TokenRange::scaled(tokenizer.count(&text), TEXT_MIN_FACTOR, TEXT_MAX_FACTOR);

    let form_count = count_forms(&document);
    let form_token = TokenRange::per_item(form_count, FORM_COST);

    let button_count = count_submit_controls(&document);
    let button_token = TokenRange::per_item(button_count, BUTTON_COST);

    let features = detect_features(markup);
    let feature_token = features_cost(features.iter().copied());

    let breakdown = TokenBreakdown {
        text_token,
        form_token,
        button_token,
        feature_token,
        features: features.into_iter().map(str::to_string).collect(),
        form_count,
        button_count,
    };
    let total = breakdown.total();

    PageResult {
        url: url.to_string(),
        min_token: total.min,
        max_token: total.max,
        details: PageDetails::Breakdown(breakdown),
    }
}

/// Downloads and estimates pages one at a time
#[derive(Debug, Clone, Copy)]
pub struct PageAnalyzer<'a> {
    fetcher: &'a HttpFetcher,
    tokenizer: &'a Tokenizer,
    timeout: Duration,
}

impl<'a> PageAnalyzer<'a> {
    pub fn new(fetcher: &'a HttpFetcher, tokenizer: &'a Tokenizer, timeout: Duration) -> Self {
        Self {
            fetcher,
            tokenizer,
            timeout,
        }
    }

    /// Fetches `url` and estimates it
    ///
    /// Network failures, timeouts and non-2xx statuses come back as a
    /// zero-token result instead of an error.
    pub async fn analyze_page(&self, url: &str) -> PageResult {
        let markup = match self
            .fetcher
            .get_text(url, self.timeout, StatusPolicy::RequireSuccess)
            .await
        {
            Ok(markup) => markup,
            Err(e) => {
                warn!(%url, error = %e, "page could not be fetched");
                return PageResult::failed(url, e);
            }
        };

        let result = estimate_markup(url, &markup, self.tokenizer);
        debug!(
            %url,
            min_token = result.min_token,
            max_token = result.max_token,
            "page estimated"
        );
        result
    }
}
