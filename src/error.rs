// src/error.rs
// =============================================================================
// Typed errors for the estimator.
//
// Two kinds of failure exist:
// - EstimateError: something went wrong while starting up (tokenizer table,
//   HTTP client). These are fatal and end the process.
// - FetchError: a single page could not be downloaded. These are always
//   recovered - the analyzer turns them into a zero-token page and the
//   crawler simply stops expanding that page.
//
// The Display text of FetchError is exactly what ends up in the
// `details.error` field of a failed page, so keep the messages readable.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Fatal errors that can only happen while the process is initialising
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("failed to load tokenizer encoding '{encoding}': {reason}")]
    Tokenizer {
        encoding: &'static str,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Why a single page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP {status} for url: {url}")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Sorts a reqwest error into the variant that best describes it
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect { url, source: error }
        } else {
            FetchError::Transport { url, source: error }
        }
    }
}
