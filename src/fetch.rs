// src/fetch.rs
// =============================================================================
// The one place that talks to the network.
//
// Both the page analyzer and the crawler download HTML through an
// `HttpFetcher`. It wraps a single reqwest Client (so connections are pooled
// across pages) and applies a per-request timeout, because the analyzer and
// the crawler use different timeouts.
//
// The two callers also disagree on status codes:
// - the analyzer treats any non-2xx response as a failed page
// - the crawler still reads links out of error pages (a custom 404 page
//   often links back into the site)
// `StatusPolicy` selects between the two.
//
// Rust concepts:
// - async/await: each fetch yields to the runtime while waiting on the network
// - Result<T, E>: failures are returned as a typed FetchError, never panics
// =============================================================================

use crate::error::{EstimateError, FetchError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// What to do with a response whose status is not 2xx
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Non-2xx responses are an error
    RequireSuccess,
    /// Any response body is returned
    AcceptAny,
}

/// Downloads pages as text
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the shared HTTP client
    pub fn new(user_agent: &str) -> Result<Self, EstimateError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// GETs `url` and returns the body as text
    ///
    /// No retries: one call is one request.
    pub async fn get_text(
        &self,
        url: &str,
        timeout: Duration,
        policy: StatusPolicy,
    ) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        debug!(%url, ?timeout, "fetching page");

        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if policy == StatusPolicy::RequireSuccess && !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new("test-agent").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let body = fetcher()
            .get_text(&server.uri(), Duration::from_secs(5), StatusPolicy::RequireSuccess)
            .await
            .unwrap();
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_error_status_depends_on_policy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<a href='/'>home</a>"))
            .mount(&server)
            .await;
        let url = format!("{}/gone", server.uri());

        let strict = fetcher()
            .get_text(&url, Duration::from_secs(5), StatusPolicy::RequireSuccess)
            .await;
        assert!(matches!(strict, Err(FetchError::Status { status, .. }) if status.as_u16() == 404));

        let lenient = fetcher()
            .get_text(&url, Duration::from_secs(5), StatusPolicy::AcceptAny)
            .await
            .unwrap();
        assert!(lenient.contains("home"));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let result = fetcher()
            .get_text(&server.uri(), Duration::from_millis(100), StatusPolicy::AcceptAny)
            .await;
        assert!(matches!(result, Err(FetchError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_sending() {
        let result = fetcher()
            .get_text("not a url", Duration::from_secs(1), StatusPolicy::AcceptAny)
            .await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
