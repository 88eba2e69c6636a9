// src/crawl/queue.rs
// =============================================================================
// Discovers the pages of a website with a breadth-first crawl.
//
// How it works:
// 1. Start with the seed URL in a queue at depth 0
// 2. Pop the next (url, depth); skip it if already visited or too deep.
//    The seed is reported exactly as given, but it is deduplicated under its
//    normalised form so a link back to "/" does not visit it again
// 3. Record it, fetch the HTML, extract all <a href> links
// 4. Queue links on the same host and port as the seed at depth + 1
// 5. Repeat until the queue is empty or we have max_pages URLs
//
// The crawl only returns URLs. Analyzing them is the caller's job, so pages
// are fetched once here for their links and again later for the estimate.
//
// A page that fails to download is still part of the result, it just
// contributes no links. Nothing in here returns an error.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - Url: For parsing links and comparing hosts
// =============================================================================

use crate::config::CrawlLimits;
use crate::fetch::{HttpFetcher, StatusPolicy};
use crate::page::parse_page;
use scraper::Selector;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};
use url::Url;

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: String,
    // Normalised URL used for the visited set
    key: String,
    depth: usize, // How many link hops from the seed
}

/// Host and port a link must share with the seed to be followed
///
/// The port is the effective one, so `http://a.com` and `http://a.com:80`
/// are the same site while `http://a.com` and `https://a.com` are not.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NetLocation {
    host: String,
    port: Option<u16>,
}

impl NetLocation {
    fn of(url: &Url) -> Option<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }
        Some(Self {
            host: url.host_str()?.to_string(),
            port: url.port_or_known_default(),
        })
    }
}

// Crawls a website starting from a URL
//
// Parameters:
//   fetcher: shared HTTP client
//   start_url: where to start; returned as given, deduplicated as
//              "https://a.com/" when given as "https://a.com"
//   limits: page budget, depth budget and per-fetch timeout
//
// Returns: discovered URLs in the order they were taken off the queue,
// seed first
pub async fn crawl_website(
    fetcher: &HttpFetcher,
    start_url: &str,
    limits: CrawlLimits,
) -> Vec<String> {
    let seed = Url::parse(start_url).ok().map(normalize);
    let seed_site = seed.as_ref().and_then(NetLocation::of);
    let seed_key = seed
        .map(|url| url.to_string())
        .unwrap_or_else(|| start_url.to_string());

    info!(
        url = %start_url,
        max_pages = limits.max_pages,
        max_depth = limits.max_depth,
        "starting crawl"
    );

    let mut queue = VecDeque::new();
    queue.push_back(CrawlItem {
        url: start_url.to_string(),
        key: seed_key,
        depth: 0,
    });

    let mut visited = HashSet::new();
    let mut discovered = Vec::new();

    while visited.len() < limits.max_pages {
        let Some(item) = queue.pop_front() else {
            break;
        };

        if item.depth > limits.max_depth || !visited.insert(item.key.clone()) {
            continue;
        }

        debug!(depth = item.depth, url = %item.url, "discovered page");
        discovered.push(item.url.clone());

        // Links from the deepest level would all be too deep to visit
        if item.depth == limits.max_depth {
            continue;
        }
        let Some(site) = seed_site.as_ref() else {
            continue;
        };

        let html = match fetcher
            .get_text(&item.url, limits.timeout, StatusPolicy::AcceptAny)
            .await
        {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %item.url, error = %e, "skipping links of page");
                continue;
            }
        };

        for link in extract_same_site_links(&html, &item.url, site) {
            if !visited.contains(&link) {
                queue.push_back(CrawlItem {
                    key: link.clone(),
                    url: link,
                    depth: item.depth + 1,
                });
            }
        }
    }

    info!(pages = discovered.len(), "crawl finished");
    discovered
}

// Extracts links from HTML that point at the crawled site
//
// Links are returned in the order they appear in the page
fn extract_same_site_links(html: &str, page_url: &str, site: &NetLocation) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    let document = parse_page(html);
    // Constant selector, always valid
    let selector = Selector::parse("a[href]").expect("valid selector");

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(&base, href) else {
            continue;
        };
        if NetLocation::of(&url).as_ref() == Some(site) {
            links.push(url.to_string());
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base.join(href).ok().map(normalize)
}

// `page#a` and `page#b` are the same page
fn normalize(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why check the depth when popping instead of when pushing?
//    - A URL can be queued several times from different pages
//    - Checking on pop keeps the rule in one place: whatever comes off the
//      queue too deep or already seen is dropped
//
// 2. Why is `visited.insert(...)` inside the if?
//    - HashSet::insert returns false when the value was already present,
//      so one call both checks and marks the URL
//
// 3. Why does the loop condition use visited.len()?
//    - Every visited URL is also discovered, so this is the page budget
//
// 4. What does port_or_known_default() do?
//    - Returns the explicit port, or 80/443 for http/https
//    - Makes "http://a.com" and "http://a.com:80" compare equal
// -----------------------------------------------------------------------------
