// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling for full-site estimates.
//
// Features:
// - Breadth-first crawling starting from a URL
// - Same-site restriction (same host and port as the start page)
// - Page budget and depth budget
// - Every crawl owns its own queue and visited set; nothing is shared
//   between runs
// =============================================================================

mod queue;

// Re-export the main crawling function
pub use queue::crawl_website;
