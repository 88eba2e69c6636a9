// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - analyze: estimate tokens for a page, a list of pages, or a whole site
// - features: print the feature table with its token costs
// =============================================================================

use crate::config::{
    DEFAULT_CRAWL_TIMEOUT_SECS, DEFAULT_FULL_MAX_DEPTH, DEFAULT_FULL_MAX_PAGES,
    DEFAULT_PAGE_TIMEOUT_SECS,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-token-estimator",
    version,
    about = "Estimate how many LLM tokens it takes to rebuild a website as code",
    long_about = "site-token-estimator fetches a website's pages, measures their text, forms, \
                  buttons and features, and turns that into a min/max token estimate."
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate tokens for a website
    ///
    /// Example: site-token-estimator analyze https://example.com --mode full
    Analyze {
        /// The main page URL (e.g., https://example.com)
        main_url: String,

        /// basic = main page only, smart = main page + --url pages,
        /// full = crawl the site
        ///
        /// Kept as a plain string: an unknown mode gives an empty result
        /// rather than an error.
        #[arg(long, default_value = "basic")]
        mode: String,

        /// Extra page to analyze in smart mode (repeatable)
        #[arg(long = "url", value_name = "URL")]
        other_urls: Vec<String>,

        /// File with extra pages for smart mode, one URL per line
        #[arg(long, value_name = "PATH")]
        urls_file: Option<PathBuf>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Page budget for full mode
        #[arg(long, default_value_t = DEFAULT_FULL_MAX_PAGES)]
        max_pages: usize,

        /// Depth budget for full mode (the main page is depth 0)
        #[arg(long, default_value_t = DEFAULT_FULL_MAX_DEPTH)]
        max_depth: usize,

        /// Seconds to wait for each analyzed page
        #[arg(long, default_value_t = DEFAULT_PAGE_TIMEOUT_SECS)]
        page_timeout: u64,

        /// Seconds to wait for each crawled page
        #[arg(long, default_value_t = DEFAULT_CRAWL_TIMEOUT_SECS)]
        crawl_timeout: u64,
    },

    /// List the detectable features and what each one costs
    Features {
        /// Output in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}
