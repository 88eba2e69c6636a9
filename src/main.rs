// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the tokenizer and build the HTTP client once
// 3. Run the requested analysis
// 4. Print the result as a table or JSON
// 5. Exit with proper code (0 = all pages analyzed, 1 = some pages failed,
//    2 = error)
// =============================================================================

mod analysis; // src/analysis.rs - analyze(mode, main_url, other_urls)
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - timeouts and crawl budgets
mod crawl; // src/crawl/ - breadth-first site crawling
mod error; // src/error.rs - typed errors
mod fetch; // src/fetch.rs - HTTP fetching
mod logging; // src/logging.rs - tracing setup
mod page; // src/page/ - per-page estimation
mod tokenizer; // src/tokenizer.rs - BPE token counting

use analysis::{AnalysisResult, Estimator};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::EstimatorConfig;
use fetch::HttpFetcher;
use page::{PageDetails, FEATURES};
use std::path::Path;
use std::time::Duration;
use tokenizer::Tokenizer;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every page was analyzed
//   Ok(1) = at least one page could not be fetched
//   Err   = fatal error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Analyze {
            main_url,
            mode,
            mut other_urls,
            urls_file,
            json,
            max_pages,
            max_depth,
            page_timeout,
            crawl_timeout,
        } => {
            if let Some(path) = urls_file {
                other_urls.extend(read_urls_file(&path)?);
            }

            let config = EstimatorConfig {
                page_timeout: Duration::from_secs(page_timeout),
                crawl_timeout: Duration::from_secs(crawl_timeout),
                full_max_pages: max_pages,
                full_max_depth: max_depth,
                ..EstimatorConfig::default()
            };

            handle_analyze(&mode, &main_url, &other_urls, config, json).await
        }
        Commands::Features { json } => {
            print_features(json)?;
            Ok(0)
        }
    }
}

async fn handle_analyze(
    mode: &str,
    main_url: &str,
    other_urls: &[String],
    config: EstimatorConfig,
    json: bool,
) -> Result<i32> {
    // Both of these are loaded once and shared by every page
    let tokenizer = Tokenizer::shared().context("initialize tokenizer")?;
    let fetcher = HttpFetcher::new(&config.user_agent).context("initialize HTTP client")?;

    let estimator = Estimator::new(&fetcher, tokenizer, config);
    let others = (!other_urls.is_empty()).then_some(other_urls);
    let result = estimator.analyze(mode, main_url, others).await;

    print_result(&result, json)?;

    if result.failed_pages() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// One URL per line; blank lines and lines starting with '#' are skipped
fn read_urls_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read URL list {}", path.display()))?;
    Ok(parse_url_list(&content))
}

fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn print_result(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
    } else {
        print_table(result);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(result: &AnalysisResult) {
    println!("{:<60} {:>10} {:>10}  {:<30}", "URL", "MIN", "MAX", "FEATURES / ERROR");
    println!("{}", "=".repeat(114));

    for page in &result.pages {
        let url_display = if page.url.chars().count() > 57 {
            format!("{}...", page.url.chars().take(57).collect::<String>())
        } else {
            page.url.clone()
        };

        let note = match &page.details {
            PageDetails::Breakdown(b) => b.features.join(", "),
            PageDetails::Failed { error } => format!("error: {}", error),
        };

        println!(
            "{:<60} {:>10} {:>10}  {:<30}",
            url_display, page.min_token, page.max_token, note
        );
    }

    println!();
    println!("Summary ({} mode):", result.mode);
    println!("   Pages: {}", result.pages.len());
    println!("   Failed: {}", result.failed_pages());
    println!(
        "   Tokens: {} - {}",
        result.total_min_token, result.total_max_token
    );
    if let (Some(min), Some(max)) = (result.full_min_token, result.full_max_token) {
        println!("   Whole site (extrapolated): {} - {}", min, max);
    }
}

fn print_features(json: bool) -> Result<()> {
    if json {
        let rows: Vec<_> = FEATURES
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name,
                    "patterns": f.patterns,
                    "token": f.cost,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<18} {:>12}  {}", "FEATURE", "TOKENS", "KEYWORDS");
    println!("{}", "=".repeat(80));
    for f in FEATURES {
        let tokens = format!("{}-{}", f.cost.min, f.cost.max);
        println!("{:<18} {:>12}  {}", f.name, tokens, f.patterns.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_list_skips_blank_and_comments() {
        let content = "https://a.com/x\n\n  https://a.com/y  \n# later\n";
        assert_eq!(parse_url_list(content), vec!["https://a.com/x", "https://a.com/y"]);
    }

    #[test]
    fn test_read_missing_urls_file_fails() {
        let result = read_urls_file(Path::new("/definitely/not/here.txt"));
        assert!(result.is_err());
    }
}
