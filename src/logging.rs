// src/logging.rs
// =============================================================================
// Sets up tracing output.
//
// Logs go to stderr so that `--json` output on stdout stays machine-readable.
// RUST_LOG wins if it is set; otherwise we log at `info` (or `debug` with
// --verbose).
// =============================================================================

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
