// src/tokenizer.rs
// =============================================================================
// Counts tokens with the cl100k_base byte-pair encoding.
//
// Loading the encoding table is expensive (it builds a large rank map), so
// it happens exactly once per process. `Tokenizer::shared()` hands out a
// `&'static Tokenizer` that every page analysis borrows.
//
// Rust concepts:
// - OnceCell: a cell that is written once and then only read
// - get_or_try_init: like lazy init, but the init closure may fail
// =============================================================================

use crate::error::EstimateError;
use once_cell::sync::OnceCell;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Name of the encoding we count with
pub const ENCODING_NAME: &str = "cl100k_base";

static SHARED: OnceCell<Tokenizer> = OnceCell::new();

/// A loaded BPE encoding
pub struct Tokenizer {
    bpe: CoreBPE,
}

impl Tokenizer {
    /// Returns the process-wide tokenizer, loading it on first use
    ///
    /// Call this during startup so a missing encoding table fails the
    /// process before any request is handled.
    pub fn shared() -> Result<&'static Tokenizer, EstimateError> {
        SHARED.get_or_try_init(|| {
            let bpe = cl100k_base().map_err(|e| EstimateError::Tokenizer {
                encoding: ENCODING_NAME,
                reason: e.to_string(),
            })?;
            Ok(Tokenizer { bpe })
        })
    }

    /// Number of tokens in `text`
    ///
    /// Special-token markers such as `<|endoftext|>` are treated as plain
    /// text, since page content is never a prompt.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("encoding", &ENCODING_NAME)
            .finish()
    }
}
