// src/page/range.rs
// =============================================================================
// A (min, max) token range.
//
// Every estimate in this crate is a range rather than a single number. In
// JSON a range is written as a two-element array `[min, max]`, which is what
// the `from`/`into` serde attributes below arrange.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct TokenRange {
    pub min: u64,
    pub max: u64,
}

impl TokenRange {
    pub const ZERO: TokenRange = TokenRange::new(0, 0);

    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// `count` copies of a per-item cost
    pub fn per_item(count: usize, cost: TokenRange) -> Self {
        let count = count as u64;
        Self::new(count * cost.min, count * cost.max)
    }

    /// Scales a base count by two factors, truncating toward zero
    pub fn scaled(base: usize, min_factor: f64, max_factor: f64) -> Self {
        Self::new(base as u64, base as u64).scale(min_factor, max_factor)
    }

    /// Scales each end by its own factor, truncating toward zero
    pub fn scale(self, min_factor: f64, max_factor: f64) -> Self {
        Self::new(
            (self.min as f64 * min_factor) as u64,
            (self.max as f64 * max_factor) as u64,
        )
    }
}

impl Add for TokenRange {
    type Output = TokenRange;

    fn add(self, other: TokenRange) -> TokenRange {
        TokenRange::new(self.min + other.min, self.max + other.max)
    }
}

impl Sum for TokenRange {
    fn sum<I: Iterator<Item = TokenRange>>(iter: I) -> TokenRange {
        iter.fold(TokenRange::ZERO, Add::add)
    }
}

impl From<(u64, u64)> for TokenRange {
    fn from((min, max): (u64, u64)) -> Self {
        Self::new(min, max)
    }
}

impl From<TokenRange> for (u64, u64) {
    fn from(range: TokenRange) -> Self {
        (range.min, range.max)
    }
}
