// src/page/mod.rs
// =============================================================================
// Everything about estimating a single page.
//
// Submodules:
// - range: the (min, max) token range type
// - features: keyword-based feature detection and feature costs
// - html: parsing, visible text, form and submit-button counting
// - estimate: combines the signals into a PageResult, and fetches pages
// =============================================================================

mod estimate;
mod features;
mod html;
mod range;

pub use estimate::{PageAnalyzer, PageDetails, PageResult};
pub use html::parse_page;
pub use features::FEATURES;
pub use range::TokenRange;
