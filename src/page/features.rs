// src/page/features.rs
// =============================================================================
// Detects which interactive features a page probably has.
//
// Each feature (login, payment, video, ...) has a handful of keywords and an
// empirical token cost for building it. We lowercase the raw HTML - tags,
// attributes, scripts and all - and search for every keyword. A feature is
// present if any of its keywords appears anywhere.
//
// Matching is loose: no anchors, no word boundaries. "uploading"
// counts as "upload", and "paypal" counts as "pay".
//
// The table below is the single source of truth. On first use it is compiled
// into two keyed maps (name -> regexes, name -> cost) that live for the rest
// of the process.
// =============================================================================

use super::range::TokenRange;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// One row of the feature table
#[derive(Debug, Clone, Copy)]
pub struct FeatureDefinition {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub cost: TokenRange,
}

const fn feature(
    name: &'static str,
    patterns: &'static [&'static str],
    min: u64,
    max: u64,
) -> FeatureDefinition {
    FeatureDefinition {
        name,
        patterns,
        cost: TokenRange::new(min, max),
    }
}

pub const FEATURES: &[FeatureDefinition] = &[
    feature("login", &["login", "sign in", "log in"], 2500, 3500),
    feature("register", &["register", "sign up", "create account"], 2500, 3500),
    feature("search", &["search", "find"], 1800, 2500),
    feature("upload", &["upload", "choose file"], 2000, 3000),
    feature("pay", &["pay", "payment", "checkout"], 3500, 5000),
    feature("reset_password", &["reset password", "forgot password"], 1500, 2200),
    feature(
        "image_processing",
        &[
            "image",
            "photo",
            "picture",
            "gallery",
            "edit image",
            "compress image",
            "optimize image",
        ],
        2500,
        3500,
    ),
    feature(
        "video",
        &["video", "youtube", "vimeo", "play video", "embed video"],
        2500,
        3500,
    ),
    feature(
        "optimization",
        &["optimize", "performance", "compress", "cache"],
        1200,
        2000,
    ),
    feature("comment", &["comment", "reply", "leave a comment"], 1500, 2200),
    feature("like", &["like", "upvote", "favourite", "favorite"], 800, 1200),
    feature("share", &["share", "send to", "forward"], 1000, 1500),
    feature(
        "map",
        &["map", "location", "google maps", "baidu map"],
        1800,
        2500,
    ),
    feature("export", &["export", "download", "csv", "pdf"], 1200, 1800),
    feature("import", &["import", "upload data", "parse file"], 1200, 1800),
    feature(
        "data_analysis",
        &["chart", "graph", "statistics", "analytics", "data analysis"],
        3000,
        5000,
    ),
    feature(
        "ai_chat",
        &["chatbot", "ai assistant", "ask ai", "chat with ai"],
        4000,
        6000,
    ),
];

/// The compiled form of `FEATURES`
struct FeatureTable {
    patterns: BTreeMap<&'static str, Vec<Regex>>,
    costs: BTreeMap<&'static str, TokenRange>,
}

impl FeatureTable {
    fn build() -> Self {
        let mut patterns = BTreeMap::new();
        let mut costs = BTreeMap::new();

        for def in FEATURES {
            // The patterns are compile-time constants, so a failure here is a
            // programmer error caught by the tests below.
            let compiled = def
                .patterns
                .iter()
                .map(|p| Regex::new(p).expect("feature pattern must be a valid regex"))
                .collect();
            patterns.insert(def.name, compiled);
            costs.insert(def.name, def.cost);
        }

        Self { patterns, costs }
    }
}

static TABLE: Lazy<FeatureTable> = Lazy::new(FeatureTable::build);

/// Returns the names of every feature whose keywords appear in `markup`
///
/// The result is ordered by name so the same markup always produces the
/// same output.
pub fn detect_features(markup: &str) -> BTreeSet<&'static str> {
    let lowered = markup.to_lowercase();

    TABLE
        .patterns
        .iter()
        .filter(|(_, regexes)| regexes.iter().any(|re| re.is_match(&lowered)))
        .map(|(name, _)| *name)
        .collect()
}

/// Token cost of a single feature, if it exists
pub fn feature_cost(name: &str) -> Option<TokenRange> {
    TABLE.costs.get(name).copied()
}

/// Sum of the costs of the given features
pub fn features_cost<'a>(names: impl IntoIterator<Item = &'a str>) -> TokenRange {
    names.into_iter().filter_map(feature_cost).sum()
}
