//! Mixed-script recipe search for kondate.
//!
//! This crate provides:
//! - Kana, width and case folding
//! - A kanji reading dictionary and reading normalizer
//! - Sync and reading-aware query matching with local fallback
//! - Pantry ingredient scoring and recipe ranking
//! - Debounced search sessions (feature `session`)

pub mod dictionary;
mod error;
pub mod filter;
pub mod kana;
pub mod matcher;
pub mod normalizer;
pub mod ranker;
pub mod scorer;

#[cfg(feature = "session")]
pub mod session;

#[cfg(feature = "wasm")]
mod wasm;

pub use dictionary::ScriptDictionary;
pub use error::{Result, SearchError};
pub use filter::{filter_candidates_sync, filter_recipes};
pub use matcher::{
    CharClassMatcher, MatchMode, MatchPath, MatchResult, QueryMatcher, ReadingMatcher,
    SearchMatcher,
};
pub use normalizer::{NormalizationCache, NormalizedText, Normalizer, ReadingAnalyzer};
pub use ranker::{rank, sort_recipes, SortKey};
pub use scorer::{score, Selection};

#[cfg(feature = "session")]
pub use session::{SearchResults, SearchSession, SessionConfig, SessionMachine, SessionState};

use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_MATCHER: Lazy<SearchMatcher> =
    Lazy::new(|| SearchMatcher::from_dictionary(Arc::new(ScriptDictionary::builtin())));

/// Matcher over the bundled dictionary, shared by the free functions below.
pub fn default_matcher() -> &'static SearchMatcher {
    &DEFAULT_MATCHER
}

/// Canonical form of `text` used for search comparisons.
pub async fn normalize_text_for_search(text: &str) -> String {
    default_matcher().normalize(text).await.into_string()
}

/// Reading-aware match. Never fails: falls back to character folding.
pub async fn matches_search_query(query: &str, target: &str) -> bool {
    default_matcher().matches(query, target).await
}

/// Character-folding match; never suspends.
pub fn matches_search_query_sync(query: &str, target: &str) -> bool {
    CharClassMatcher.matches(query, target)
}
