//! Query matching.
//!
//! Two strategies implement [`QueryMatcher`]:
//!
//! - [`CharClassMatcher`]: folds case, width and kana class, then checks
//!   substring containment. Never suspends and cannot fail.
//! - [`ReadingMatcher`]: normalizes both sides to readings first, so a kanji
//!   query finds a kana target and the other way round. Can fail when the
//!   reading analyzer fails.
//!
//! [`SearchMatcher`] is what callers use: it picks a strategy from
//! [`MatchMode`] and turns reading failures into a character-class match.

use crate::dictionary::ScriptDictionary;
use crate::error::{Result, SearchError};
use crate::kana;
use crate::normalizer::{NormalizationCache, NormalizedText, Normalizer};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub use kondate_core::config::MatchMode;

/// Decides whether a query matches a candidate string.
pub trait QueryMatcher: Send + Sync {
    /// Match `query` against `target`. An empty query matches everything.
    fn try_matches(&self, query: &str, target: &str) -> impl Future<Output = Result<bool>> + Send;
}

/// Which path produced a match decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPath {
    /// Character-class folding only
    CharClass,
    /// Full reading normalization
    Normalized,
    /// Reading normalization failed; character-class folding decided
    Fallback,
}

/// A match decision plus the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub matched: bool,
    pub path: MatchPath,
}

/// The query with surrounding whitespace removed, or `None` if nothing is left.
#[inline]
fn effective_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Folding-only matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharClassMatcher;

impl CharClassMatcher {
    pub fn matches(&self, query: &str, target: &str) -> bool {
        let Some(query) = effective_query(query) else {
            return true;
        };
        kana::fold(target).contains(kana::fold(query).as_ref())
    }
}

impl QueryMatcher for CharClassMatcher {
    async fn try_matches(&self, query: &str, target: &str) -> Result<bool> {
        Ok(self.matches(query, target))
    }
}

/// Reading-based matcher.
#[derive(Debug, Clone)]
pub struct ReadingMatcher {
    normalizer: Arc<Normalizer>,
    cache: Option<Arc<NormalizationCache>>,
}

impl ReadingMatcher {
    pub fn new(normalizer: Arc<Normalizer>) -> Self {
        Self {
            normalizer,
            cache: None,
        }
    }

    /// Memoize normalized forms in `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<NormalizationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn normalized(&self, text: &str) -> Result<NormalizedText> {
        match &self.cache {
            Some(cache) => cache.get_or_try_insert(text, |t| self.normalizer.try_normalize(t)),
            None => self.normalizer.try_normalize(text),
        }
    }

    /// Match without suspending.
    ///
    /// Folded containment also counts, so on input that is already in one
    /// script this agrees with [`CharClassMatcher`].
    pub fn try_matches_now(&self, query: &str, target: &str) -> Result<bool> {
        let Some(query) = effective_query(query) else {
            return Ok(true);
        };
        let normalized_query = self.normalized(query)?;
        let normalized_target = self.normalized(target)?;
        Ok(normalized_target.contains(&normalized_query) || CharClassMatcher.matches(query, target))
    }
}

impl QueryMatcher for ReadingMatcher {
    async fn try_matches(&self, query: &str, target: &str) -> Result<bool> {
        self.try_matches_now(query, target)
    }
}

/// Counts of match decisions by path.
#[derive(Debug, Default)]
struct MatchStats {
    char_class: AtomicU64,
    normalized: AtomicU64,
    fallbacks: AtomicU64,
}

/// Point-in-time copy of [`SearchMatcher`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStatsSnapshot {
    pub char_class: u64,
    pub normalized: u64,
    pub fallbacks: u64,
}

/// Strategy-selecting matcher with a local fallback.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    reading: ReadingMatcher,
    mode: MatchMode,
    stats: Arc<MatchStats>,
}

impl SearchMatcher {
    pub fn new(normalizer: Arc<Normalizer>) -> Self {
        Self {
            reading: ReadingMatcher::new(normalizer),
            mode: MatchMode::default(),
            stats: Arc::new(MatchStats::default()),
        }
    }

    /// Matcher over a dictionary with no morphological fallback.
    pub fn from_dictionary(dictionary: Arc<ScriptDictionary>) -> Self {
        Self::new(Arc::new(Normalizer::new(dictionary)))
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn normalizer(&self) -> &Arc<Normalizer> {
        &self.reading.normalizer
    }

    /// A copy with its own normalization cache, for one search session.
    /// Counters stay shared with `self`.
    #[must_use]
    pub fn session_scoped(&self) -> Self {
        Self {
            reading: self
                .reading
                .clone()
                .with_cache(Arc::new(NormalizationCache::new())),
            mode: self.mode,
            stats: Arc::clone(&self.stats),
        }
    }

    /// Folding-only match; never suspends.
    pub fn matches_sync(&self, query: &str, target: &str) -> bool {
        CharClassMatcher.matches(query, target)
    }

    /// Match according to the configured mode, without suspending.
    pub fn match_now(&self, query: &str, target: &str) -> MatchResult {
        match self.mode {
            MatchMode::Sync => {
                self.stats.char_class.fetch_add(1, Ordering::Relaxed);
                MatchResult {
                    matched: self.matches_sync(query, target),
                    path: MatchPath::CharClass,
                }
            }
            MatchMode::Normalized => match self.reading.try_matches_now(query, target) {
                Ok(matched) => {
                    self.stats.normalized.fetch_add(1, Ordering::Relaxed);
                    MatchResult {
                        matched,
                        path: MatchPath::Normalized,
                    }
                }
                Err(e) => self.fallback(query, target, &e),
            },
        }
    }

    fn fallback(&self, query: &str, target: &str, error: &SearchError) -> MatchResult {
        warn!(query, error = %error, "Reading match failed, falling back to character folding");
        self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
        MatchResult {
            matched: self.matches_sync(query, target),
            path: MatchPath::Fallback,
        }
    }

    /// Match with the path that decided it.
    pub async fn match_detailed(&self, query: &str, target: &str) -> MatchResult {
        let result = self.match_now(query, target);
        debug!(query, target, matched = result.matched, path = ?result.path, "Matched");
        result
    }

    /// Match according to the configured mode. Never fails.
    pub async fn matches(&self, query: &str, target: &str) -> bool {
        self.match_detailed(query, target).await.matched
    }

    /// Canonical form used for comparison.
    pub async fn normalize(&self, text: &str) -> NormalizedText {
        self.reading.normalizer.normalize(text)
    }

    pub fn stats(&self) -> MatchStatsSnapshot {
        MatchStatsSnapshot {
            char_class: self.stats.char_class.load(Ordering::Relaxed),
            normalized: self.stats.normalized.load(Ordering::Relaxed),
            fallbacks: self.stats.fallbacks.load(Ordering::Relaxed),
        }
    }
}

impl QueryMatcher for SearchMatcher {
    async fn try_matches(&self, query: &str, target: &str) -> Result<bool> {
        Ok(self.match_now(query, target).matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::ReadingAnalyzer;
    use proptest::prelude::*;

    fn matcher() -> SearchMatcher {
        SearchMatcher::from_dictionary(Arc::new(ScriptDictionary::builtin()))
    }

    struct BrokenAnalyzer;

    impl ReadingAnalyzer for BrokenAnalyzer {
        fn reading(&self, run: &str) -> Result<Option<String>> {
            Err(SearchError::Analysis {
                input: run.to_string(),
                message: "dictionary not loaded".into(),
            })
        }
    }

    fn broken_matcher() -> SearchMatcher {
        let normalizer = Normalizer::new(Arc::new(ScriptDictionary::empty()))
            .with_analyzer(Arc::new(BrokenAnalyzer));
        SearchMatcher::new(Arc::new(normalizer))
    }

    #[test]
    fn test_sync_folds_kana_and_case() {
        let m = CharClassMatcher;
        assert!(m.matches("タマネギ", "新たまねぎのサラダ"));
        assert!(m.matches("TOFU", "Silken tofu"));
        assert!(m.matches("ﾄｳﾌ", "とうふ"));
        assert!(!m.matches("たまねぎ", "玉ねぎ"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let m = matcher();
        assert!(m.matches_sync("", "肉じゃが"));
        assert!(m.matches_sync("   ", ""));
        assert!(m.match_now("", "anything").matched);
    }

    #[tokio::test]
    async fn test_cross_script_matching() {
        let m = matcher();
        assert!(m.matches("たまねぎ", "玉ねぎ").await);
        assert!(m.matches("タマネギ", "玉ねぎ").await);
        assert!(m.matches("玉ねぎ", "たまねぎ").await);
        assert!(m.matches("醤油", "しょうゆ大さじ1").await);
        assert!(!m.matches("醤油", "みそ").await);
    }

    #[tokio::test]
    async fn test_kanji_prefix_of_compound() {
        // 牛 reads ぎゅう and 牛肉 reads ぎゅうにく
        let m = matcher();
        assert!(m.matches("牛", "牛肉のしぐれ煮").await);
    }

    #[tokio::test]
    async fn test_match_detailed_reports_path() {
        let m = matcher();
        let result = m.match_detailed("にんじん", "人参").await;
        assert_eq!(result, MatchResult { matched: true, path: MatchPath::Normalized });

        let sync = matcher().with_mode(MatchMode::Sync);
        let result = sync.match_detailed("にんじん", "人参").await;
        assert_eq!(result, MatchResult { matched: false, path: MatchPath::CharClass });
    }

    #[tokio::test]
    async fn test_fallback_on_analyzer_failure() {
        let m = broken_matcher();

        let result = m.match_detailed("たまねぎ", "筑前煮とタマネギ").await;
        assert_eq!(result, MatchResult { matched: true, path: MatchPath::Fallback });

        let result = m.match_detailed("ごぼう", "筑前煮").await;
        assert_eq!(result, MatchResult { matched: false, path: MatchPath::Fallback });

        assert_eq!(m.stats().fallbacks, 2);
    }

    #[tokio::test]
    async fn test_reading_matcher_surfaces_errors() {
        let normalizer = Normalizer::new(Arc::new(ScriptDictionary::empty()))
            .with_analyzer(Arc::new(BrokenAnalyzer));
        let reading = ReadingMatcher::new(Arc::new(normalizer));
        assert!(reading.try_matches("ごぼう", "筑前煮").await.is_err());
        assert!(reading.try_matches("ごぼう", "きんぴらごぼう").await.unwrap());
    }

    #[tokio::test]
    async fn test_session_scoped_shares_counters() {
        let m = matcher();
        let scoped = m.session_scoped();
        assert!(scoped.matches("人参", "にんじんしりしり").await);
        assert_eq!(m.stats().normalized, 1);
    }

    #[tokio::test]
    async fn test_normalize() {
        let m = matcher();
        assert_eq!(m.normalize("ニンジン").await.as_str(), "にんじん");
    }

    proptest! {
        #[test]
        fn sync_and_async_agree_on_hiragana(q in "[ぁ-ん]{0,3}", t in "[ぁ-ん]{0,12}") {
            let m = matcher();
            let sync = m.matches_sync(&q, &t);
            let normalized = m.match_now(&q, &t).matched;
            prop_assert_eq!(sync, normalized);
        }

        #[test]
        fn sync_and_async_agree_on_katakana(q in "[ァ-ヶ]{0,3}", t in "[ァ-ヶ]{0,12}") {
            let m = matcher();
            prop_assert_eq!(m.matches_sync(&q, &t), m.match_now(&q, &t).matched);
        }

        #[test]
        fn sync_and_async_agree_on_latin(q in "[a-z]{0,3}", t in "[a-z ]{0,12}") {
            let m = matcher();
            prop_assert_eq!(m.matches_sync(&q, &t), m.match_now(&q, &t).matched);
        }

        #[test]
        fn empty_query_always_matches(t in "\\PC{0,16}") {
            prop_assert!(CharClassMatcher.matches("", &t));
            prop_assert!(matcher().match_now("", &t).matched);
        }
    }
}
