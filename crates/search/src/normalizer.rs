//! Script normalization: mixed kanji/kana/Latin text to canonical hiragana.
//!
//! The pipeline is:
//! 1. character-class folding ([`crate::kana::fold`]),
//! 2. longest-match dictionary lookahead from every kanji or hiragana
//!    position,
//! 3. unmatched kanji runs go to an optional [`ReadingAnalyzer`], or pass
//!    through unchanged.
//!
//! Unknown vocabulary never fails; it only leaves kanji in the output.

use crate::dictionary::ScriptDictionary;
use crate::error::Result;
use crate::kana;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// Canonical, comparable form of a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Substring containment on canonical forms.
    pub fn contains(&self, other: &NormalizedText) -> bool {
        self.0.contains(other.0.as_str())
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NormalizedText> for String {
    fn from(text: NormalizedText) -> Self {
        text.0
    }
}

/// Morphological fallback for kanji runs the dictionary does not know.
///
/// Returning `Ok(None)` means "no reading"; the run is kept as is.
/// Readings may be katakana; they are folded before use.
pub trait ReadingAnalyzer: Send + Sync {
    fn reading(&self, run: &str) -> Result<Option<String>>;
}

/// Turns raw text into [`NormalizedText`].
#[derive(Clone)]
pub struct Normalizer {
    dictionary: Arc<ScriptDictionary>,
    analyzer: Option<Arc<dyn ReadingAnalyzer>>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("dictionary_entries", &self.dictionary.len())
            .field("analyzer", &self.analyzer.is_some())
            .finish()
    }
}

impl Normalizer {
    pub fn new(dictionary: Arc<ScriptDictionary>) -> Self {
        Self {
            dictionary,
            analyzer: None,
        }
    }

    /// Use `analyzer` for kanji runs missing from the dictionary.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn ReadingAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn dictionary(&self) -> &Arc<ScriptDictionary> {
        &self.dictionary
    }

    /// Best-effort normalization; never fails.
    ///
    /// Analyzer errors are logged and the affected run passes through.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let out = self.run(text, &mut |run| match self.analyze(run) {
            Ok(reading) => Ok(reading),
            Err(e) => {
                warn!(run, error = %e, "Reading analyzer failed, keeping surface form");
                Ok(None)
            }
        });
        // The closure above never returns an error.
        NormalizedText(out.unwrap_or_default())
    }

    /// Normalization that reports analyzer failures.
    pub fn try_normalize(&self, text: &str) -> Result<NormalizedText> {
        self.run(text, &mut |run| self.analyze(run)).map(NormalizedText)
    }

    fn analyze(&self, run: &str) -> Result<Option<String>> {
        match &self.analyzer {
            Some(analyzer) => Ok(analyzer
                .reading(run)?
                .map(|reading| kana::fold(&reading).into_owned())
                .filter(|reading| !reading.is_empty())),
            None => Ok(None),
        }
    }

    fn run(
        &self,
        text: &str,
        on_unknown: &mut dyn FnMut(&str) -> Result<Option<String>>,
    ) -> Result<String> {
        let folded = kana::fold(text);
        let folded = folded.as_ref();

        // Byte offset of every char, plus the end.
        let bounds: Vec<usize> = folded
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(folded.len()))
            .collect();
        let char_count = bounds.len() - 1;
        let max_key = self.dictionary.max_key_chars();

        let mut out = String::with_capacity(folded.len());
        let mut unknown_start: Option<usize> = None;
        let mut i = 0;

        while i < char_count {
            let c = folded[bounds[i]..].chars().next().unwrap_or_default();

            if kana::is_kanji(c) || kana::is_hiragana(c) {
                let longest = (1..=max_key.min(char_count - i)).rev().find_map(|len| {
                    self.dictionary
                        .lookup_folded(&folded[bounds[i]..bounds[i + len]])
                        .map(|reading| (len, reading))
                });

                if let Some((len, reading)) = longest {
                    if let Some(start) = unknown_start.take() {
                        flush_unknown(&folded[bounds[start]..bounds[i]], &mut out, on_unknown)?;
                    }
                    out.push_str(reading);
                    i += len;
                    continue;
                }
            }

            if kana::is_kanji(c) {
                unknown_start.get_or_insert(i);
            } else {
                if let Some(start) = unknown_start.take() {
                    flush_unknown(&folded[bounds[start]..bounds[i]], &mut out, on_unknown)?;
                }
                out.push(c);
            }
            i += 1;
        }

        if let Some(start) = unknown_start {
            flush_unknown(&folded[bounds[start]..], &mut out, on_unknown)?;
        }

        Ok(out)
    }
}

fn flush_unknown(
    run: &str,
    out: &mut String,
    on_unknown: &mut dyn FnMut(&str) -> Result<Option<String>>,
) -> Result<()> {
    match on_unknown(run)? {
        Some(reading) => out.push_str(&reading),
        None => out.push_str(run),
    }
    Ok(())
}

/// Upper bound on memoized entries per cache.
const CACHE_CAPACITY: usize = 4096;

/// Per-session memo of normalized strings.
///
/// Owned by one search session and dropped with it.
#[derive(Debug, Default)]
pub struct NormalizationCache {
    entries: RwLock<HashMap<String, NormalizedText>>,
}

impl NormalizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `text`, computing it with `normalize` on a miss.
    pub fn get_or_try_insert(
        &self,
        text: &str,
        normalize: impl FnOnce(&str) -> Result<NormalizedText>,
    ) -> Result<NormalizedText> {
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            return Ok(hit.clone());
        }

        let value = normalize(text)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= CACHE_CAPACITY {
            entries.clear();
        }
        entries.insert(text.to_string(), value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn builtin() -> Normalizer {
        Normalizer::new(Arc::new(ScriptDictionary::builtin()))
    }

    fn fixture() -> Normalizer {
        let dict = ScriptDictionary::from_entries([
            ("玉ねぎ", "たまねぎ"),
            ("醤油", "しょうゆ"),
            ("豚", "ぶた"),
            ("豚汁", "とんじる"),
        ])
        .unwrap();
        Normalizer::new(Arc::new(dict))
    }

    struct FixedAnalyzer;

    impl ReadingAnalyzer for FixedAnalyzer {
        fn reading(&self, run: &str) -> Result<Option<String>> {
            Ok((run == "筑前煮").then(|| "チクゼンニ".to_string()))
        }
    }

    struct BrokenAnalyzer;

    impl ReadingAnalyzer for BrokenAnalyzer {
        fn reading(&self, _run: &str) -> Result<Option<String>> {
            Err(SearchError::AnalyzerUnavailable("no model loaded".into()))
        }
    }

    #[test]
    fn test_kanji_to_reading() {
        let n = fixture();
        assert_eq!(n.normalize("玉ねぎ").as_str(), "たまねぎ");
        assert_eq!(n.normalize("醤油").as_str(), "しょうゆ");
    }

    #[test]
    fn test_mixed_scripts_fold_to_same_form() {
        let n = fixture();
        let expected = n.normalize("たまねぎ");
        assert_eq!(n.normalize("玉ねぎ"), expected);
        assert_eq!(n.normalize("タマネギ"), expected);
        assert_eq!(n.normalize("玉ネギ"), expected);
        assert_eq!(n.normalize("ﾀﾏﾈｷﾞ"), expected);
    }

    #[test]
    fn test_longest_match_wins() {
        let n = fixture();
        assert_eq!(n.normalize("豚汁").as_str(), "とんじる");
        assert_eq!(n.normalize("豚こま").as_str(), "ぶたこま");
    }

    #[test]
    fn test_unknown_kanji_passes_through() {
        let n = fixture();
        assert_eq!(n.normalize("筑前煮と玉ねぎ").as_str(), "筑前煮とたまねぎ");
    }

    #[test]
    fn test_latin_lowercased() {
        let n = fixture();
        assert_eq!(n.normalize("Soy Sauce 醤油").as_str(), "soy sauce しょうゆ");
    }

    #[test]
    fn test_whitespace_preserved() {
        let n = fixture();
        assert_eq!(n.normalize(" 玉ねぎ  ").as_str(), " たまねぎ  ");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(fixture().normalize("").as_str(), "");
    }

    #[test]
    fn test_empty_dictionary_only_folds() {
        let n = Normalizer::new(Arc::new(ScriptDictionary::empty()));
        assert_eq!(n.normalize("玉ネギ").as_str(), "玉ねぎ");
    }

    #[test]
    fn test_analyzer_fills_unknown_runs() {
        let n = fixture().with_analyzer(Arc::new(FixedAnalyzer));
        assert_eq!(n.normalize("筑前煮").as_str(), "ちくぜんに");
        // dictionary still wins where it has an entry
        assert_eq!(n.normalize("醤油").as_str(), "しょうゆ");
    }

    #[test]
    fn test_analyzer_failure() {
        let n = fixture().with_analyzer(Arc::new(BrokenAnalyzer));
        assert_eq!(n.normalize("筑前煮").as_str(), "筑前煮");
        assert!(n.try_normalize("筑前煮").is_err());
        // no kanji run, analyzer never consulted
        assert!(n.try_normalize("たまねぎ").is_ok());
    }

    #[test]
    fn test_builtin_dishes() {
        let n = builtin();
        assert_eq!(n.normalize("肉じゃが").as_str(), "にくじゃが");
        assert_eq!(n.normalize("ごま油").as_str(), "ごまあぶら");
        assert_eq!(n.normalize("生姜焼き").as_str(), "しょうがやき");
        assert_eq!(n.normalize("湯豆腐").as_str(), "ゆどうふ");
        assert_eq!(n.normalize("食パン").as_str(), "しょくぱん");
    }

    #[test]
    fn test_cache_memoizes() {
        let n = fixture();
        let cache = NormalizationCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert("玉ねぎ", |t| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    n.try_normalize(t)
                })
                .unwrap();
            assert_eq!(value.as_str(), "たまねぎ");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let cache = NormalizationCache::new();
        let result = cache.get_or_try_insert("筑前煮", |_| {
            Err(SearchError::AnalyzerUnavailable("offline".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent_on_canonical_text(s in "[ぁ-んa-z0-9 ー]{0,32}") {
            let n = builtin();
            let once = n.normalize(&s);
            let twice = n.normalize(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalize_reaches_a_fixed_point(s in "[玉ねぎ醤油豚汁タマネギ筑前煮a-zA-Z ]{0,16}") {
            let n = fixture();
            let once = n.normalize(&s);
            let twice = n.normalize(&once);
            prop_assert_eq!(twice.clone(), n.normalize(&twice));
        }

        #[test]
        fn normalize_is_deterministic(s in "\\PC{0,24}") {
            let n = builtin();
            prop_assert_eq!(n.normalize(&s), n.normalize(&s));
        }
    }
}
