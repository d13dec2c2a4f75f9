//! Script dictionary: kanji and compound tokens mapped to hiragana readings.
//!
//! A dictionary is built once and never changes afterwards. Share it behind
//! an `Arc`; tests build small fixture dictionaries with
//! [`ScriptDictionary::from_entries`].

mod vocabulary;

use crate::error::{Result, SearchError};
use crate::kana;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// Immutable surface-form to reading map.
///
/// Surfaces and readings are stored folded (katakana as hiragana, Latin in
/// lower case), so lookups run against folded text.
#[derive(Debug, Clone, Default)]
pub struct ScriptDictionary {
    entries: HashMap<String, String>,
    max_key_chars: usize,
}

/// On-disk user dictionary.
///
/// ```toml
/// [entries]
/// "鶏もも肉" = "とりももにく"
/// ```
#[derive(Debug, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl ScriptDictionary {
    /// A dictionary with no entries; normalization degrades to folding.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The bundled kitchen vocabulary.
    pub fn builtin() -> Self {
        let mut dict = Self::empty();
        for (surface, reading) in vocabulary::VOCABULARY {
            match validate(surface, reading) {
                Ok((key, value)) => dict.insert(key, value),
                Err(e) => warn!(surface, error = %e, "Skipping bundled dictionary entry"),
            }
        }
        debug!(entries = dict.len(), "Loaded bundled dictionary");
        dict
    }

    /// Build a dictionary from (surface, reading) pairs.
    ///
    /// Every surface must contain at least one kanji and every reading must
    /// be kana or Latin only. Repeated surfaces are rejected.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut dict = Self::empty();
        for (surface, reading) in entries {
            let (key, value) = validate(surface.as_ref(), reading.as_ref())?;
            if dict.entries.contains_key(&key) {
                return Err(SearchError::DuplicateEntry(surface.as_ref().to_string()));
            }
            dict.insert(key, value);
        }
        Ok(dict)
    }

    /// Parse a TOML user dictionary.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DictionaryFile = toml::from_str(content)?;
        Self::from_entries(file.entries)
    }

    /// Load a TOML user dictionary from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let dict = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), entries = dict.len(), "Loaded user dictionary");
        Ok(dict)
    }

    /// Combine two dictionaries; entries in `other` win.
    #[must_use]
    pub fn merge(mut self, other: ScriptDictionary) -> Self {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
        self
    }

    /// Reading of a token, if known. The token is folded before lookup.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.lookup_folded(&kana::fold(token))
    }

    /// Lookup for text that is already folded.
    #[inline]
    pub(crate) fn lookup_folded(&self, folded: &str) -> Option<&str> {
        self.entries.get(folded).map(String::as_str)
    }

    /// Length in chars of the longest surface, the lookahead bound.
    pub fn max_key_chars(&self) -> usize {
        self.max_key_chars
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        self.max_key_chars = self.max_key_chars.max(key.chars().count());
        self.entries.insert(key, value);
    }
}

fn validate(surface: &str, reading: &str) -> Result<(String, String)> {
    let invalid = |reason| SearchError::InvalidEntry {
        surface: surface.to_string(),
        reason,
    };

    let key = kana::fold(surface.trim()).into_owned();
    let value = kana::fold(reading.trim()).into_owned();

    if key.is_empty() {
        return Err(invalid("empty surface"));
    }
    if value.is_empty() {
        return Err(invalid("empty reading"));
    }
    if !key.chars().any(kana::is_kanji) {
        return Err(invalid("surface has no kanji"));
    }
    if value.chars().any(kana::is_kanji) {
        return Err(invalid("reading contains kanji"));
    }
    Ok((key, value))
}
