//! Error types for the search crate.
//!
//! Only dictionary loading and the fallible normalization path produce
//! these. Public matching and ranking functions recover from them locally.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A dictionary entry failed validation
    #[error("Invalid dictionary entry {surface:?}: {reason}")]
    InvalidEntry {
        /// Surface form as written
        surface: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The same surface form was given twice
    #[error("Duplicate dictionary entry: {0:?}")]
    DuplicateEntry(String),

    /// The reading analyzer could not be used
    #[error("Reading analyzer unavailable: {0}")]
    AnalyzerUnavailable(String),

    /// The reading analyzer failed on a specific input
    #[error("Reading analysis failed for {input:?}: {message}")]
    Analysis {
        /// Text handed to the analyzer
        input: String,
        /// Analyzer message
        message: String,
    },

    /// Sort key not in the closed set
    #[error("Unknown sort key: {0:?}")]
    UnknownSortKey(String),

    /// Reading a dictionary file failed
    #[error("Dictionary I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dictionary file was not valid TOML
    #[error("Dictionary parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
