//! Unified error types for whatshappened.
//!
//! Every fallible operation in the crate returns [`WhatsHappenedError`]. Hard
//! errors abort the whole parse; a message whose payload cannot be recognized is
//! not an error at all, it becomes a record with category
//! [`Unknown`](crate::Category::Unknown).

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for whatshappened operations.
///
/// # Example
///
/// ```rust
/// use whatshappened::error::Result;
/// use whatshappened::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, WhatsHappenedError>;

/// The error type for all whatshappened operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WhatsHappenedError {
    /// A parse was requested without an input file.
    ///
    /// Reported before any I/O takes place.
    #[error("No input file given. Set a path before parsing")]
    MissingInput,

    /// An I/O error occurred outside of reading the chat export
    /// (for example while writing output).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The chat export could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// The file that was being read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The configured text encoding label is not known.
    #[error("Unknown text encoding '{label}'")]
    UnknownEncoding {
        /// The label as given in the configuration
        label: String,
    },

    /// The input contains byte sequences that are invalid in the requested
    /// encoding.
    #[error("Input{} is not valid {encoding}", path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    Decode {
        /// The file being decoded, if any
        path: Option<PathBuf>,
        /// Canonical name of the encoding that was used
        encoding: &'static str,
    },

    /// A pipeline stage was invoked before its input was produced.
    ///
    /// This is a contract violation by the caller, e.g. merging multi-line
    /// messages before any lines were loaded.
    #[error("Cannot run '{stage}': {missing} not loaded")]
    NotLoaded {
        /// The stage that was invoked
        stage: &'static str,
        /// The data the stage needs
        missing: &'static str,
    },

    /// A raw message contains no timestamp token, or the token does not
    /// denote a real calendar date.
    #[error("Malformed timestamp{}{}: {snippet:?}",
        index.map(|i| format!(" in message #{i}")).unwrap_or_default(),
        path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    MalformedTimestamp {
        /// Zero-based index of the raw message, when known
        index: Option<usize>,
        /// One-based line number where the raw message starts, when known
        line: Option<usize>,
        /// Leading part of the offending message
        snippet: String,
        /// The file being parsed, when known
        path: Option<PathBuf>,
    },

    /// A regular expression in the configuration failed to compile.
    #[error("Invalid {name} pattern: {source}")]
    InvalidPattern {
        /// Which pattern was invalid (e.g. "timestamp", "topic")
        name: &'static str,
        /// The underlying regex error
        #[source]
        source: Box<regex::Error>,
    },

    /// Invalid date in filter configuration.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// Unknown or unavailable output format.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// What the format was for (e.g. "output")
        format: &'static str,
        /// Description of the problem
        message: String,
    },

    /// JSON parsing/serialization error (configuration files, JSON output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Number of characters of an offending message kept in error reports.
const SNIPPET_CHARS: usize = 40;

// ============================================================================
// Convenience constructors
// ============================================================================

impl WhatsHappenedError {
    /// Creates a read error for the given file.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WhatsHappenedError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a pipeline-state error.
    pub fn not_loaded(stage: &'static str, missing: &'static str) -> Self {
        WhatsHappenedError::NotLoaded { stage, missing }
    }

    /// Creates a malformed-timestamp error for a raw message, without
    /// position information.
    pub fn malformed_timestamp(message: &str) -> Self {
        let snippet: String = message
            .trim_end_matches(['\n', '\r'])
            .chars()
            .take(SNIPPET_CHARS)
            .collect();
        WhatsHappenedError::MalformedTimestamp {
            index: None,
            line: None,
            snippet,
            path: None,
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(name: &'static str, source: regex::Error) -> Self {
        WhatsHappenedError::InvalidPattern {
            name,
            source: Box::new(source),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        WhatsHappenedError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Attaches the position of the offending raw message.
    ///
    /// Only [`MalformedTimestamp`](Self::MalformedTimestamp) carries a
    /// position; other variants are returned unchanged.
    #[must_use]
    pub fn at_message(self, index: usize, line: usize, file: Option<&Path>) -> Self {
        match self {
            WhatsHappenedError::MalformedTimestamp { snippet, .. } => {
                WhatsHappenedError::MalformedTimestamp {
                    index: Some(index),
                    line: Some(line),
                    snippet,
                    path: file.map(Path::to_path_buf),
                }
            }
            other => other,
        }
    }

    /// Returns `true` if this is an I/O error (including read failures).
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            WhatsHappenedError::Io(_) | WhatsHappenedError::Read { .. }
        )
    }

    /// Returns `true` if the input could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            WhatsHappenedError::Decode { .. } | WhatsHappenedError::UnknownEncoding { .. }
        )
    }

    /// Returns `true` if this is a pipeline-state error.
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, WhatsHappenedError::NotLoaded { .. })
    }

    /// Returns `true` if this is a malformed-timestamp error.
    pub fn is_malformed_timestamp(&self) -> bool {
        matches!(self, WhatsHappenedError::MalformedTimestamp { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            WhatsHappenedError::MissingInput | WhatsHappenedError::InvalidPattern { .. }
        )
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, WhatsHappenedError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
