//! Configuration types for parsing and post-processing.
//!
//! All configuration is plain data: it is built once, validated when the
//! [`Classifier`](crate::parsing::Classifier) compiles it, and passed by
//! reference to every stage. Nothing in the crate reads global state.
//!
//! # Example
//!
//! ```rust
//! use whatshappened::config::{Language, ParserConfig};
//!
//! let config = ParserConfig::for_language(Language::German)
//!     .with_exporter_name("Phil")
//!     .with_encoding("utf-8");
//!
//! assert_eq!(config.self_name, "Du");
//! ```
//!
//! Configurations can also be loaded from JSON; missing fields take their
//! default values:
//!
//! ```rust
//! use whatshappened::config::ParserConfig;
//!
//! let config = ParserConfig::from_json_str(r#"{"exporter_name": "Phil"}"#)?;
//! assert_eq!(config.exporter_name, "Phil");
//! assert_eq!(config.self_name, "You");
//! # Ok::<(), whatshappened::WhatsHappenedError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WhatsHappenedError};

/// Left-to-right mark, which exports put in front of some lines.
pub const LEFT_TO_RIGHT_MARK: char = '\u{200e}';

/// Right-to-left mark.
pub const RIGHT_TO_LEFT_MARK: char = '\u{200f}';

/// Directional formatting characters stripped from extracted names.
pub const DIRECTIONAL_CHARS: [char; 7] = [
    LEFT_TO_RIGHT_MARK,
    RIGHT_TO_LEFT_MARK,
    '\u{202a}',
    '\u{202b}',
    '\u{202c}',
    '\u{202d}',
    '\u{202e}',
];

/// Language of the exporting phone, which decides the phrase table and the
/// self sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English system messages, self sentinel "You"
    #[default]
    #[cfg_attr(feature = "cli", value(alias = "en"))]
    #[serde(alias = "en")]
    English,

    /// German system messages, self sentinel "Du"
    #[cfg_attr(feature = "cli", value(alias = "de"))]
    #[serde(alias = "de")]
    German,
}

impl Language {
    /// Returns the phrase table for this language.
    pub fn phrases(self) -> PhraseTable {
        match self {
            Language::English => PhraseTable::english(),
            Language::German => PhraseTable::german(),
        }
    }

    /// Returns how the export refers to the exporting user.
    pub fn self_name(self) -> &'static str {
        match self {
            Language::English => "You",
            Language::German => "Du",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::German => write!(f, "German"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "german" | "de" => Ok(Language::German),
            _ => Err(format!(
                "Unknown language: '{}'. Expected one of: english, en, german, de",
                s
            )),
        }
    }
}

/// Grammar of the timestamp token that starts every message.
///
/// `pattern` is a regular expression that must define the named groups
/// `day`, `month`, `year`, `hour` and `minute`, and may define `second`.
/// Two-digit years are read as `2000 + YY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampConfig {
    /// Token pattern, without anchors (default: `DD.MM.YY um HH:MM`)
    pub pattern: String,

    /// Text between the token and the payload (default: `" - "`)
    pub separator: String,

    /// Number of leading characters of a line inspected when deciding
    /// whether it starts a new message (default: 18)
    pub scan_len: usize,

    /// Invisible characters that may precede the token at line start
    pub directional_marks: Vec<char>,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            pattern: r"(?P<day>[0-3][0-9])\.(?P<month>[0-1][0-9])\.(?P<year>[0-9]{2}) um (?P<hour>[0-2][0-9]):(?P<minute>[0-5][0-9])".to_string(),
            separator: " - ".to_string(),
            scan_len: 18,
            directional_marks: vec![LEFT_TO_RIGHT_MARK, RIGHT_TO_LEFT_MARK],
        }
    }
}

impl TimestampConfig {
    /// Creates the default timestamp grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the token pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Sets the separator between token and payload.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets how many leading characters are scanned for a token.
    #[must_use]
    pub fn with_scan_len(mut self, scan_len: usize) -> Self {
        self.scan_len = scan_len;
        self
    }
}

/// Phrase patterns identifying system events.
///
/// Each entry is a regular expression. Patterns are only matched against the
/// part of a payload before its first colon, so a quoted phrase inside a
/// regular message body never turns it into a system event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseTable {
    /// Group subject changed; the actor's name precedes the phrase
    pub topic: String,
    /// Security number changed
    pub security: String,
    /// Group picture changed; the actor's name precedes the phrase
    pub picture: String,
    /// Member(s) added
    pub add: String,
    /// Member left the group
    pub quit: String,
    /// Member removed
    pub remove: String,
}

impl Default for PhraseTable {
    fn default() -> Self {
        Self::english()
    }
}

impl PhraseTable {
    /// Phrases of English-language exports.
    pub fn english() -> Self {
        Self {
            topic: r"\bchanged the subject\b".to_string(),
            security: r"\bsecurity (?:code|number)\b".to_string(),
            picture: r"\bchanged (?:this group's icon|the group (?:picture|icon))".to_string(),
            add: r"\badded\b".to_string(),
            quit: r"\bleft\b".to_string(),
            remove: r"\b(?:was |were )?removed\b".to_string(),
        }
    }

    /// Phrases of German-language exports.
    pub fn german() -> Self {
        Self {
            topic: r" has?t den Betreff ".to_string(),
            security: r"Die Sicherheitsnummer".to_string(),
            picture: r" has?t das Gruppenbild ".to_string(),
            add: r"has?t.*hinzugefügt".to_string(),
            quit: r"hat die Gruppe verlassen".to_string(),
            remove: r"wurde entfernt".to_string(),
        }
    }
}

/// Configuration for the parsing pipeline.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_exporter_name("Phil")
///     .with_self_name("You");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Timestamp token grammar
    pub timestamp: TimestampConfig,

    /// System event phrases
    pub phrases: PhraseTable,

    /// How the export refers to the exporting user (default: "You")
    pub self_name: String,

    /// Display name substituted for `self_name` (default: "Me")
    pub exporter_name: String,

    /// Characters stripped, together with whitespace, from both ends of
    /// extracted names
    pub trim_chars: Vec<char>,

    /// Text encoding label of the export file (default: "utf-8")
    pub encoding: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            timestamp: TimestampConfig::default(),
            phrases: PhraseTable::english(),
            self_name: Language::English.self_name().to_string(),
            exporter_name: "Me".to_string(),
            trim_chars: DIRECTIONAL_CHARS.to_vec(),
            encoding: "utf-8".to_string(),
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with the phrase table and self sentinel of
    /// the given language.
    pub fn for_language(language: Language) -> Self {
        Self::default().with_language(language)
    }

    /// Loads a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| WhatsHappenedError::read(path, e))?;
        Self::from_json_str(&content)
    }

    /// Switches phrase table and self sentinel to the given language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.phrases = language.phrases();
        self.self_name = language.self_name().to_string();
        self
    }

    /// Sets the timestamp grammar.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: TimestampConfig) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the phrase table.
    #[must_use]
    pub fn with_phrases(mut self, phrases: PhraseTable) -> Self {
        self.phrases = phrases;
        self
    }

    /// Sets the self sentinel.
    #[must_use]
    pub fn with_self_name(mut self, name: impl Into<String>) -> Self {
        self.self_name = name.into();
        self
    }

    /// Sets the display name substituted for the self sentinel.
    #[must_use]
    pub fn with_exporter_name(mut self, name: impl Into<String>) -> Self {
        self.exporter_name = name.into();
        self
    }

    /// Sets the characters trimmed from extracted names.
    #[must_use]
    pub fn with_trim_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.trim_chars = chars.into_iter().collect();
        self
    }

    /// Sets the text encoding label.
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }
}

/// Post-processing applied to parsed records.
///
/// Post-processing never changes classification; it produces a new record
/// sequence from an existing one.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::PostProcessConfig;
///
/// let config = PostProcessConfig::new()
///     .with_rename("+49 170 1234567", "Alice")
///     .with_drop_author("Spam Bot")
///     .with_redaction("secret-password");
///
/// assert!(config.is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Author renames, old name to new name
    pub renames: BTreeMap<String, String>,

    /// Authors whose records are dropped
    pub drop_authors: Vec<String>,

    /// Substrings replaced by [`REDACTED`](crate::core::postprocess::REDACTED)
    /// in bodies
    pub redact: Vec<String>,

    /// Substrings whose containing records are dropped
    pub drop_containing: Vec<String>,
}

impl PostProcessConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an author rename.
    #[must_use]
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// Adds an author whose records are dropped.
    #[must_use]
    pub fn with_drop_author(mut self, author: impl Into<String>) -> Self {
        self.drop_authors.push(author.into());
        self
    }

    /// Adds a substring to redact.
    #[must_use]
    pub fn with_redaction(mut self, needle: impl Into<String>) -> Self {
        self.redact.push(needle.into());
        self
    }

    /// Adds a substring whose containing records are dropped.
    #[must_use]
    pub fn with_drop_containing(mut self, needle: impl Into<String>) -> Self {
        self.drop_containing.push(needle.into());
        self
    }

    /// Returns `true` if any post-processing step is configured.
    pub fn is_active(&self) -> bool {
        !self.renames.is_empty()
            || !self.drop_authors.is_empty()
            || !self.redact.is_empty()
            || !self.drop_containing.is_empty()
    }
}
