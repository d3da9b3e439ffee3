//! Structured records produced by the parser.
//!
//! A [`Record`] is one logical chat entry: when it was written, who wrote it,
//! what it says, and which [`Category`] of entry it is. Every raw message in an
//! export yields exactly one record, in export order.
//!
//! # Examples
//!
//! ```
//! use whatshappened::{Category, Record};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2021, 2, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 15, 0)
//!     .unwrap();
//! let record = Record::new(ts, "Alice", "Hello there", Category::Message);
//!
//! assert_eq!(record.author(), "Alice");
//! assert!(!record.is_system());
//! ```
//!
//! ## Serialization
//!
//! ```
//! use whatshappened::{Category, Record};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2021, 2, 1).unwrap().and_hms_opt(9, 16, 0).unwrap();
//! let record = Record::new(ts, "System", "Bob left", Category::Quit);
//! let json = serde_json::to_string(&record)?;
//!
//! assert!(json.contains(r#""category":"quit""#));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Author assigned to system events that do not name an actor.
pub const SYSTEM_AUTHOR: &str = "System";

/// Author assigned when no author can be determined.
pub const UNKNOWN_AUTHOR: &str = "???";

/// The kind of entry a record represents.
///
/// Categories are assigned by ordered phrase matching; see
/// [`Classifier`](crate::parsing::Classifier) for the precedence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A regular message written by a participant.
    Message,
    /// The group picture was changed.
    Picture,
    /// The group subject was changed.
    Topic,
    /// One or more members were added.
    Add,
    /// A member was removed.
    Remove,
    /// A member left the group.
    Quit,
    /// A participant's security number changed.
    Security,
    /// The entry could not be identified.
    #[default]
    Unknown,
}

impl Category {
    /// Returns all categories in declaration order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Message,
            Category::Picture,
            Category::Topic,
            Category::Add,
            Category::Remove,
            Category::Quit,
            Category::Security,
            Category::Unknown,
        ]
    }

    /// Returns the lowercase tag used in output.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Message => "message",
            Category::Picture => "picture",
            Category::Topic => "topic",
            Category::Add => "add",
            Category::Remove => "remove",
            Category::Quit => "quit",
            Category::Security => "security",
            Category::Unknown => "unknown",
        }
    }

    /// Returns `true` for group events generated by the app rather than
    /// written by a participant.
    pub fn is_system(self) -> bool {
        !matches!(self, Category::Message | Category::Unknown)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
                format!(
                    "Unknown category: '{}'. Expected one of: {}",
                    s,
                    names.join(", ")
                )
            })
    }
}

/// One classified chat entry.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `NaiveDateTime` | Date and time from the entry's timestamp token |
/// | `author` | `String` | Participant name, `"System"` or `"???"` |
/// | `body` | `String` | Message text, or the whole payload for non-messages |
/// | `category` | [`Category`] | Kind of entry |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Local date and time of the entry, without timezone.
    pub timestamp: NaiveDateTime,

    /// Who wrote the entry.
    ///
    /// For `add`, `remove`, `quit` and `security` events this is
    /// [`SYSTEM_AUTHOR`]; for `topic` and `picture` it is the name in front of
    /// the event phrase.
    pub author: String,

    /// The entry's text.
    ///
    /// Multi-line messages keep their embedded line breaks.
    pub body: String,

    /// What kind of entry this is.
    pub category: Category,
}

impl Record {
    /// Creates a record from its four fields.
    pub fn new(
        timestamp: NaiveDateTime,
        author: impl Into<String>,
        body: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            body: body.into(),
            category,
        }
    }

    /// Creates a system event record authored by [`SYSTEM_AUTHOR`].
    pub fn system(timestamp: NaiveDateTime, body: impl Into<String>, category: Category) -> Self {
        Self::new(timestamp, SYSTEM_AUTHOR, body, category)
    }

    /// Creates an `unknown` record authored by [`UNKNOWN_AUTHOR`].
    pub fn unknown(timestamp: NaiveDateTime, body: impl Into<String>) -> Self {
        Self::new(timestamp, UNKNOWN_AUTHOR, body, Category::Unknown)
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the author name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns `true` if the record is an app-generated group event.
    pub fn is_system(&self) -> bool {
        self.category.is_system()
    }

    /// Returns `true` if the author is one of the fixed sentinels rather than
    /// a participant name.
    pub fn has_sentinel_author(&self) -> bool {
        self.author == SYSTEM_AUTHOR || self.author == UNKNOWN_AUTHOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_category_display_and_parse() {
        for &category in Category::all() {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!("QUIT".parse::<Category>().unwrap(), Category::Quit);
        assert!("joined".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_is_system() {
        assert!(!Category::Message.is_system());
        assert!(!Category::Unknown.is_system());
        assert!(Category::Topic.is_system());
        assert!(Category::Picture.is_system());
        assert!(Category::Security.is_system());
        assert!(Category::Quit.is_system());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Security).unwrap();
        assert_eq!(json, "\"security\"");
        let parsed: Category = serde_json::from_str("\"add\"").unwrap();
        assert_eq!(parsed, Category::Add);
    }

    #[test]
    fn test_record_constructors() {
        let system = Record::system(ts(), "Bob left", Category::Quit);
        assert_eq!(system.author(), SYSTEM_AUTHOR);
        assert!(system.is_system());
        assert!(system.has_sentinel_author());

        let unknown = Record::unknown(ts(), "???");
        assert_eq!(unknown.author(), UNKNOWN_AUTHOR);
        assert_eq!(unknown.category(), Category::Unknown);
        assert!(unknown.has_sentinel_author());

        let msg = Record::new(ts(), "Alice", "Hi", Category::Message);
        assert!(!msg.has_sentinel_author());
        assert_eq!(msg.timestamp(), ts());
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = Record::new(ts(), "Alice", "Hello\nthere", Category::Message);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("2021-02-01T09:15:00"));
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
