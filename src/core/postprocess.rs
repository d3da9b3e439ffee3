//! Opt-in transforms over a parsed record sequence.
//!
//! Every function takes ownership of the records and returns a new sequence.
//! Records are kept or dropped whole, so timestamp, author, body and category
//! always stay together, and the relative order of kept records never
//! changes.
//!
//! # Example
//!
//! ```rust
//! use whatshappened::config::{ParserConfig, PostProcessConfig};
//! use whatshappened::core::postprocess;
//! use whatshappened::parser::parse_str;
//!
//! let export = "01.02.21 um 09:15 - +49 170 1234567: my pin is 1234\n\
//!               01.02.21 um 09:16 - Spam Bot: buy now\n";
//! let records = parse_str(export, &ParserConfig::new())?;
//!
//! let config = PostProcessConfig::new()
//!     .with_rename("+49 170 1234567", "Alice")
//!     .with_drop_author("Spam Bot")
//!     .with_redaction("1234");
//!
//! let records = postprocess::apply(records, &config);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].author, "Alice");
//! assert_eq!(records[0].body, "my pin is [redacted]\n");
//! # Ok::<(), whatshappened::WhatsHappenedError>(())
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::PostProcessConfig;
use crate::record::Record;

/// Replacement text for redacted substrings.
pub const REDACTED: &str = "[redacted]";

/// Renames authors according to `renames` (old name to new name).
///
/// Names are matched exactly. Authors without an entry are left alone.
pub fn rename_authors(records: Vec<Record>, renames: &BTreeMap<String, String>) -> Vec<Record> {
    if renames.is_empty() {
        return records;
    }

    records
        .into_iter()
        .map(|mut record| {
            if let Some(new_name) = renames.get(&record.author) {
                record.author.clone_from(new_name);
            }
            record
        })
        .collect()
}

/// Drops every record whose author is in `authors`.
pub fn drop_authors(records: Vec<Record>, authors: &[String]) -> Vec<Record> {
    if authors.is_empty() {
        return records;
    }

    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| !authors.contains(&record.author))
        .collect();
    debug!(dropped = before - kept.len(), "dropped records by author");
    kept
}

/// Replaces every occurrence of each needle in record bodies with
/// [`REDACTED`].
///
/// Empty needles are ignored.
pub fn apply_redactions(records: Vec<Record>, needles: &[String]) -> Vec<Record> {
    let needles: Vec<&str> = needles
        .iter()
        .map(String::as_str)
        .filter(|needle| !needle.is_empty())
        .collect();
    if needles.is_empty() {
        return records;
    }

    records
        .into_iter()
        .map(|mut record| {
            for needle in &needles {
                if record.body.contains(needle) {
                    record.body = record.body.replace(needle, REDACTED);
                }
            }
            record
        })
        .collect()
}

/// Drops every record whose body contains any of `needles`.
///
/// Empty needles are ignored.
pub fn drop_containing(records: Vec<Record>, needles: &[String]) -> Vec<Record> {
    let needles: Vec<&str> = needles
        .iter()
        .map(String::as_str)
        .filter(|needle| !needle.is_empty())
        .collect();
    if needles.is_empty() {
        return records;
    }

    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| !needles.iter().any(|needle| record.body.contains(needle)))
        .collect();
    debug!(dropped = before - kept.len(), "dropped records by content");
    kept
}

/// Runs every configured step.
///
/// Order: drop by author and rename (both on the exported names), then drop
/// by content, then redact. Dropping by content therefore sees the original
/// text, not the redacted one.
pub fn apply(records: Vec<Record>, config: &PostProcessConfig) -> Vec<Record> {
    if !config.is_active() {
        return records;
    }

    let records = drop_authors(records, &config.drop_authors);
    let records = rename_authors(records, &config.renames);
    let records = drop_containing(records, &config.drop_containing);
    apply_redactions(records, &config.redact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new(ts(1), "Alice", "hello secret", Category::Message),
            Record::new(ts(2), "Bob", "hi", Category::Message),
            Record::system(ts(3), "Bob left", Category::Quit),
            Record::new(ts(4), "Alice", "secret secret", Category::Message),
        ]
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_rename_authors() {
        let renames = BTreeMap::from([("Alice".to_string(), "A.".to_string())]);
        let renamed = rename_authors(records(), &renames);
        assert_eq!(renamed[0].author, "A.");
        assert_eq!(renamed[1].author, "Bob");
        assert_eq!(renamed[3].author, "A.");
        assert_eq!(renamed[0].body, "hello secret");
    }

    #[test]
    fn test_drop_authors_keeps_order() {
        let kept = drop_authors(records(), &strings(&["Bob"]));
        assert_eq!(kept.len(), 3);
        let minutes: Vec<_> = kept.iter().map(|r| r.timestamp).collect();
        assert_eq!(minutes, vec![ts(1), ts(3), ts(4)]);
    }

    #[test]
    fn test_apply_redactions() {
        let redacted = apply_redactions(records(), &strings(&["secret", ""]));
        assert_eq!(redacted[0].body, "hello [redacted]");
        assert_eq!(redacted[3].body, "[redacted] [redacted]");
        assert_eq!(redacted[1].body, "hi");
    }

    #[test]
    fn test_drop_containing() {
        let kept = drop_containing(records(), &strings(&["secret"]));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| !r.body.contains("secret")));
    }

    #[test]
    fn test_empty_needles_drop_nothing() {
        assert_eq!(drop_containing(records(), &strings(&[""])), records());
    }

    #[test]
    fn test_apply_order() {
        let config = PostProcessConfig::new()
            .with_rename("Bob", "Robert")
            .with_drop_author("Bob")
            .with_drop_containing("hello")
            .with_redaction("secret");

        let result = apply(records(), &config);
        // Bob's message is dropped before the rename applies.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].author, "System");
        assert_eq!(result[1].body, "[redacted] [redacted]");
    }

    #[test]
    fn test_apply_inactive_is_identity() {
        assert_eq!(apply(records(), &PostProcessConfig::new()), records());
    }
}
