//! Summary statistics over a record sequence.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::record::{Category, Record};

/// Counts over a record sequence.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::ParserConfig;
/// use whatshappened::core::Summary;
/// use whatshappened::parser::parse_str;
/// use whatshappened::Category;
///
/// let export = "01.02.21 um 09:15 - Alice: Hi\n\
///               01.02.21 um 09:16 - Bob: Hey\n\
///               01.02.21 um 09:17 - Alice: How are you?\n\
///               01.02.21 um 09:18 - Bob left\n";
/// let records = parse_str(export, &ParserConfig::new())?;
/// let summary = Summary::from_records(&records);
///
/// assert_eq!(summary.total, 4);
/// assert_eq!(summary.messages_by("Alice"), 2);
/// assert_eq!(summary.count(Category::Quit), 1);
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of records.
    pub total: usize,

    /// Every distinct author, sentinels included.
    pub participants: BTreeSet<String>,

    /// Number of `message` records per author.
    pub messages_per_author: BTreeMap<String, usize>,

    /// Number of records per category. Categories that never occur are absent.
    pub per_category: BTreeMap<Category, usize>,

    /// Timestamp of the earliest record.
    pub first: Option<NaiveDateTime>,

    /// Timestamp of the latest record.
    pub last: Option<NaiveDateTime>,
}

impl Summary {
    /// Computes the summary of `records`.
    pub fn from_records(records: &[Record]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            summary.participants.insert(record.author.clone());
            *summary.per_category.entry(record.category).or_default() += 1;
            if record.category == Category::Message {
                *summary
                    .messages_per_author
                    .entry(record.author.clone())
                    .or_default() += 1;
            }
            summary.first = Some(summary.first.map_or(record.timestamp, |t| t.min(record.timestamp)));
            summary.last = Some(summary.last.map_or(record.timestamp, |t| t.max(record.timestamp)));
        }

        summary
    }

    /// Number of records of `category`.
    pub fn count(&self, category: Category) -> usize {
        self.per_category.get(&category).copied().unwrap_or(0)
    }

    /// Number of `message` records written by `author`.
    pub fn messages_by(&self, author: &str) -> usize {
        self.messages_per_author.get(author).copied().unwrap_or(0)
    }

    /// Authors ordered by message count, most active first. Ties keep
    /// alphabetical order.
    pub fn most_active(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .messages_per_author
            .iter()
            .map(|(author, count)| (author.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records: {}", self.total)?;
        if let (Some(first), Some(last)) = (self.first, self.last) {
            writeln!(f, "Period: {first} to {last}")?;
        }

        writeln!(f, "Participants: {}", self.participants.len())?;
        writeln!(f, "Record types:")?;
        for (category, count) in &self.per_category {
            writeln!(f, "  {category:<10} {count}")?;
        }

        writeln!(f, "Messages per participant:")?;
        for (author, count) in self.most_active() {
            writeln!(f, "  {author}: {count}")?;
        }
        Ok(())
    }
}

/// Record counts before and after filtering and post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessingStats {
    pub original_count: usize,
    pub final_count: usize,
}

impl ProcessingStats {
    pub fn new(original_count: usize, final_count: usize) -> Self {
        Self {
            original_count,
            final_count,
        }
    }

    /// Percentage of records removed, 0.0 for empty input.
    pub fn removed_ratio(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        (1.0 - (self.final_count as f64 / self.original_count as f64)) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new(ts(5), "Alice", "Hi", Category::Message),
            Record::new(ts(1), "Bob", "Hey", Category::Message),
            Record::new(ts(7), "Bob", "Yo", Category::Message),
            Record::new(ts(8), "Bob", "changed the subject", Category::Topic),
            Record::system(ts(9), "Carol left", Category::Quit),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_records(&records());
        assert_eq!(summary.total, 5);
        assert_eq!(summary.messages_by("Bob"), 2);
        assert_eq!(summary.messages_by("Carol"), 0);
        assert_eq!(summary.count(Category::Message), 3);
        assert_eq!(summary.count(Category::Topic), 1);
        assert_eq!(summary.count(Category::Add), 0);
        assert!(summary.participants.contains("System"));
        assert_eq!(summary.participants.len(), 3);
    }

    #[test]
    fn test_summary_period_ignores_order() {
        let summary = Summary::from_records(&records());
        assert_eq!(summary.first, Some(ts(1)));
        assert_eq!(summary.last, Some(ts(9)));
    }

    #[test]
    fn test_most_active() {
        let summary = Summary::from_records(&records());
        assert_eq!(summary.most_active(), vec![("Bob", 2), ("Alice", 1)]);
    }

    #[test]
    fn test_summary_empty() {
        let summary = Summary::from_records(&[]);
        assert_eq!(summary, Summary::default());
        assert!(summary.to_string().contains("Records: 0"));
    }

    #[test]
    fn test_summary_display() {
        let text = Summary::from_records(&records()).to_string();
        assert!(text.contains("Records: 5"));
        assert!(text.contains("Bob: 2"));
        assert!(text.contains("quit"));
    }

    #[test]
    fn test_processing_stats() {
        assert_eq!(ProcessingStats::new(0, 0).removed_ratio(), 0.0);
        assert!((ProcessingStats::new(4, 3).removed_ratio() - 25.0).abs() < f64::EPSILON);
    }
}
