//! Columnar view of a record sequence.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::record::{Category, Record};

/// Four parallel columns, one entry per record.
///
/// All four vectors always have the same length; the only ways to build a
/// `Columns` are from records or by pushing whole records.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::ParserConfig;
/// use whatshappened::core::Columns;
/// use whatshappened::parser::parse_str;
///
/// let records = parse_str("01.02.21 um 09:15 - Alice: Hi\n", &ParserConfig::new())?;
/// let columns = Columns::from_records(&records);
///
/// assert_eq!(columns.who(), ["Alice"]);
/// assert_eq!(columns.into_records(), records);
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Columns {
    timestamp: Vec<NaiveDateTime>,
    who: Vec<String>,
    message: Vec<String>,
    #[serde(rename = "type")]
    kind: Vec<Category>,
}

impl Columns {
    /// Creates empty columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds columns from a record slice, preserving order.
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns = Self {
            timestamp: Vec::with_capacity(records.len()),
            who: Vec::with_capacity(records.len()),
            message: Vec::with_capacity(records.len()),
            kind: Vec::with_capacity(records.len()),
        };
        for record in records {
            columns.push(record.clone());
        }
        columns
    }

    /// Appends one record.
    pub fn push(&mut self, record: Record) {
        self.timestamp.push(record.timestamp);
        self.who.push(record.author);
        self.message.push(record.body);
        self.kind.push(record.category);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }

    pub fn timestamp(&self) -> &[NaiveDateTime] {
        &self.timestamp
    }

    pub fn who(&self) -> &[String] {
        &self.who
    }

    pub fn message(&self) -> &[String] {
        &self.message
    }

    pub fn kind(&self) -> &[Category] {
        &self.kind
    }

    /// Converts back into records.
    pub fn into_records(self) -> Vec<Record> {
        self.timestamp
            .into_iter()
            .zip(self.who)
            .zip(self.message)
            .zip(self.kind)
            .map(|(((timestamp, who), message), kind)| Record::new(timestamp, who, message, kind))
            .collect()
    }
}

impl From<&[Record]> for Columns {
    fn from(records: &[Record]) -> Self {
        Self::from_records(records)
    }
}

impl From<Vec<Record>> for Columns {
    fn from(records: Vec<Record>) -> Self {
        let mut columns = Self::new();
        for record in records {
            columns.push(record);
        }
        columns
    }
}

impl FromIterator<Record> for Columns {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut columns = Self::new();
        for record in iter {
            columns.push(record);
        }
        columns
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
            Record::new(ts(15), "Alice", "Hello\n", Category::Message),
            Record::system(ts(16), "Bob left\n", Category::Quit),
        ]
    }

    #[test]
    fn test_columns_from_records() {
        let columns = Columns::from_records(&records());
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.timestamp(), [ts(15), ts(16)]);
        assert_eq!(columns.who(), ["Alice", "System"]);
        assert_eq!(columns.message(), ["Hello\n", "Bob left\n"]);
        assert_eq!(columns.kind(), [Category::Message, Category::Quit]);
    }

    #[test]
    fn test_columns_back_to_records() {
        let columns: Columns = records().into();
        assert_eq!(columns.into_records(), records());
    }

    #[test]
    fn test_columns_empty() {
        let columns = Columns::from_records(&[]);
        assert!(columns.is_empty());
        assert!(columns.into_records().is_empty());
    }

    #[test]
    fn test_columns_serialize_type_key() {
        let columns: Columns = records().into_iter().collect();
        let json = serde_json::to_value(&columns).unwrap();
        assert_eq!(json["type"][1], "quit");
        assert_eq!(json["who"][0], "Alice");
        assert!(json.get("kind").is_none());
    }
}
