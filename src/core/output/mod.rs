//! Output format writers.
//!
//! This module provides writers for different output formats:
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of records - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one record per line - requires `json-output` feature
//!
//! Every format has the same four fields per record: `Timestamp`, `Who`,
//! `Message` and `Type` in CSV, `timestamp`, `who`, `message` and `type` in
//! JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> whatshappened::Result<()> {
//! use whatshappened::config::ParserConfig;
//! use whatshappened::core::output::{OutputConfig, to_csv, write_json, write_jsonl};
//! use whatshappened::parser::parse_file;
//!
//! let records = parse_file("chat.txt", &ParserConfig::new())?;
//! let config = OutputConfig::new();
//!
//! write_json(&records, "output.json", &config)?;
//! write_jsonl(&records, "output.jsonl", &config)?;
//! let csv_string = to_csv(&records, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

use std::fmt::Write as _;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;

use crate::error::{Result, WhatsHappenedError};
use crate::record::Record;

/// Default timestamp rendering in all output formats.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for output writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// `chrono` format string for timestamps
    pub timestamp_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timestamp format, e.g. `"%d.%m.%Y %H:%M"`.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Checks that the timestamp format has no invalid specifiers and can
    /// render a timestamp without a time zone (`%z`, `%Z` and friends can't).
    ///
    /// Writers call this before producing any output.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(self.invalid("Invalid strftime format"));
        }
        let sample = NaiveDate::from_ymd_opt(2021, 2, 1)
            .and_then(|date| date.and_hms_opt(9, 15, 0))
            .unwrap_or_default();
        let mut rendered = String::new();
        write!(rendered, "{}", sample.format(&self.timestamp_format))
            .map_err(|_| self.invalid("Timestamp format needs a time zone"))?;
        Ok(())
    }

    pub(crate) fn format_timestamp(&self, record: &Record) -> Result<String> {
        let mut rendered = String::new();
        write!(rendered, "{}", record.timestamp.format(&self.timestamp_format))
            .map_err(|_| self.invalid("Cannot render timestamp with"))?;
        Ok(rendered)
    }

    fn invalid(&self, reason: &str) -> WhatsHappenedError {
        WhatsHappenedError::InvalidFormat {
            format: "timestamp",
            message: format!("{reason}: '{}'", self.timestamp_format),
        }
    }
}

/// One record as written by the JSON writers.
#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "json-output"), allow(dead_code))]
pub(crate) struct OutputRecord<'a> {
    timestamp: String,
    who: &'a str,
    message: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> OutputRecord<'a> {
    #[cfg_attr(not(feature = "json-output"), allow(dead_code))]
    pub(crate) fn new(record: &'a Record, config: &OutputConfig) -> Result<Self> {
        Ok(Self {
            timestamp: config.format_timestamp(record)?,
            who: &record.author,
            message: &record.body,
            kind: record.category.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_config_default() {
        assert_eq!(OutputConfig::new().timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert!(OutputConfig::new().validate().is_ok());
    }

    #[test]
    fn test_output_config_rejects_bad_format() {
        let config = OutputConfig::new().with_timestamp_format("%Y-%Q");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("%Y-%Q"));
    }

    #[test]
    fn test_output_config_rejects_time_zone() {
        for format in ["%Y %z", "%Z", "%:z"] {
            let err = OutputConfig::new().with_timestamp_format(format).validate().unwrap_err();
            assert!(
                matches!(err, WhatsHappenedError::InvalidFormat { format: "timestamp", .. }),
                "{format}"
            );
            assert!(err.to_string().contains("time zone"), "{format}");
        }
    }

    #[test]
    fn test_format_timestamp_reports_time_zone_error() {
        let timestamp = NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        let record = Record::new(timestamp, "Alice", "Hi\n", crate::record::Category::Message);

        let config = OutputConfig::new().with_timestamp_format("%d.%m.%Y %H:%M");
        assert_eq!(config.format_timestamp(&record).unwrap(), "01.02.2021 09:15");

        let config = OutputConfig::new().with_timestamp_format("%H:%M %z");
        assert!(config.format_timestamp(&record).is_err());
    }
}
