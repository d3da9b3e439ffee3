//! Record selection by date range, author and category.
//!
//! Active criteria combine with AND; listed categories combine with OR.
//! Author names compare ASCII case-insensitively.
//!
//! # Examples
//!
//! ```
//! use whatshappened::config::ParserConfig;
//! use whatshappened::core::filter::{FilterConfig, apply_filters};
//! use whatshappened::parser::parse_str;
//!
//! # fn main() -> whatshappened::Result<()> {
//! let export = "01.01.24 um 12:00 - Alice: Old\n\
//!               15.06.24 um 12:00 - Alice: New\n\
//!               15.06.24 um 12:01 - Bob: Also new\n";
//! let records = parse_str(export, &ParserConfig::new())?;
//!
//! let config = FilterConfig::new()
//!     .with_date_from("2024-06-01")?
//!     .with_author("alice");
//!
//! let filtered = apply_filters(records, &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].body, "New\n");
//! # Ok(())
//! # }
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, WhatsHappenedError};
use crate::record::{Category, Record};

/// Configuration for filtering records.
///
/// Filters are combined with AND logic: a record must match all active
/// filters to be included in the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Include only records on or after this timestamp.
    pub after: Option<NaiveDateTime>,

    /// Include only records on or before this timestamp.
    pub before: Option<NaiveDateTime>,

    /// Include only records from this author (case-insensitive).
    pub author: Option<String>,

    /// Include only records of these categories. Empty means all.
    pub categories: Vec<Category>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all records pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`WhatsHappenedError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        self.after = Some(parse_date(date_str)?.and_time(NaiveTime::MIN));
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// The whole day is included.
    ///
    /// # Errors
    ///
    /// Returns [`WhatsHappenedError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        self.before = Some(parse_date(date_str)?.and_time(end_of_day));
        Ok(self)
    }

    /// Sets the author filter.
    ///
    /// Matching is case-insensitive for ASCII characters.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Adds a category to the category filter.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_after(mut self, dt: NaiveDateTime) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the end timestamp directly.
    #[must_use]
    pub fn with_before(mut self, dt: NaiveDateTime) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.has_date_filter() || self.author.is_some() || !self.categories.is_empty()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if `record` passes every active filter.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(ref author) = self.author {
            if !record.author.eq_ignore_ascii_case(author) {
                return false;
            }
        }
        if self.after.is_some_and(|after| record.timestamp < after) {
            return false;
        }
        if self.before.is_some_and(|before| record.timestamp > before) {
            return false;
        }
        self.categories.is_empty() || self.categories.contains(&record.category)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| WhatsHappenedError::invalid_date(date_str))
}

/// Filters records based on the provided configuration.
///
/// Returns a new vector containing only records that match all active
/// filters, in their original order. If no filters are active, returns the
/// input unchanged.
pub fn apply_filters(records: Vec<Record>, config: &FilterConfig) -> Vec<Record> {
    if !config.is_active() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| config.matches(record))
        .collect()
}
