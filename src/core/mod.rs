//! Consumers of the parsed record sequence.
//!
//! This module contains:
//! - [`columns`] - Four parallel columns built from records
//! - [`filter`] - Record filtering by date, author and category
//! - [`postprocess`] - Renaming, dropping and redacting
//! - [`anonymize`] - Random pseudonyms for participants (feature `anonymize`)
//! - [`stats`] - Summary statistics
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! Nothing here feeds back into parsing; every function takes records and
//! returns new records or derived data.
//!
//! # Quick Start
//!
//! ```rust
//! use whatshappened::config::ParserConfig;
//! use whatshappened::core::{FilterConfig, Summary, apply_filters};
//! use whatshappened::parser::parse_str;
//! use whatshappened::Category;
//!
//! let export = "01.02.21 um 09:15 - Alice: Hi\n01.02.21 um 09:16 - Bob left\n";
//! let records = parse_str(export, &ParserConfig::new())?;
//!
//! let messages = apply_filters(records, &FilterConfig::new().with_category(Category::Message));
//! assert_eq!(Summary::from_records(&messages).total, 1);
//! # Ok::<(), whatshappened::WhatsHappenedError>(())
//! ```

#[cfg(feature = "anonymize")]
pub mod anonymize;
pub mod columns;
pub mod filter;
pub mod output;
pub mod postprocess;
pub mod stats;

// Re-export main types for convenience
#[cfg(feature = "anonymize")]
pub use anonymize::Anonymizer;
pub use columns::Columns;
pub use filter::{FilterConfig, apply_filters};
pub use output::OutputConfig;
pub use stats::{ProcessingStats, Summary};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
