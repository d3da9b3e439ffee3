//! # whatshappened
//!
//! A Rust library for parsing WhatsApp plaintext chat exports into typed,
//! classified records.
//!
//! ## Overview
//!
//! An export is a text file where every message starts with a timestamp and
//! may continue over several lines:
//!
//! ```text
//! 01.02.21 um 09:15 - Alice: Hello there
//! still Alice
//! 01.02.21 um 09:16 - You changed the subject to "Trip Planning"
//! 01.02.21 um 09:17 - Bob left
//! ```
//!
//! Parsing runs three stages:
//!
//! 1. the export is decoded and split into lines,
//! 2. continuation lines are merged into the message they belong to,
//! 3. each message is classified into a [`Record`] with a timestamp, an
//!    author, a body and a [`Category`].
//!
//! ## Quick Start
//!
//! ```rust
//! use whatshappened::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let export = "01.02.21 um 09:15 - Alice: Hello there\n\
//!                   still Alice\n\
//!                   01.02.21 um 09:16 - You changed the subject to \"Trip Planning\"\n\
//!                   01.02.21 um 09:17 - Bob left\n";
//!
//!     let config = ParserConfig::new().with_exporter_name("Phil");
//!     let records = parse_str(export, &config)?;
//!
//!     assert_eq!(records[0].body, "Hello there\nstill Alice\n");
//!     assert_eq!(records[1].category, Category::Topic);
//!     assert_eq!(records[1].author, "Phil");
//!     assert_eq!(records[2].author, "System");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`ChatLog`](parser::ChatLog), [`WhatsAppParser`](parser::WhatsAppParser),
//!   [`parse_file`](parser::parse_file), [`parse_str`](parser::parse_str)
//! - [`parsing`] - The individual pipeline stages
//! - [`config`] - [`ParserConfig`](config::ParserConfig), [`PostProcessConfig`](config::PostProcessConfig)
//! - [`record`] - [`Record`] and [`Category`]
//! - [`core`] - Columns, filters, post-processing, statistics and output writers
//! - [`format`] - Output format selection
//! - [`cli`] - CLI argument types (feature `cli`)
//! - [`error`] - Unified error types ([`WhatsHappenedError`], [`Result`])
//! - [`prelude`] - Convenient re-exports
//!
//! ## Logging
//!
//! The library logs through [`tracing`]: stage counts at `info`, details at
//! `debug`, and a `warn` when an export does not start with a timestamp.
//! Install any subscriber to see them.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod parser;
pub mod parsing;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{Result, WhatsHappenedError};
pub use record::{Category, Record};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use whatshappened::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use crate::record::{Category, Record};

    // Error types
    pub use crate::error::{Result, WhatsHappenedError};

    // Configuration
    pub use crate::config::{Language, ParserConfig, PhraseTable, PostProcessConfig, TimestampConfig};

    // Parsing
    pub use crate::parser::{ChatLog, Parser, WhatsAppParser, parse_file, parse_str};

    // Consumers
    pub use crate::core::{Columns, FilterConfig, OutputConfig, Summary, apply_filters};
    pub use crate::core::postprocess;

    #[cfg(feature = "anonymize")]
    pub use crate::core::Anonymizer;

    // Output
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
