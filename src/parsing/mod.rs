//! The three pipeline stages that turn an export into records.
//!
//! - [`reader`] decodes the file and splits it into lines
//! - [`reassemble`] groups lines into raw messages
//! - [`classify`] turns raw messages into [`Record`](crate::Record)s
//!
//! [`timestamp`] holds the token grammar shared by the last two stages.
//! Most callers use [`ChatLog`](crate::parser::ChatLog) or
//! [`parse_file`](crate::parser::parse_file) instead of these directly.

pub mod classify;
pub mod reader;
pub mod reassemble;
pub mod timestamp;

// Re-export commonly used items
pub use classify::Classifier;
pub use reader::{decode_bytes, lookup_encoding, read_lines, split_lines};
pub use reassemble::{RawMessage, leading_header, reassemble};
pub use timestamp::TimestampMatcher;
