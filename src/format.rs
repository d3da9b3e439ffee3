//! Output format selection.
//!
//! [`OutputFormat`] names a writer; [`write_to_format`] and
//! [`to_format_string`] dispatch to it. A format whose Cargo feature is
//! disabled is reported as [`InvalidFormat`](WhatsHappenedError::InvalidFormat)
//! instead of failing to compile.
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> whatshappened::Result<()> {
//! use whatshappened::config::ParserConfig;
//! use whatshappened::core::OutputConfig;
//! use whatshappened::format::{OutputFormat, write_to_format};
//! use whatshappened::parser::parse_file;
//!
//! let records = parse_file("chat.txt", &ParserConfig::new())?;
//! let format = OutputFormat::from_path("chat.jsonl")?;
//! write_to_format(&records, "chat.jsonl", format, &OutputConfig::new())?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::output::OutputConfig;
use crate::error::{Result, WhatsHappenedError};
use crate::record::Record;

/// Output format for parsed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `;`-separated, one row per record (default)
    #[default]
    Csv,

    /// Pretty-printed array of records
    Json,

    /// One record object per line
    #[cfg_attr(feature = "cli", value(alias = "ndjson"))]
    #[serde(alias = "ndjson")]
    Jsonl,
}

const FORMATS: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl];

impl OutputFormat {
    /// Every format, in declaration order.
    pub fn all() -> &'static [OutputFormat] {
        &FORMATS
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Cargo feature that provides the writer.
    pub fn feature(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv-output",
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
        }
    }

    /// Picks the format from the extension of `path`, ignoring case.
    ///
    /// ```rust
    /// use whatshappened::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/chat.NDJSON")?, OutputFormat::Jsonl);
    /// assert!(OutputFormat::from_path("chat").is_err());
    /// # Ok::<(), whatshappened::WhatsHappenedError>(())
    /// ```
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        extension.parse().map_err(|_| WhatsHappenedError::InvalidFormat {
            format: "output",
            message: format!("cannot tell the format of '{path}' from its extension"),
        })
    }

    fn unavailable(self) -> WhatsHappenedError {
        WhatsHappenedError::InvalidFormat {
            format: "output",
            message: format!("{self} output needs the '{}' feature", self.feature()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower == "ndjson" {
            return Ok(OutputFormat::Jsonl);
        }
        FORMATS
            .into_iter()
            .find(|format| format.extension() == lower)
            .ok_or_else(|| format!("Unknown format '{s}'. Expected csv, json, jsonl or ndjson"))
    }
}

/// Writes `records` to the file at `path` in `format`.
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[Record],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    use crate::core::output;

    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::write_csv(records, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => output::write_json(records, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => output::write_jsonl(records, path, config),
        #[allow(unreachable_patterns)]
        other => Err(other.unavailable()),
    }
}

/// Renders `records` in `format`.
///
/// ```rust
/// # #[cfg(feature = "json-output")]
/// # fn main() -> whatshappened::Result<()> {
/// use whatshappened::config::ParserConfig;
/// use whatshappened::core::OutputConfig;
/// use whatshappened::format::{OutputFormat, to_format_string};
/// use whatshappened::parser::parse_str;
///
/// let records = parse_str("01.02.21 um 09:15 - Alice: Hi\n", &ParserConfig::new())?;
/// let jsonl = to_format_string(&records, OutputFormat::Jsonl, &OutputConfig::new())?;
/// assert!(jsonl.contains(r#""who":"Alice""#));
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "json-output"))]
/// # fn main() {}
/// ```
#[allow(unused_variables)]
pub fn to_format_string(
    records: &[Record],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    use crate::core::output;

    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::to_csv(records, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => output::to_json(records, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => output::to_jsonl(records, config),
        #[allow(unreachable_patterns)]
        other => Err(other.unavailable()),
    }
}
