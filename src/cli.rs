//! Command-line interface definition using clap.
//!
//! [`Args`] holds the raw flags. Its `*_config` methods turn them into the
//! library's configuration types, so `main` only wires stages together.

use std::collections::BTreeMap;

use clap::Parser;

use crate::config::{Language, ParserConfig, PostProcessConfig};
use crate::core::filter::FilterConfig;
use crate::core::output::{DEFAULT_TIMESTAMP_FORMAT, OutputConfig};
use crate::error::Result;
use crate::format::OutputFormat;
use crate::record::Category;

/// Default output path; its extension follows `--format`.
pub const DEFAULT_OUTPUT: &str = "chat.csv";

/// Turn a WhatsApp chat export into structured records.
#[derive(Parser, Debug, Clone)]
#[command(name = "whatshappened")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    whatshappened chat.txt
    whatshappened chat.txt -o chat.json -f json --exporter-name Phil
    whatshappened chat.txt --language english --after 2024-01-01
    whatshappened chat.txt --category message --anonymize --seed 7
    whatshappened chat.txt --rename '+49 170 1234567=Alice' --redact password
    whatshappened chat.txt --stats")]
pub struct Args {
    /// Path to the exported chat (.txt)
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// JSON file with parser configuration (timestamp pattern, phrases, ...)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Language of the exporting phone
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Your display name, used where the export says "You"
    #[arg(long, value_name = "NAME")]
    pub exporter_name: Option<String>,

    /// How the export refers to the exporting user
    #[arg(long, value_name = "NAME")]
    pub self_name: Option<String>,

    /// Text encoding of the export
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Keep records on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep records on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep records from this author only
    #[arg(long, value_name = "USER")]
    pub from: Option<String>,

    /// Keep records of this type only (repeatable)
    #[arg(long = "category", value_name = "TYPE", value_parser = parse_category)]
    pub categories: Vec<Category>,

    /// Rename an author, OLD=NEW (repeatable)
    #[arg(long = "rename", value_name = "OLD=NEW", value_parser = parse_rename)]
    pub renames: Vec<(String, String)>,

    /// Drop every record by this author (repeatable)
    #[arg(long = "drop-author", value_name = "NAME")]
    pub drop_authors: Vec<String>,

    /// Replace this text in bodies with "[redacted]" (repeatable)
    #[arg(long = "redact", value_name = "TEXT")]
    pub redact: Vec<String>,

    /// Drop every record whose body contains this text (repeatable)
    #[arg(long = "drop-containing", value_name = "TEXT")]
    pub drop_containing: Vec<String>,

    /// Replace author names with random pseudonyms
    #[arg(long)]
    pub anonymize: bool,

    /// Seed for --anonymize, for reproducible pseudonyms
    #[arg(long, value_name = "N", requires = "anonymize")]
    pub seed: Option<u64>,

    /// Timestamp format in the output (strftime)
    #[arg(long, value_name = "FMT", default_value = DEFAULT_TIMESTAMP_FORMAT)]
    pub time_format: String,

    /// Print participant and record type statistics
    #[arg(short, long)]
    pub stats: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_category(s: &str) -> std::result::Result<Category, String> {
    s.parse()
}

fn parse_rename(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.is_empty() => Ok((old.to_string(), new.to_string())),
        _ => Err(format!("Expected OLD=NEW, got '{s}'")),
    }
}

impl Args {
    /// Builds the parser configuration: the config file (or defaults), then
    /// the language preset, then the individual overrides.
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = match self.config {
            Some(ref path) => ParserConfig::from_json_file(path)?,
            None => ParserConfig::default(),
        };

        if let Some(language) = self.language {
            config = config.with_language(language);
        }
        if let Some(ref name) = self.self_name {
            config = config.with_self_name(name.clone());
        }
        if let Some(ref name) = self.exporter_name {
            config = config.with_exporter_name(name.clone());
        }
        if let Some(ref label) = self.encoding {
            config = config.with_encoding(label.clone());
        }
        Ok(config)
    }

    /// Builds the record filter.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let mut filter = FilterConfig::new();
        if let Some(ref after) = self.after {
            filter = filter.with_date_from(after)?;
        }
        if let Some(ref before) = self.before {
            filter = filter.with_date_to(before)?;
        }
        if let Some(ref from) = self.from {
            filter = filter.with_author(from.clone());
        }
        for &category in &self.categories {
            filter = filter.with_category(category);
        }
        Ok(filter)
    }

    /// Builds the post-processing configuration.
    pub fn postprocess_config(&self) -> PostProcessConfig {
        PostProcessConfig {
            renames: self.renames.iter().cloned().collect::<BTreeMap<_, _>>(),
            drop_authors: self.drop_authors.clone(),
            redact: self.redact.clone(),
            drop_containing: self.drop_containing.clone(),
        }
    }

    /// Builds the output configuration.
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new().with_timestamp_format(self.time_format.clone())
    }

    /// Output path, with the extension following `--format` when the
    /// default path is used.
    pub fn output_path(&self) -> String {
        if self.output != DEFAULT_OUTPUT {
            return self.output.clone();
        }
        format!("chat.{}", self.format.extension())
    }
}
