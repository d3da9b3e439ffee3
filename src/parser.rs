//! Parser entry points for chat exports.
//!
//! Two ways to parse are provided:
//!
//! - [`WhatsAppParser`], a stateless parser implementing [`Parser`], for
//!   one-shot parsing of a file or string.
//! - [`ChatLog`], a staged driver that runs load, merge and classify as
//!   separate steps and reports calling them out of order.
//!
//! # Example
//!
//! ```rust
//! use whatshappened::config::ParserConfig;
//! use whatshappened::parser::parse_str;
//! use whatshappened::Category;
//!
//! let export = "01.02.21 um 09:15 - Alice: Hello there\n\
//!               still Alice\n\
//!               01.02.21 um 09:16 - Bob: Hi!\n";
//!
//! let records = parse_str(export, &ParserConfig::new())?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].body, "Hello there\nstill Alice\n");
//! assert_eq!(records[1].category, Category::Message);
//! # Ok::<(), whatshappened::WhatsHappenedError>(())
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::Record;
use crate::config::ParserConfig;
use crate::core::columns::Columns;
use crate::error::{Result, WhatsHappenedError};
use crate::parsing::{Classifier, RawMessage, read_lines, reassemble, split_lines};

/// Common interface for chat export parsers.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl Parser for MyParser {
///     fn name(&self) -> &'static str { "MyParser" }
///
///     fn parse(&self, path: &Path) -> Result<Vec<Record>> {
///         let content = std::fs::read_to_string(path)?;
///         self.parse_str(&content)
///     }
///
///     fn parse_str(&self, content: &str) -> Result<Vec<Record>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Parses an export file and returns all records in export order.
    ///
    /// # Errors
    ///
    /// Returns [`WhatsHappenedError`] if:
    /// - The file cannot be read or decoded
    /// - A message has no valid timestamp
    fn parse(&self, path: &Path) -> Result<Vec<Record>>;

    /// Parses export content that is already in memory.
    fn parse_str(&self, content: &str) -> Result<Vec<Record>>;

    /// Parses an export file (convenience method accepting &str path).
    fn parse_file(&self, path: &str) -> Result<Vec<Record>> {
        self.parse(Path::new(path))
    }
}

/// Parser for WhatsApp "export chat" text files.
///
/// # Example
///
/// ```rust,no_run
/// use whatshappened::config::ParserConfig;
/// use whatshappened::parser::{Parser, WhatsAppParser};
///
/// let parser = WhatsAppParser::new(ParserConfig::new().with_exporter_name("Phil"))?;
/// let records = parser.parse_file("chat.txt")?;
/// println!("{} records", records.len());
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WhatsAppParser {
    config: ParserConfig,
    classifier: Classifier,
}

impl WhatsAppParser {
    /// Creates a parser, compiling all patterns of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WhatsHappenedError::InvalidPattern`] if a pattern does not
    /// compile.
    pub fn new(config: ParserConfig) -> Result<Self> {
        let classifier = Classifier::new(&config)?;
        Ok(Self { config, classifier })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the compiled classifier.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Reads `path` into lines using the configured encoding.
    pub fn read(&self, path: &Path) -> Result<Vec<String>> {
        let lines = read_lines(path, &self.config.encoding)?;
        info!(lines = lines.len(), path = %path.display(), "read export");
        Ok(lines)
    }

    /// Groups lines into raw messages.
    pub fn merge<S: AsRef<str>>(&self, lines: &[S]) -> Vec<RawMessage> {
        let messages = reassemble(lines, self.classifier.timestamps());
        info!(
            lines = lines.len(),
            messages = messages.len(),
            "merged multi-line messages"
        );
        messages
    }

    /// Classifies raw messages into records.
    pub fn classify(&self, messages: &[RawMessage], file: Option<&Path>) -> Result<Vec<Record>> {
        let records = self.classifier.classify_all(messages, file)?;
        info!(records = records.len(), "classified messages");
        Ok(records)
    }

    fn parse_lines(&self, lines: &[String], file: Option<&Path>) -> Result<Vec<Record>> {
        let messages = self.merge(lines);
        self.classify(&messages, file)
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn parse(&self, path: &Path) -> Result<Vec<Record>> {
        let lines = self.read(path)?;
        self.parse_lines(&lines, Some(path))
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Record>> {
        self.parse_lines(&split_lines(content), None)
    }
}

/// Parses the export at `path` with `config`.
pub fn parse_file(path: impl AsRef<Path>, config: &ParserConfig) -> Result<Vec<Record>> {
    WhatsAppParser::new(config.clone())?.parse(path.as_ref())
}

/// Parses export content held in memory with `config`.
pub fn parse_str(content: &str, config: &ParserConfig) -> Result<Vec<Record>> {
    WhatsAppParser::new(config.clone())?.parse_str(content)
}

// ============================================================================
// Staged driver
// ============================================================================

/// Staged parse of a single export.
///
/// Each stage consumes the output of the previous one: [`load`](Self::load)
/// produces lines, [`merge_multiline`](Self::merge_multiline) turns them into
/// raw messages and [`classify`](Self::classify) turns those into records.
/// Running a stage before its input exists is a
/// [`NotLoaded`](WhatsHappenedError::NotLoaded) error; an export that loads
/// as zero lines is not.
///
/// # Example
///
/// ```rust,no_run
/// use whatshappened::config::ParserConfig;
/// use whatshappened::parser::ChatLog;
///
/// let mut log = ChatLog::new(ParserConfig::new())?.with_path("chat.txt");
/// log.load()?;
/// log.merge_multiline()?;
/// log.classify()?;
///
/// for record in log.records().unwrap_or_default() {
///     println!("{} {}: {}", record.timestamp, record.author, record.body);
/// }
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChatLog {
    parser: WhatsAppParser,
    path: Option<PathBuf>,
    lines: Option<Vec<String>>,
    messages: Option<Vec<RawMessage>>,
    records: Option<Vec<Record>>,
}

impl ChatLog {
    /// Creates a driver with no input set.
    pub fn new(config: ParserConfig) -> Result<Self> {
        Ok(Self {
            parser: WhatsAppParser::new(config)?,
            path: None,
            lines: None,
            messages: None,
            records: None,
        })
    }

    /// Sets the export file to load.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns the export file, if set.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ParserConfig {
        self.parser.config()
    }

    /// Reads the export file into lines, discarding any earlier stage output.
    ///
    /// # Errors
    ///
    /// Returns [`WhatsHappenedError::MissingInput`] if no path was set, or a
    /// read/decode error.
    pub fn load(&mut self) -> Result<usize> {
        let path = self.path.as_deref().ok_or(WhatsHappenedError::MissingInput)?;
        let lines = self.parser.read(path)?;
        Ok(self.replace_lines(lines))
    }

    /// Uses in-memory content instead of a file.
    pub fn load_str(&mut self, content: &str) -> usize {
        self.replace_lines(split_lines(content))
    }

    fn replace_lines(&mut self, lines: Vec<String>) -> usize {
        let count = lines.len();
        self.lines = Some(lines);
        self.messages = None;
        self.records = None;
        count
    }

    /// Groups the loaded lines into raw messages and drops the lines.
    pub fn merge_multiline(&mut self) -> Result<usize> {
        let lines = self
            .lines
            .take()
            .ok_or_else(|| WhatsHappenedError::not_loaded("merge", "lines"))?;
        let messages = self.parser.merge(&lines);
        let count = messages.len();
        self.messages = Some(messages);
        Ok(count)
    }

    /// Classifies the raw messages and drops them.
    ///
    /// On error the raw messages are kept, so the stage can be retried after
    /// inspecting [`raw_messages`](Self::raw_messages).
    pub fn classify(&mut self) -> Result<usize> {
        let messages = self
            .messages
            .as_deref()
            .ok_or_else(|| WhatsHappenedError::not_loaded("classify", "raw messages"))?;
        let records = self.parser.classify(messages, self.path.as_deref())?;
        let count = records.len();
        self.messages = None;
        self.records = Some(records);
        Ok(count)
    }

    /// Runs every stage that has not run yet.
    pub fn run(&mut self) -> Result<&[Record]> {
        if self.records.is_none() {
            if self.messages.is_none() {
                if self.lines.is_none() {
                    self.load()?;
                }
                self.merge_multiline()?;
            }
            self.classify()?;
        }
        debug!(path = ?self.path, "parse complete");
        self.records
            .as_deref()
            .ok_or_else(|| WhatsHappenedError::not_loaded("run", "records"))
    }

    /// Returns the loaded lines, if the merge stage has not consumed them.
    pub fn lines(&self) -> Option<&[String]> {
        self.lines.as_deref()
    }

    /// Returns the raw messages, if the classify stage has not consumed them.
    pub fn raw_messages(&self) -> Option<&[RawMessage]> {
        self.messages.as_deref()
    }

    /// Returns the classified records, if available.
    pub fn records(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    /// Consumes the driver and returns the classified records.
    pub fn into_records(self) -> Result<Vec<Record>> {
        self.records
            .ok_or_else(|| WhatsHappenedError::not_loaded("into_records", "records"))
    }

    /// Returns the records as four parallel columns.
    pub fn columns(&self) -> Result<Columns> {
        self.records
            .as_deref()
            .map(Columns::from_records)
            .ok_or_else(|| WhatsHappenedError::not_loaded("columns", "records"))
    }
}
