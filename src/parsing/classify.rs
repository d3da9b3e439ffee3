//! Turning raw messages into classified records.
//!
//! Classification is an ordered list of rules evaluated first-match-wins:
//!
//! | Order | Category | Author |
//! |-------|----------|--------|
//! | 1 | `topic` | name in front of the phrase |
//! | 2 | `security` | `System` |
//! | 3 | `picture` | name in front of the phrase |
//! | 4 | `add` | `System` |
//! | 5 | `quit` | `System` |
//! | 6 | `remove` | `System` |
//! | 7 | `message` (payload has a colon) | text before the first colon |
//! | 8 | `unknown` | `???` |
//!
//! Phrase rules only look at the payload up to its first colon. A message
//! like `Alice: I left the group chat open` therefore stays a `message`, while
//! `Bob left the group: bye` is a `quit` event.

use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;

use super::reassemble::RawMessage;
use super::timestamp::TimestampMatcher;
use crate::config::ParserConfig;
use crate::error::{Result, WhatsHappenedError};
use crate::record::{Category, Record, SYSTEM_AUTHOR};

/// Where a phrase rule takes the record's author from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthorSource {
    /// The text in front of the phrase, with self substitution.
    Actor,
    /// Always [`SYSTEM_AUTHOR`].
    System,
}

#[derive(Debug, Clone)]
struct Rule {
    category: Category,
    phrase: Regex,
    author: AuthorSource,
}

impl Rule {
    fn compile(
        name: &'static str,
        pattern: &str,
        category: Category,
        author: AuthorSource,
    ) -> Result<Self> {
        let phrase =
            Regex::new(pattern).map_err(|e| WhatsHappenedError::invalid_pattern(name, e))?;
        Ok(Self {
            category,
            phrase,
            author,
        })
    }
}

/// Classifies raw messages into [`Record`]s.
///
/// The classifier is immutable after construction and holds no state between
/// calls, so a single instance can be shared across threads.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::ParserConfig;
/// use whatshappened::parsing::Classifier;
/// use whatshappened::Category;
///
/// let config = ParserConfig::new().with_exporter_name("Phil");
/// let classifier = Classifier::new(&config)?;
///
/// let record = classifier.classify("01.02.21 um 09:15 - You changed the subject to Trip Planning\n")?;
/// assert_eq!(record.category, Category::Topic);
/// assert_eq!(record.author, "Phil");
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    timestamps: TimestampMatcher,
    rules: Vec<Rule>,
    self_name: String,
    exporter_name: String,
    trim_chars: Vec<char>,
}

impl Classifier {
    /// Compiles the timestamp grammar and phrase table of `config`.
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let phrases = &config.phrases;
        let rules = vec![
            Rule::compile("topic", &phrases.topic, Category::Topic, AuthorSource::Actor)?,
            Rule::compile(
                "security",
                &phrases.security,
                Category::Security,
                AuthorSource::System,
            )?,
            Rule::compile(
                "picture",
                &phrases.picture,
                Category::Picture,
                AuthorSource::Actor,
            )?,
            Rule::compile("add", &phrases.add, Category::Add, AuthorSource::System)?,
            Rule::compile("quit", &phrases.quit, Category::Quit, AuthorSource::System)?,
            Rule::compile(
                "remove",
                &phrases.remove,
                Category::Remove,
                AuthorSource::System,
            )?,
        ];

        Ok(Self {
            timestamps: TimestampMatcher::new(&config.timestamp)?,
            rules,
            self_name: config.self_name.clone(),
            exporter_name: config.exporter_name.clone(),
            trim_chars: config.trim_chars.clone(),
        })
    }

    /// Returns the compiled timestamp grammar.
    pub fn timestamps(&self) -> &TimestampMatcher {
        &self.timestamps
    }

    /// Classifies one raw message.
    ///
    /// Fails only if the message has no locatable timestamp token; any
    /// payload shape that is not recognized becomes an `unknown` record.
    pub fn classify(&self, raw: &str) -> Result<Record> {
        let (timestamp, payload) = self
            .timestamps
            .locate(raw)
            .ok_or_else(|| WhatsHappenedError::malformed_timestamp(raw))?;
        Ok(self.classify_payload(timestamp, payload))
    }

    /// Classifies every raw message, failing on the first malformed one.
    ///
    /// Errors carry the message index, its starting line and `file`.
    pub fn classify_all(&self, messages: &[RawMessage], file: Option<&Path>) -> Result<Vec<Record>> {
        messages
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                self.classify(raw.as_str())
                    .map_err(|e| e.at_message(index, raw.line, file))
            })
            .collect()
    }

    /// Classifies a payload whose timestamp is already known.
    pub fn classify_payload(&self, timestamp: NaiveDateTime, payload: &str) -> Record {
        let head = before_colon(payload);

        for rule in &self.rules {
            if let Some(found) = rule.phrase.find(head) {
                let author = match rule.author {
                    AuthorSource::Actor => self.actor(&head[..found.start()]),
                    AuthorSource::System => SYSTEM_AUTHOR.to_string(),
                };
                return Record::new(timestamp, author, payload, rule.category);
            }
        }

        match payload.split_once(':') {
            Some((name, text)) => Record::new(
                timestamp,
                self.trim_name(name),
                self.trim_body(text),
                Category::Message,
            ),
            None => Record::unknown(timestamp, payload),
        }
    }

    /// Returns the category of the first phrase rule matching `payload`, or
    /// `None` if the payload would fall through to colon splitting.
    pub fn phrase_category(&self, payload: &str) -> Option<Category> {
        let head = before_colon(payload);
        self.rules
            .iter()
            .find(|rule| rule.phrase.is_match(head))
            .map(|rule| rule.category)
    }

    fn is_trimmed(&self, c: char) -> bool {
        c.is_whitespace() || self.trim_chars.contains(&c)
    }

    fn trim_name(&self, name: &str) -> String {
        name.trim_matches(|c| self.is_trimmed(c)).to_string()
    }

    /// Leading whitespace and marks go; trailing marks go but line
    /// terminators stay.
    fn trim_body(&self, text: &str) -> String {
        text.trim_start_matches(|c| self.is_trimmed(c))
            .trim_end_matches(|c| self.trim_chars.contains(&c))
            .to_string()
    }

    fn actor(&self, text: &str) -> String {
        let name = self.trim_name(text);
        if name == self.self_name {
            self.exporter_name.clone()
        } else {
            name
        }
    }
}

fn before_colon(payload: &str) -> &str {
    payload.split_once(':').map_or(payload, |(head, _)| head)
}
