//! Timestamp token recognition and parsing.
//!
//! The token grammar comes from [`TimestampConfig`]. It is compiled twice: an
//! anchored form used on line prefixes to find message boundaries, and an
//! unanchored form used to locate and parse the token inside a message.

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::config::TimestampConfig;
use crate::error::{Result, WhatsHappenedError};

/// Named groups every timestamp pattern must define.
const REQUIRED_GROUPS: [&str; 5] = ["day", "month", "year", "hour", "minute"];

/// Compiled timestamp grammar.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::TimestampConfig;
/// use whatshappened::parsing::TimestampMatcher;
///
/// let matcher = TimestampMatcher::new(&TimestampConfig::default())?;
///
/// assert!(matcher.starts_line("01.02.21 um 09:15 - Alice: Hi\n"));
/// assert!(!matcher.starts_line("see you at 01.02.21 um 09:15\n"));
///
/// let (timestamp, payload) = matcher.locate("01.02.21 um 09:15 - Alice: Hi\n").unwrap();
/// assert_eq!(timestamp.to_string(), "2021-02-01 09:15:00");
/// assert_eq!(payload, "Alice: Hi\n");
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TimestampMatcher {
    line_start: Regex,
    token: Regex,
    separator: String,
    scan_len: usize,
}

impl TimestampMatcher {
    /// Compiles the grammar, checking that all required groups exist.
    pub fn new(config: &TimestampConfig) -> Result<Self> {
        let token = Regex::new(&config.pattern)
            .map_err(|e| WhatsHappenedError::invalid_pattern("timestamp", e))?;

        for group in REQUIRED_GROUPS {
            if !token.capture_names().flatten().any(|name| name == group) {
                return Err(WhatsHappenedError::invalid_pattern(
                    "timestamp",
                    regex::Error::Syntax(format!("missing named group '{group}'")),
                ));
            }
        }

        let marks: String = config
            .directional_marks
            .iter()
            .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
            .collect();
        let anchored = if marks.is_empty() {
            format!("^(?:{})", config.pattern)
        } else {
            format!("^[{marks}]?(?:{})", config.pattern)
        };
        let line_start = Regex::new(&anchored)
            .map_err(|e| WhatsHappenedError::invalid_pattern("timestamp", e))?;

        Ok(Self {
            line_start,
            token,
            separator: config.separator.clone(),
            scan_len: config.scan_len,
        })
    }

    /// Returns `true` if `line` begins with a timestamp token.
    ///
    /// Only the first `scan_len` characters are inspected, so a token-like
    /// text further into a continuation line never starts a new message.
    pub fn starts_line(&self, line: &str) -> bool {
        let end = line
            .char_indices()
            .nth(self.scan_len)
            .map_or(line.len(), |(idx, _)| idx);
        self.line_start.is_match(&line[..end])
    }

    /// Finds the first timestamp token anywhere in `message` and returns the
    /// parsed date/time together with the payload that follows it.
    ///
    /// The configured separator is removed from the front of the payload when
    /// present. Returns `None` when there is no token or it names an
    /// impossible date.
    pub fn locate<'a>(&self, message: &'a str) -> Option<(NaiveDateTime, &'a str)> {
        let caps = self.token.captures(message)?;
        let whole = caps.get(0)?;
        let timestamp = datetime_from_captures(&caps)?;

        let rest = &message[whole.end()..];
        let payload = rest.strip_prefix(self.separator.as_str()).unwrap_or(rest);
        Some((timestamp, payload))
    }
}

fn number(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group)?.as_str().parse().ok()
}

/// Builds a date/time from the named groups; years of up to two digits are
/// in the 2000s.
fn datetime_from_captures(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let year_text = caps.name("year")?.as_str();
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() <= 2 {
        year += 2000;
    }

    let second = match caps.name("second") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    NaiveDate::from_ymd_opt(year, number(caps, "month")?, number(caps, "day")?)?.and_hms_opt(
        number(caps, "hour")?,
        number(caps, "minute")?,
        second,
    )
}
