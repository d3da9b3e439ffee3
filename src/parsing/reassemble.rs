//! Grouping physical lines into logical messages.

use std::fmt;

use tracing::warn;

use super::timestamp::TimestampMatcher;

/// One logical message before classification: one or more original lines,
/// concatenated with their terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// One-based number of the line the message starts on.
    pub line: usize,
    /// The concatenated lines, starting with the timestamp token unless
    /// header lines were folded in front of it.
    pub text: String,
}

impl RawMessage {
    /// Creates a raw message starting at the given one-based line.
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }

    /// Returns the message text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for RawMessage {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for RawMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Groups `lines` into raw messages.
///
/// A line continues the current message unless it starts with a timestamp
/// token. The scan looks one line ahead and never re-checks the line at the
/// cursor. Lines before the first timestamp are folded into the first
/// timestamped message and a warning is logged.
///
/// # Example
///
/// ```rust
/// use whatshappened::config::TimestampConfig;
/// use whatshappened::parsing::{TimestampMatcher, reassemble};
///
/// let matcher = TimestampMatcher::new(&TimestampConfig::default())?;
/// let lines = [
///     "01.02.21 um 09:15 - Alice: Hello there\n",
///     "still Alice\n",
///     "01.02.21 um 09:16 - Bob: Hi!\n",
/// ];
///
/// let messages = reassemble(&lines, &matcher);
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[0].text, "01.02.21 um 09:15 - Alice: Hello there\nstill Alice\n");
/// assert_eq!(messages[1].line, 3);
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
pub fn reassemble<S: AsRef<str>>(lines: &[S], matcher: &TimestampMatcher) -> Vec<RawMessage> {
    let mut messages = Vec::new();
    let mut cursor = 0;
    let mut carried = String::new();

    if let Some(header) = leading_header(lines, matcher) {
        cursor = leading_count(lines, matcher);
        warn!(
            lines = cursor,
            header = header.trim_end(),
            "input does not start with a timestamp; leading lines are folded into the first message and left out of its body"
        );
        carried = header;
    }

    while cursor < lines.len() {
        let start = if carried.is_empty() { cursor + 1 } else { 1 };
        let mut text = std::mem::take(&mut carried);
        text.push_str(lines[cursor].as_ref());

        while cursor + 1 < lines.len() && !matcher.starts_line(lines[cursor + 1].as_ref()) {
            cursor += 1;
            text.push_str(lines[cursor].as_ref());
        }

        messages.push(RawMessage::new(start, text));
        cursor += 1;
    }

    messages
}

/// Returns the text of the lines before the first timestamped line, or
/// `None` when the input starts with a timestamp or has none at all.
///
/// Classification reads from the timestamp token on, so this text never
/// reaches a record body.
pub fn leading_header<S: AsRef<str>>(lines: &[S], matcher: &TimestampMatcher) -> Option<String> {
    let leading = leading_count(lines, matcher);
    if leading == 0 || leading == lines.len() {
        return None;
    }
    Some(lines[..leading].iter().map(AsRef::as_ref).collect())
}

fn leading_count<S: AsRef<str>>(lines: &[S], matcher: &TimestampMatcher) -> usize {
    lines
        .iter()
        .take_while(|line| !matcher.starts_line(line.as_ref()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimestampConfig;

    fn matcher() -> TimestampMatcher {
        TimestampMatcher::new(&TimestampConfig::default()).unwrap()
    }

    #[test]
    fn test_single_line_messages() {
        let lines = [
            "01.02.21 um 09:15 - Alice: one\n",
            "01.02.21 um 09:16 - Bob: two\n",
            "01.02.21 um 09:17 - Alice: three\n",
        ];
        let messages = reassemble(&lines, &matcher());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].text, lines[2]);
        assert_eq!(messages[2].line, 3);
    }

    #[test]
    fn test_multiline_message() {
        let lines = [
            "01.02.21 um 09:15 - Alice: first\n",
            "second\n",
            "\n",
            "third\n",
            "01.02.21 um 09:16 - Bob: next\n",
        ];
        let messages = reassemble(&lines, &matcher());
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0].text,
            "01.02.21 um 09:15 - Alice: first\nsecond\n\nthird\n"
        );
        assert_eq!(messages[1].line, 5);
    }

    #[test]
    fn test_trailing_continuation() {
        let lines = ["01.02.21 um 09:15 - Alice: first\n", "tail"];
        let messages = reassemble(&lines, &matcher());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "01.02.21 um 09:15 - Alice: first\ntail");
    }

    #[test]
    fn test_leading_lines_fold_into_first_message() {
        let lines = [
            "exported chat\n",
            "more header\n",
            "01.02.21 um 09:15 - Alice: first\n",
            "01.02.21 um 09:16 - Bob: second\n",
        ];
        let messages = reassemble(&lines, &matcher());
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0].text,
            "exported chat\nmore header\n01.02.21 um 09:15 - Alice: first\n"
        );
        assert_eq!(messages[0].line, 1);
        assert_eq!(messages[1].line, 4);
    }

    #[test]
    fn test_leading_header_text() {
        let lines = [
            "exported chat\n",
            "more header\n",
            "01.02.21 um 09:15 - Alice: first\n",
        ];
        assert_eq!(
            leading_header(&lines, &matcher()).as_deref(),
            Some("exported chat\nmore header\n")
        );
        assert_eq!(leading_header(&lines[2..], &matcher()), None);
        assert_eq!(leading_header(&lines[..2], &matcher()), None);
    }

    #[test]
    fn test_no_timestamp_at_all_is_one_message() {
        let lines = ["just\n", "some\n", "text\n"];
        let messages = reassemble(&lines, &matcher());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "just\nsome\ntext\n");
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        assert!(reassemble(&lines, &matcher()).is_empty());
    }

    #[test]
    fn test_token_inside_continuation_does_not_split() {
        let lines = [
            "01.02.21 um 09:15 - Alice: see\n",
            "we said 01.02.21 um 09:15 before\n",
        ];
        let messages = reassemble(&lines, &matcher());
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_owned_lines() {
        let lines = vec![
            String::from("\u{200e}01.02.21 um 09:15 - Alice: first\n"),
            String::from("\u{200e}01.02.21 um 09:16 - Bob: second\n"),
        ];
        assert_eq!(reassemble(&lines, &matcher()).len(), 2);
    }
}
