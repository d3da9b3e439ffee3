//! Loading the raw export as lines.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{Result, WhatsHappenedError};

/// Reads `path` and decodes it with the encoding named by `encoding_label`.
///
/// Lines keep their terminators, so concatenating the result reproduces the
/// decoded file content exactly. A byte order mark matching the encoding is
/// skipped; malformed byte sequences fail the read instead of being replaced.
///
/// # Example
///
/// ```rust,no_run
/// use whatshappened::parsing::read_lines;
///
/// let lines = read_lines("chat.txt", "utf-8")?;
/// println!("{} lines", lines.len());
/// # Ok::<(), whatshappened::WhatsHappenedError>(())
/// ```
pub fn read_lines(path: impl AsRef<Path>, encoding_label: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let encoding = lookup_encoding(encoding_label)?;
    let bytes = fs::read(path).map_err(|e| WhatsHappenedError::read(path, e))?;

    let text = decode_bytes(&bytes, encoding).ok_or_else(|| WhatsHappenedError::Decode {
        path: Some(path.to_path_buf()),
        encoding: encoding.name(),
    })?;
    debug!(
        bytes = bytes.len(),
        encoding = encoding.name(),
        path = %path.display(),
        "decoded export"
    );

    Ok(split_lines(&text))
}

/// Resolves an encoding label such as `"utf-8"`, `"latin1"` or `"utf-16le"`.
pub fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        WhatsHappenedError::UnknownEncoding {
            label: label.to_string(),
        }
    })
}

/// Decodes `bytes`, returning `None` on malformed input.
pub fn decode_bytes<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    let bytes = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Splits text into lines, keeping each line's `\n` terminator.
///
/// ```rust
/// use whatshappened::parsing::split_lines;
///
/// assert_eq!(split_lines("a\nb\n"), vec!["a\n", "b\n"]);
/// assert_eq!(split_lines("a\nb"), vec!["a\n", "b"]);
/// assert!(split_lines("").is_empty());
/// ```
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_owned).collect()
}
