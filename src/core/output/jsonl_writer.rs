//! JSON Lines (JSONL) output writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use super::{OutputConfig, OutputRecord};
use crate::error::Result;
use crate::record::Record;

/// Writes records to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"timestamp":"2021-02-01 09:15:00","who":"Alice","message":"Hello\n","type":"message"}
/// {"timestamp":"2021-02-01 09:16:00","who":"System","message":"Bob left\n","type":"quit"}
/// ```
pub fn write_jsonl(records: &[Record], output_path: &str, config: &OutputConfig) -> Result<()> {
    config.validate()?;
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(records, &mut writer, config)?;
    writer.flush()?;
    Ok(())
}

/// Converts records to a JSONL string.
pub fn to_jsonl(records: &[Record], config: &OutputConfig) -> Result<String> {
    config.validate()?;
    let mut buffer = Vec::new();
    write_lines(records, &mut buffer, config)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_lines<W: Write>(records: &[Record], writer: &mut W, config: &OutputConfig) -> Result<()> {
    for record in records {
        let line = serde_json::to_string(&OutputRecord::new(record, config)?)?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use chrono::NaiveDate;
    use std::io::{BufRead, BufReader};
    use tempfile::NamedTempFile;

    fn records() -> Vec<Record> {
        let ts = NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        vec![
            Record::new(ts, "Alice", "Hello\nthere\n", Category::Message),
            Record::system(ts, "Bob left\n", Category::Quit),
        ]
    }

    #[test]
    fn test_write_jsonl_basic() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        write_jsonl(&records(), path, &OutputConfig::new()).unwrap();

        let file = std::fs::File::open(path).unwrap();
        let lines: Vec<String> = BufReader::new(file).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["who"], "Alice");
        assert_eq!(first["message"], "Hello\nthere\n");

        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["type"], "quit");
    }

    #[test]
    fn test_jsonl_no_array_brackets() {
        let content = to_jsonl(&records(), &OutputConfig::new()).unwrap();
        assert!(!content.starts_with('['));
        assert_eq!(content.lines().count(), 2);
    }
}
