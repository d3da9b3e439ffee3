//! CSV output writer.

use std::fs::File;
use std::io::Write;

use super::OutputConfig;
use crate::error::Result;
use crate::record::Record;

const HEADER: [&str; 4] = ["Timestamp", "Who", "Message", "Type"];

/// Writes records to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Timestamp`, `Who`, `Message`, `Type`
/// - Multi-line bodies are quoted and keep their line breaks
/// - Encoding: UTF-8
pub fn write_csv(records: &[Record], output_path: &str, config: &OutputConfig) -> Result<()> {
    config.validate()?;
    let file = File::create(output_path)?;
    write_records(records, file, config)
}

/// Converts records to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing to
/// a file.
pub fn to_csv(records: &[Record], config: &OutputConfig) -> Result<String> {
    config.validate()?;
    let mut buffer = Vec::new();
    write_records(records, &mut buffer, config)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_records<W: Write>(records: &[Record], sink: W, config: &OutputConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            config.format_timestamp(record)?.as_str(),
            record.author.as_str(),
            record.body.as_str(),
            record.category.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    fn records() -> Vec<Record> {
        let ts = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        vec![
            Record::new(ts, "Alice", "Hello", Category::Message),
            Record::system(ts, "Bob left", Category::Quit),
        ]
    }

    #[test]
    fn test_to_csv_basic() {
        let csv = to_csv(&records(), &OutputConfig::new()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Timestamp;Who;Message;Type"));
        assert_eq!(lines.next(), Some("2024-06-15 12:30:00;Alice;Hello;message"));
        assert_eq!(lines.next(), Some("2024-06-15 12:30:00;System;Bob left;quit"));
    }

    #[test]
    fn test_write_csv_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        write_csv(&records(), path, &OutputConfig::new()).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Alice;Hello"));
    }

    #[test]
    fn test_csv_multiline_body_is_quoted() {
        let ts = NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        let records = vec![Record::new(ts, "Alice", "Hello there\nstill Alice\n", Category::Message)];

        let csv = to_csv(&records, &OutputConfig::new()).unwrap();
        assert!(csv.contains("\"Hello there\nstill Alice\n\""));
    }

    #[test]
    fn test_csv_custom_timestamp_format() {
        let config = OutputConfig::new().with_timestamp_format("%d.%m.%Y %H:%M");
        let csv = to_csv(&records(), &config).unwrap();
        assert!(csv.contains("15.06.2024 12:30;Alice"));
    }

    #[test]
    fn test_csv_empty_has_header() {
        let csv = to_csv(&[], &OutputConfig::new()).unwrap();
        assert_eq!(csv.trim_end(), "Timestamp;Who;Message;Type");
    }
}
