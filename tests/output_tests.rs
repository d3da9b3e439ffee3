//! Tests for everything downstream of parsing: filters, post-processing,
//! anonymization, statistics and the output writers.

use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use whatshappened::config::{ParserConfig, PostProcessConfig};
use whatshappened::core::postprocess::{self, REDACTED};
use whatshappened::core::{Columns, FilterConfig, OutputConfig, Summary, apply_filters};
use whatshappened::format::{OutputFormat, to_format_string, write_to_format};
use whatshappened::parser::parse_str;
use whatshappened::{Category, Record};

const EXPORT: &str = "01.02.21 um 09:15 - Alice: Hello there
still Alice
01.02.21 um 09:16 - You changed the subject to \"Trip Planning\"
01.02.21 um 09:17 - Bob: my pin is 1234
02.02.21 um 10:00 - Bob left
03.02.21 um 11:30 - Alice: anyone here?
";

fn records() -> Vec<Record> {
    parse_str(EXPORT, &ParserConfig::new().with_exporter_name("Phil")).unwrap()
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_filter_by_date_range() {
    let filter = FilterConfig::new()
        .with_date_from("2021-02-02")
        .unwrap()
        .with_date_to("2021-02-02")
        .unwrap();

    let filtered = apply_filters(records(), &filter);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].category, Category::Quit);
}

#[test]
fn test_filter_by_author_and_category() {
    let filter = FilterConfig::new()
        .with_author("alice")
        .with_category(Category::Message);

    let filtered = apply_filters(records(), &filter);
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|r| r.author == "Alice"));
}

#[test]
fn test_filter_keeps_order() {
    let filter = FilterConfig::new()
        .with_category(Category::Message)
        .with_category(Category::Quit);

    let bodies: Vec<String> = apply_filters(records(), &filter)
        .into_iter()
        .map(|r| r.body)
        .collect();
    assert_eq!(
        bodies,
        vec![
            "Hello there\nstill Alice\n",
            "my pin is 1234\n",
            "Bob left\n",
            "anyone here?\n",
        ]
    );
}

#[test]
fn test_inactive_filter_is_identity() {
    assert_eq!(apply_filters(records(), &FilterConfig::new()), records());
}

// ============================================================================
// Post-processing
// ============================================================================

#[test]
fn test_postprocess_pipeline() {
    let config = PostProcessConfig::new()
        .with_rename("Alice", "A.")
        .with_redaction("1234")
        .with_drop_containing("anyone");

    let processed = postprocess::apply(records(), &config);
    assert_eq!(processed.len(), 4);
    assert_eq!(processed[0].author, "A.");
    assert_eq!(processed[2].body, format!("my pin is {REDACTED}\n"));
}

#[test]
fn test_postprocess_drop_author_uses_original_name() {
    let config = PostProcessConfig::new()
        .with_drop_author("Bob")
        .with_rename("Bob", "Robert");

    let processed = postprocess::apply(records(), &config);
    assert!(processed.iter().all(|r| r.author != "Bob" && r.author != "Robert"));
    // "Bob left" is authored by System and survives
    assert!(processed.iter().any(|r| r.category == Category::Quit));
}

#[cfg(feature = "anonymize")]
#[test]
fn test_anonymize_with_seed_is_reproducible() {
    use whatshappened::core::Anonymizer;

    let first = Anonymizer::with_seed(42).anonymize(records());
    let second = Anonymizer::with_seed(42).anonymize(records());
    assert_eq!(first, second);

    // Same participant, same pseudonym
    assert_eq!(first[0].author, first[4].author);
    assert_ne!(first[0].author, "Alice");
    assert_ne!(first[0].author, first[2].author);

    // Sentinels are kept
    assert_eq!(first[3].author, "System");
}

#[cfg(feature = "anonymize")]
#[test]
fn test_anonymize_mapping() {
    use whatshappened::core::Anonymizer;

    let mut anonymizer = Anonymizer::with_seed(7).with_name_len(6);
    let anonymized = anonymizer.anonymize(records());

    let mapping = anonymizer.mapping();
    assert_eq!(mapping.len(), 3);
    assert_eq!(mapping["Alice"], anonymized[0].author);
    assert!(mapping.values().all(|name| name.len() == 6));
    assert!(!mapping.contains_key("System"));
}

// ============================================================================
// Statistics and columns
// ============================================================================

#[test]
fn test_summary() {
    let summary = Summary::from_records(&records());

    assert_eq!(summary.total, 5);
    assert_eq!(summary.count(Category::Message), 3);
    assert_eq!(summary.count(Category::Topic), 1);
    assert_eq!(summary.count(Category::Add), 0);
    assert_eq!(summary.messages_by("Alice"), 2);
    assert_eq!(summary.most_active()[0], ("Alice", 2));
    assert!(summary.participants.contains("Phil"));
    assert!(summary.participants.contains("System"));
    assert_eq!(summary.first, Some(records()[0].timestamp));
    assert_eq!(summary.last, Some(records()[4].timestamp));

    let text = summary.to_string();
    assert!(text.contains("Records: 5"));
    assert!(text.contains("Alice: 2"));
}

#[test]
fn test_summary_serializes() {
    let json = serde_json::to_value(Summary::from_records(&records())).unwrap();
    assert_eq!(json["total"], 5);
    assert_eq!(json["messages_per_author"]["Bob"], 1);
}

#[test]
fn test_columns_serialize_as_parallel_arrays() {
    let columns = Columns::from(records());
    let json = serde_json::to_value(&columns).unwrap();

    assert_eq!(json["who"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["type"][1], "topic");
    assert_eq!(json["message"][3], "Bob left\n");
}

#[test]
fn test_columns_from_iterator() {
    let columns: Columns = records()
        .into_iter()
        .filter(|r| r.category == Category::Message)
        .collect();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns.who(), ["Alice", "Bob", "Alice"]);
}

// ============================================================================
// Writers
// ============================================================================

#[cfg(feature = "json-output")]
#[test]
fn test_json_output() {
    let json = to_format_string(&records(), OutputFormat::Json, &OutputConfig::new()).unwrap();
    let rows: Vec<Value> = serde_json::from_str(&json).unwrap();

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["timestamp"], "2021-02-01 09:15:00");
    assert_eq!(rows[0]["who"], "Alice");
    assert_eq!(rows[0]["message"], "Hello there\nstill Alice\n");
    assert_eq!(rows[0]["type"], "message");
    assert_eq!(rows[1]["who"], "Phil");
    assert_eq!(rows[3]["type"], "quit");
}

#[cfg(feature = "json-output")]
#[test]
fn test_jsonl_output() {
    let config = OutputConfig::new().with_timestamp_format("%d.%m.%Y %H:%M");
    let jsonl = to_format_string(&records(), OutputFormat::Jsonl, &config).unwrap();

    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(lines.len(), 5);
    for line in &lines {
        let row: Value = serde_json::from_str(line).unwrap();
        assert!(row.get("who").is_some());
    }
    let last: Value = serde_json::from_str(lines[4]).unwrap();
    assert_eq!(last["timestamp"], "03.02.2021 11:30");
}

#[cfg(feature = "csv-output")]
#[test]
fn test_csv_output() {
    let csv = to_format_string(&records(), OutputFormat::Csv, &OutputConfig::new()).unwrap();

    assert!(csv.starts_with("Timestamp;Who;Message;Type"));
    assert!(csv.contains("2021-02-01 09:15:00;Alice;\"Hello there\nstill Alice\n\";message"));
    assert!(csv.contains(";System;\"Bob left\n\";quit"));
}

#[cfg(all(feature = "csv-output", feature = "json-output"))]
#[test]
fn test_write_to_format_all_formats() {
    let dir = tempdir().unwrap();

    for &format in OutputFormat::all() {
        let path = dir.path().join(format!("chat.{}", format.extension()));
        let path = path.to_str().unwrap();

        write_to_format(&records(), path, format, &OutputConfig::new()).unwrap();

        let written = fs::read_to_string(path).unwrap();
        let expected = to_format_string(&records(), format, &OutputConfig::new()).unwrap();
        assert_eq!(written, expected, "format {format}");
    }
}

#[cfg(feature = "json-output")]
#[test]
fn test_invalid_timestamp_format_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    let config = OutputConfig::new().with_timestamp_format("%Q");

    let err = write_to_format(&records(), path.to_str().unwrap(), OutputFormat::Json, &config)
        .unwrap_err();
    assert!(err.to_string().contains("%Q"));
    assert!(!path.exists());
}

#[cfg(feature = "csv-output")]
#[test]
fn test_write_to_missing_directory_fails() {
    let err = write_to_format(
        &records(),
        "/definitely/not/here/out.csv",
        OutputFormat::Csv,
        &OutputConfig::new(),
    )
    .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_format_from_path() {
    assert_eq!(OutputFormat::from_path("a/b/chat.jsonl").unwrap(), OutputFormat::Jsonl);
    assert_eq!(OutputFormat::from_path("chat.CSV").unwrap(), OutputFormat::Csv);
    assert!(OutputFormat::from_path("chat.xml").is_err());
}
