//! JSON output writer.

use std::fs::File;
use std::io::Write;

use super::{OutputConfig, OutputRecord};
use crate::error::Result;
use crate::record::Record;

/// Writes records to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"timestamp": "2021-02-01 09:15:00", "who": "Alice", "message": "Hello\n", "type": "message"},
///   {"timestamp": "2021-02-01 09:16:00", "who": "System", "message": "Bob left\n", "type": "quit"}
/// ]
/// ```
pub fn write_json(records: &[Record], output_path: &str, config: &OutputConfig) -> Result<()> {
    let json = to_json(records, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts records to a pretty-printed JSON array.
pub fn to_json(records: &[Record], config: &OutputConfig) -> Result<String> {
    config.validate()?;
    let rows = records
        .iter()
        .map(|record| OutputRecord::new(record, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(serde_json::to_string_pretty(&rows)?)
}
