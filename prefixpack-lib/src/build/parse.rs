//! Parsing of pipe-delimited prefix files.
//!
//! Each record line is `<prefix>|<value>`. Lines starting with `#` and blank
//! lines are skipped. Any malformed record aborts parsing with an error naming
//! the source and the 1-based line number.

use crate::Result;
use crate::tables::{LabelTable, Prefix, ZoneTable};
use ohno::bail;

const LOG_TARGET: &str = "     parse";

/// One parsed record line, borrowing from the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub line_no: usize,
    pub line: &'a str,
    pub prefix: Prefix,

    /// Trimmed value field, possibly empty
    pub value: &'a str,
}

/// Iterate over the records in `text`, skipping comments and blank lines.
pub fn records<'a>(source: &'a str, text: &'a str) -> impl Iterator<Item = Result<RawRecord<'a>>> + 'a {
    text.lines()
        .enumerate()
        .filter_map(move |(i, line)| parse_line(source, i + 1, line).transpose())
}

fn parse_line<'a>(source: &str, line_no: usize, line: &'a str) -> Result<Option<RawRecord<'a>>> {
    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = line.split('|');
    let (Some(prefix), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
        bail!("invalid format on line {line_no} of {source}: expected '<prefix>|<value>', got '{line}'");
    };

    let prefix = match prefix.parse::<i32>() {
        Ok(p) if p < 0 => bail!("negative prefix on line {line_no} of {source}: '{line}'"),
        Ok(p) => p.cast_unsigned(),
        Err(_) => bail!("invalid prefix on line {line_no} of {source}: '{line}'"),
    };

    let value = value.trim();
    if value.is_empty() {
        log::warn!(target: LOG_TARGET, "Empty value on line {line_no} of {source}: '{line}'");
    }

    Ok(Some(RawRecord { line_no, line, prefix, value }))
}

/// Add every `<prefix>|<label>` record in `text` to `table`.
///
/// A prefix already in `table`, whether from this text or an earlier one, is an error.
/// Returns the number of records added.
pub fn read_label_lines(source: &str, text: &str, table: &mut LabelTable) -> Result<usize> {
    let mut added = 0;
    for record in records(source, text) {
        let record = record?;
        if table.contains(record.prefix) {
            bail!(
                "repeated prefix {} on line {} of {source}: '{}'",
                record.prefix,
                record.line_no,
                record.line
            );
        }
        table.try_insert(record.prefix, record.value.to_string())?;
        added += 1;
    }
    Ok(added)
}

/// Parse `<prefix>|<zone>&<zone>...` records into a zone table.
///
/// Zone order within a record is kept as written.
pub fn parse_zone_lines(source: &str, text: &str) -> Result<ZoneTable> {
    let mut table = ZoneTable::new();
    for record in records(source, text) {
        let record = record?;
        if table.contains(record.prefix) {
            bail!(
                "repeated prefix {} on line {} of {source}: '{}'",
                record.prefix,
                record.line_no,
                record.line
            );
        }
        let zones: Vec<String> = record.value.split('&').map(|z| z.trim().to_string()).collect();
        if !record.value.is_empty() && zones.iter().any(String::is_empty) {
            log::warn!(
                target: LOG_TARGET,
                "Empty timezone on line {} of {source}: '{}'",
                record.line_no,
                record.line
            );
        }
        table.try_insert(record.prefix, zones)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records warnings so tests can check what was reported.
    struct CaptureLogger {
        lines: Mutex<Vec<String>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                self.lines.lock().unwrap().push(format!("{}", record.args()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger { lines: Mutex::new(Vec::new()) };

    /// Warnings logged so far that mention `source`.
    fn warnings_for(source: &str) -> Vec<String> {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Warn);
        CAPTURE
            .lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.contains(source))
            .cloned()
            .collect()
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let text = "# Copyright\n\n   \n1|North America\n# trailing comment\n";
        let records: Vec<_> = records("test.txt", text).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_no, 4);
        assert_eq!(records[0].prefix, 1);
        assert_eq!(records[0].value, "North America");
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut table = LabelTable::new();
        let added = read_label_lines("test.txt", "1|A\r\n7|B\r\n", &mut table).unwrap();
        assert_eq!(added, 2);
        assert_eq!(table.get(7).map(String::as_str), Some("B"));
    }

    #[test]
    fn test_value_is_trimmed() {
        let mut table = LabelTable::new();
        let _ = read_label_lines("test.txt", "44| United Kingdom \n", &mut table).unwrap();
        assert_eq!(table.get(44).map(String::as_str), Some("United Kingdom"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let mut table = LabelTable::new();
        let _ = read_label_lines("test.txt", "1|  \n", &mut table).unwrap();
        assert_eq!(table.get(1).map(String::as_str), Some(""));
    }

    #[test]
    fn test_empty_value_warns() {
        let _ = warnings_for("empty_label.txt");
        let mut table = LabelTable::new();
        let _ = read_label_lines("empty_label.txt", "1|North America\n7|\n", &mut table).unwrap();

        let warnings = warnings_for("empty_label.txt");
        assert_eq!(warnings, ["Empty value on line 2 of empty_label.txt: '7|'"]);
    }

    #[test]
    fn test_repeated_prefix_names_line() {
        let text = "1|North America\n44|United Kingdom\n44|United Kingdom\n";
        let mut table = LabelTable::new();
        let result = read_label_lines("test.txt", text, &mut table);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("repeated prefix 44 on line 3 of test.txt"), "{msg}");
    }

    #[test]
    fn test_repeated_prefix_across_texts() {
        let mut table = LabelTable::new();
        let _ = read_label_lines("1.txt", "1201|Verizon\n", &mut table).unwrap();
        let result = read_label_lines("44.txt", "1201|Vodafone\n", &mut table);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("repeated prefix 1201 on line 1 of 44.txt"), "{msg}");
    }

    #[test]
    fn test_wrong_field_count() {
        let mut table = LabelTable::new();
        let result = read_label_lines("test.txt", "1|A\n7\n", &mut table);
        assert!(result.unwrap_err().to_string().contains("invalid format on line 2"));

        let result = read_label_lines("test.txt", "1|A|B\n", &mut LabelTable::new());
        assert!(result.unwrap_err().to_string().contains("invalid format on line 1"));
    }

    #[test]
    fn test_non_numeric_prefix() {
        let result = read_label_lines("test.txt", "abc|A\n", &mut LabelTable::new());
        assert!(result.unwrap_err().to_string().contains("invalid prefix on line 1"));
    }

    #[test]
    fn test_out_of_range_prefix() {
        let result = read_label_lines("test.txt", "99999999999|A\n", &mut LabelTable::new());
        assert!(result.unwrap_err().to_string().contains("invalid prefix on line 1"));
    }

    #[test]
    fn test_negative_prefix() {
        let result = read_label_lines("test.txt", "-44|A\n", &mut LabelTable::new());
        assert!(result.unwrap_err().to_string().contains("negative prefix on line 1"));
    }

    #[test]
    fn test_zone_lines() {
        let text = "# header\n1201|America/New_York\n1|America/New_York&America/Chicago&America/Denver\n";
        let table = parse_zone_lines("map_data.txt", text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(1).unwrap(),
            &["America/New_York", "America/Chicago", "America/Denver"]
        );
        assert_eq!(table.get(1_201).unwrap(), &["America/New_York"]);
    }

    #[test]
    fn test_zone_lines_repeated_prefix() {
        let text = "1|America/New_York\n1|America/Chicago\n";
        let result = parse_zone_lines("map_data.txt", text);
        assert!(result.unwrap_err().to_string().contains("repeated prefix 1 on line 2 of map_data.txt"));
    }

    #[test]
    fn test_empty_zone_member_warns() {
        let _ = warnings_for("empty_zone.txt");
        let table = parse_zone_lines("empty_zone.txt", "1|&\n7|Europe/Moscow\n").unwrap();
        assert_eq!(table.get(1).unwrap(), &["", ""]);

        let warnings = warnings_for("empty_zone.txt");
        assert_eq!(warnings, ["Empty timezone on line 1 of empty_zone.txt: '1|&'"]);
    }
}
