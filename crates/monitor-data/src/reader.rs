//! Reading file discovery and loading for the tank monitor.
//!
//! Reads tank-level series from JSON or CSV files (or a directory of them)
//! and converts them into [`Reading`] structs for analysis.

use std::path::{Path, PathBuf};

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::Reading;
use serde::Deserialize;
use tracing::{debug, warn};

// ── File formats ──────────────────────────────────────────────────────────────

/// A JSON reading, either `{"label": .., "level": ..}` or `[label, level]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawReading {
    Object {
        #[serde(alias = "time")]
        label: String,
        level: f64,
    },
    Pair(String, f64),
}

impl From<RawReading> for Reading {
    fn from(raw: RawReading) -> Self {
        match raw {
            RawReading::Object { label, level } | RawReading::Pair(label, level) => {
                Reading::new(label, level)
            }
        }
    }
}

/// Supported on-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingFormat {
    Json,
    Csv,
}

impl ReadingFormat {
    /// Detect the format from `path`'s extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(ReadingFormat::Json),
            "csv" => Some(ReadingFormat::Csv),
            _ => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` / `.csv` files recursively under `dir`, sorted by path.
pub fn find_reading_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Readings path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && ReadingFormat::from_path(entry.path()).is_some()
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load readings from a file or a directory.
///
/// A directory contributes every reading file beneath it, concatenated in
/// path order. Input order is preserved; nothing is re-sorted by time.
pub fn load_readings(path: &Path) -> Result<Vec<Reading>> {
    if path.is_dir() {
        let files = find_reading_files(path);
        if files.is_empty() {
            return Err(MonitorError::NoReadingFiles(path.to_path_buf()));
        }

        let mut all = Vec::new();
        for file in &files {
            all.extend(load_reading_file(file)?);
        }
        debug!(
            "Loaded {} readings from {} files under {}",
            all.len(),
            files.len(),
            path.display()
        );
        return Ok(all);
    }

    load_reading_file(path)
}

/// Load a single `.json` or `.csv` readings file.
pub fn load_reading_file(path: &Path) -> Result<Vec<Reading>> {
    let format = ReadingFormat::from_path(path)
        .ok_or_else(|| MonitorError::UnsupportedFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|source| MonitorError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let readings = match format {
        ReadingFormat::Json => parse_json(&content)?,
        ReadingFormat::Csv => parse_csv(&content)?,
    };

    debug!("Loaded {} readings from {}", readings.len(), path.display());
    Ok(readings)
}

/// Parse a JSON array of readings.
pub fn parse_json(content: &str) -> Result<Vec<Reading>> {
    let raw: Vec<RawReading> = serde_json::from_str(content)?;
    let readings: Vec<Reading> = raw.into_iter().map(Reading::from).collect();
    for reading in &readings {
        validate_level(reading)?;
    }
    Ok(readings)
}

/// Parse `Time,Level[,Change]` CSV text.
///
/// The header row is optional and recognised on the first non-blank record.
/// A leading UTF-8 BOM is ignored, fields are trimmed and may be
/// double-quoted, and extra columns are ignored.
pub fn parse_csv(content: &str) -> Result<Vec<Reading>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut readings = Vec::new();
    let mut seen_record = false;

    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&e))?;
        let line_no = record.position().map_or(0, |p| p.line() as usize);
        if record.iter().all(str::is_empty) {
            continue;
        }

        let is_first = !seen_record;
        seen_record = true;
        if is_first && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("time")) {
            continue;
        }

        let (label, level) = match (record.get(0), record.get(1)) {
            (Some(label), Some(level)) => (label, level),
            _ => {
                return Err(MonitorError::CsvParse {
                    line: line_no,
                    message: "expected at least two fields".to_string(),
                })
            }
        };

        let level: f64 = level.parse().map_err(|_| MonitorError::CsvParse {
            line: line_no,
            message: format!("level {:?} is not a number", level),
        })?;

        let reading = Reading::new(label, level);
        validate_level(&reading)?;
        readings.push(reading);
    }

    Ok(readings)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Reject negative and non-finite levels.
fn validate_level(reading: &Reading) -> Result<()> {
    if !reading.level.is_finite() || reading.level < 0.0 {
        return Err(MonitorError::InvalidLevel {
            label: reading.label.clone(),
            level: reading.level,
        });
    }
    Ok(())
}

/// Turn a `csv` reader error into a line-tagged [`MonitorError::CsvParse`].
fn csv_error(err: &csv::Error) -> MonitorError {
    MonitorError::CsvParse {
        line: err.position().map_or(0, |p| p.line() as usize),
        message: err.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── ReadingFormat ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ReadingFormat::from_path(Path::new("a/levels.JSON")),
            Some(ReadingFormat::Json)
        );
        assert_eq!(
            ReadingFormat::from_path(Path::new("levels.csv")),
            Some(ReadingFormat::Csv)
        );
        assert_eq!(ReadingFormat::from_path(Path::new("levels.txt")), None);
        assert_eq!(ReadingFormat::from_path(Path::new("levels")), None);
    }

    // ── parse_json ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_json_objects() {
        let readings =
            parse_json(r#"[{"label": "9:00 AM", "level": 9400}, {"time": "9:01 AM", "level": 9300.5}]"#)
                .unwrap();
        assert_eq!(
            readings,
            vec![Reading::new("9:00 AM", 9_400.0), Reading::new("9:01 AM", 9_300.5)]
        );
    }

    #[test]
    fn test_parse_json_pairs() {
        let readings = parse_json(r#"[["8:59 AM", 9500], ["9:00 AM", 9400]]"#).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].label, "8:59 AM");
        assert_eq!(readings[1].level, 9_400.0);
    }

    #[test]
    fn test_parse_json_invalid() {
        let err = parse_json("{not json").unwrap_err();
        assert!(matches!(err, MonitorError::JsonParse(_)));
    }

    #[test]
    fn test_parse_json_negative_level_rejected() {
        let err = parse_json(r#"[["9:00 AM", -1]]"#).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidLevel { .. }));
    }

    // ── parse_csv ─────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_csv_with_header() {
        let readings = parse_csv("Time,Level\n9:00 AM,9400\n9:01 AM,9300\n").unwrap();
        assert_eq!(
            readings,
            vec![Reading::new("9:00 AM", 9_400.0), Reading::new("9:01 AM", 9_300.0)]
        );
    }

    #[test]
    fn test_parse_csv_without_header_and_blank_lines() {
        let readings = parse_csv("\n9:00 AM,9400\n\n9:01 AM, 9300 \n").unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].level, 9_300.0);
    }

    #[test]
    fn test_parse_csv_ignores_change_column() {
        let readings = parse_csv("Time,Level,Change\n9:00 AM,9400,No change\n9:01 AM,9300,Sale\n")
            .unwrap();
        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let readings = parse_csv("\"9:00 AM\",\"9400\"\n").unwrap();
        assert_eq!(readings, vec![Reading::new("9:00 AM", 9_400.0)]);
    }

    #[test]
    fn test_parse_csv_bad_level_reports_line() {
        match parse_csv("Time,Level\n9:00 AM,lots\n") {
            Err(MonitorError::CsvParse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("lots"));
            }
            other => panic!("expected CsvParse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_csv_header_after_blank_line() {
        let readings = parse_csv("\nTime,Level\n9:00 AM,5\n").unwrap();
        assert_eq!(readings, vec![Reading::new("9:00 AM", 5.0)]);
    }

    #[test]
    fn test_parse_csv_strips_bom() {
        let readings = parse_csv("\u{feff}Time,Level\n9:00 AM,5\n").unwrap();
        assert_eq!(readings, vec![Reading::new("9:00 AM", 5.0)]);
    }

    #[test]
    fn test_parse_csv_header_only_on_first_record() {
        // A later "time" row is data, so its level must parse.
        assert!(matches!(
            parse_csv("9:00 AM,5\nTime,Level\n"),
            Err(MonitorError::CsvParse { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_csv_quoted_comma_in_label() {
        let readings = parse_csv("\"9:00 AM, east\",12.5\n").unwrap();
        assert_eq!(readings, vec![Reading::new("9:00 AM, east", 12.5)]);
    }

    #[test]
    fn test_parse_csv_missing_field() {
        assert!(matches!(
            parse_csv("9:00 AM\n"),
            Err(MonitorError::CsvParse { line: 1, .. })
        ));
    }

    // ── load_readings ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_single_json_file() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "levels.json", r#"[["9:00 AM", 9400]]"#);
        let readings = load_readings(&path).unwrap();
        assert_eq!(readings, vec![Reading::new("9:00 AM", 9_400.0)]);
    }

    #[test]
    fn test_load_directory_concatenates_in_path_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b_afternoon.csv", "12:00 PM,8500\n");
        write(dir.path(), "a_morning.json", r#"[["9:00 AM", 9400]]"#);
        write(dir.path(), "notes.txt", "ignored");

        let readings = load_readings(dir.path()).unwrap();
        let labels: Vec<&str> = readings.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["9:00 AM", "12:00 PM"]);
    }

    #[test]
    fn test_load_empty_directory_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_readings(dir.path()).unwrap_err();
        assert!(matches!(err, MonitorError::NoReadingFiles(_)));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let err = load_readings(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, MonitorError::FileRead { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "levels.xml", "<levels/>");
        assert!(matches!(
            load_readings(&path),
            Err(MonitorError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_find_reading_files_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "z.csv", "");
        write(dir.path(), "nested/a.json", "[]");
        let files = find_reading_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("nested/a.json"));
        assert!(files[1].ends_with("z.csv"));
    }

    #[test]
    fn test_find_reading_files_missing_dir() {
        assert!(find_reading_files(Path::new("/definitely/not/here")).is_empty());
    }
}
