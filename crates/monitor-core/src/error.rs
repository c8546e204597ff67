use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the tank monitor.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A reading's time label is not of the form `H:MM AM|PM`.
    #[error("Malformed time label: {0:?}")]
    MalformedTimeLabel(String),

    /// Exactly one of the window bounds was supplied.
    #[error("Invalid window: start={start:?}, end={end:?} (both bounds or neither are required)")]
    InvalidWindow {
        start: Option<String>,
        end: Option<String>,
    },

    /// A loaded tank level is negative or not a finite number.
    #[error("Invalid level {level} for reading at {label}")]
    InvalidLevel { label: String, level: f64 },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A CSV line could not be turned into a reading.
    #[error("Failed to parse CSV line {line}: {message}")]
    CsvParse { line: usize, message: String },

    /// The input file extension is not one of the recognised formats.
    #[error("Unsupported readings format: {0}")]
    UnsupportedFormat(PathBuf),

    /// No reading files were found under the given directory.
    #[error("No reading files found in {0}")]
    NoReadingFiles(PathBuf),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_label() {
        let err = MonitorError::MalformedTimeLabel("25:99 XM".to_string());
        assert_eq!(err.to_string(), "Malformed time label: \"25:99 XM\"");
    }

    #[test]
    fn test_error_display_invalid_window() {
        let err = MonitorError::InvalidWindow {
            start: Some("9:00 AM".to_string()),
            end: None,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid window"));
        assert!(msg.contains("9:00 AM"));
        assert!(msg.contains("end=None"));
    }

    #[test]
    fn test_error_display_invalid_level() {
        let err = MonitorError::InvalidLevel {
            label: "9:00 AM".to_string(),
            level: -5.0,
        };
        assert_eq!(err.to_string(), "Invalid level -5 for reading at 9:00 AM");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MonitorError::FileRead {
            path: PathBuf::from("/some/readings.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/readings.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_csv_parse() {
        let err = MonitorError::CsvParse {
            line: 3,
            message: "missing level".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse CSV line 3: missing level");
    }

    #[test]
    fn test_error_display_no_reading_files() {
        let err = MonitorError::NoReadingFiles(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No reading files found in /empty/dir");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: MonitorError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: MonitorError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
