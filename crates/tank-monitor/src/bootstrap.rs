use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use monitor_core::models::Reading;
use monitor_data::{reader, sample};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Create `~/.tank-monitor/` and `~/.tank-monitor/logs/` when absent.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

fn ensure_directories_in(home: &Path) -> anyhow::Result<PathBuf> {
    let monitor_dir = home.join(".tank-monitor");
    std::fs::create_dir_all(monitor_dir.join("logs"))
        .with_context(|| format!("creating {}", monitor_dir.display()))?;
    Ok(monitor_dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an `EnvFilter` directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Install the global `tracing` subscriber.
///
/// Logs go to `log_file` (appended, no ANSI colours) when given, otherwise
/// to stderr. Unrecognised levels fall back to `info`.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_thread_ids(false),
                )
                .init();
        }
    }

    Ok(())
}

// ── Input / output paths ───────────────────────────────────────────────────────

/// Readings from `path`, or the demo series when no path is configured.
pub fn load_series(path: Option<&Path>) -> anyhow::Result<Vec<Reading>> {
    match path {
        Some(path) => {
            let readings = reader::load_readings(path)
                .with_context(|| format!("loading readings from {}", path.display()))?;
            tracing::info!("Loaded {} readings from {}", readings.len(), path.display());
            Ok(readings)
        }
        None => {
            tracing::info!("No readings file given; using the demo series");
            Ok(sample::sample_series())
        }
    }
}

/// Export destination for `format`.
///
/// `--output` is used as-is when it names a file; an existing directory gets
/// `report.csv` / `report.txt` joined onto it. Without `--output` the default
/// file name lands in the current directory.
pub fn export_path(format: &str, output: Option<&PathBuf>) -> PathBuf {
    let file_name = match format {
        "csv" => "report.csv",
        _ => "report.txt",
    };
    match output {
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(file) => file.clone(),
        None => PathBuf::from(file_name),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
