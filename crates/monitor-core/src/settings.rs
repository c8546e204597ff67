use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{MonitorError, Result};
use crate::models::{Baseline, FilterMode, WindowQuery};
use crate::time_utils::parse_window_bound;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Tank level report: sales, refills and totals for a time window
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tank-monitor",
    about = "Tank level report: sales, refills and totals for a time window",
    version
)]
pub struct Settings {
    /// Readings file (.json / .csv) or directory; the demo series is used when omitted
    #[arg(long)]
    pub readings: Option<PathBuf>,

    /// Window start, e.g. "9:02 AM" or "09:02"
    #[arg(long)]
    pub start: Option<String>,

    /// Window end, e.g. "9:15 AM" or "09:15"
    #[arg(long)]
    pub end: Option<String>,

    /// Rows and totals to show
    #[arg(long, default_value = "all", value_parser = ["all", "sale", "refill"])]
    pub filter: String,

    /// What the first reading of a window is compared with
    #[arg(long, default_value = "window", value_parser = ["window", "preceding"])]
    pub baseline: String,

    /// Write an export instead of opening the interactive table
    #[arg(long, value_parser = ["csv", "report"])]
    pub export: Option<String>,

    /// Export destination (defaults to report.csv / report.txt)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Title printed at the top of the text report
    #[arg(long, default_value = "Monitoring Report")]
    pub title: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.tank-monitor/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    /// Uses `~/.tank-monitor/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".tank-monitor").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        // Raw ArgMatches let us query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("could not clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. The window and readings path are never restored
        // from a previous run.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "filter") {
            if let Some(v) = last.filter.filter(|v| FilterMode::from_name(v).is_some()) {
                settings.filter = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "baseline") {
            if let Some(v) = last.baseline.filter(|v| Baseline::from_name(v).is_some()) {
                settings.baseline = v;
            }
        }
        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("could not persist last-used params: {}", e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The configured row filter (`all` when unrecognised).
    pub fn filter_mode(&self) -> FilterMode {
        FilterMode::from_name(&self.filter).unwrap_or_default()
    }

    /// The configured classification baseline (`window` when unrecognised).
    pub fn baseline_mode(&self) -> Baseline {
        Baseline::from_name(&self.baseline).unwrap_or_default()
    }

    /// Build the [`WindowQuery`] from `--start` / `--end`.
    ///
    /// # Errors
    ///
    /// * [`MonitorError::InvalidWindow`] when only one bound is given.
    /// * [`MonitorError::MalformedTimeLabel`] when a bound does not parse.
    pub fn window(&self) -> Result<WindowQuery> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (None, None) => Ok(WindowQuery::unbounded()),
            (Some(start), Some(end)) => Ok(WindowQuery::between(
                parse_window_bound(start)?,
                parse_window_bound(end)?,
            )),
            (start, end) => Err(MonitorError::InvalidWindow {
                start: start.map(str::to_string),
                end: end.map(str::to_string),
            }),
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            filter: Some(s.filter.clone()),
            baseline: Some(s.baseline.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
