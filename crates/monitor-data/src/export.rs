//! CSV and plain-text report exports of an [`AnalysisResult`].

use std::io;
use std::path::Path;

use monitor_core::error::Result;
use monitor_core::formatting::format_level;
use monitor_core::models::{AnalysisResult, FilterMode};
use tracing::{info, warn};

/// Header row shared by the CSV export and the report table.
pub const COLUMNS: [&str; 3] = ["Time", "Level", "Change"];

/// Default title of the text report.
pub const DEFAULT_REPORT_TITLE: &str = "Monitoring Report";

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Serialize the entries visible under `filter` as CSV.
///
/// Rows are `\n`-separated with no trailing newline. Fields holding a
/// comma, quote or newline are quoted.
pub fn to_csv(result: &AnalysisResult, filter: FilterMode) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS).map_err(io::Error::from)?;
    for entry in result.visible_entries(filter) {
        writer
            .write_record([
                entry.label.as_str(),
                format_level(entry.level).as_str(),
                entry.change.as_str(),
            ])
            .map_err(io::Error::from)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text =
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

// ── Text report ───────────────────────────────────────────────────────────────

/// Summary lines printed under the report table for `filter`.
///
/// A zero volume prints as `N/A`.
pub fn summary_lines(result: &AnalysisResult, filter: FilterMode) -> Vec<String> {
    let volume = |v: f64| {
        if v == 0.0 {
            "N/A".to_string()
        } else {
            format!("{} liters", format_level(v))
        }
    };
    let sold = format!("Total LPG Sold: {}", volume(result.total_sold));
    let refilled = format!("Total LPG Refilled: {}", volume(result.total_refill));
    let count = format!("Number of Refills: {}", result.refill_count);

    match filter {
        FilterMode::Sales => vec![sold],
        FilterMode::Refills => vec![refilled, count],
        FilterMode::All => vec![sold, refilled, count],
    }
}

/// Render a printable report: title, a fixed-width table of the visible
/// entries, then the summary block for `filter`.
pub fn to_report(result: &AnalysisResult, filter: FilterMode, title: &str) -> String {
    let rows: Vec<[String; 3]> = result
        .visible_entries(filter)
        .map(|entry| {
            [
                entry.label.clone(),
                format_level(entry.level),
                entry.change.to_string(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[String; 3]| {
        format!(
            "{:<w0$}  {:>w1$}  {:<w2$}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )
        .trim_end()
        .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 8);
    out.push(title.to_string());
    out.push(String::new());
    out.push(format_row(&COLUMNS.map(String::from)));
    out.push(format_row(&widths.map(|w| "-".repeat(w))));
    for row in &rows {
        out.push(format_row(row));
    }
    if rows.is_empty() {
        out.push("(no readings in range)".to_string());
    }
    out.push(String::new());
    out.extend(summary_lines(result, filter));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Atomically write `contents` to `path` (temp file, then rename).
///
/// The temp file is removed again when the rename fails, e.g. because
/// `path` is a directory.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        if let Err(cleanup) = std::fs::remove_file(&tmp) {
            warn!("Could not remove {}: {}", tmp.display(), cleanup);
        }
        return Err(e.into());
    }

    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
