//! Main analysis pipeline for the tank monitor.
//!
//! Turns a reading series and a window into an [`AnalysisResult`]: the
//! classified in-window entries plus sold / refilled totals.

use monitor_core::error::Result;
use monitor_core::models::{AnalysisResult, Baseline, Reading, WindowQuery};
use tracing::debug;

use crate::analyzer::SeriesAnalyzer;

// ── Public functions ──────────────────────────────────────────────────────────

/// Analyse `readings` over `window`.
///
/// 1. Normalize every label, keeping input order.
/// 2. Keep readings inside the inclusive window (all of them when unbounded).
/// 3. Classify each kept reading against the previous kept reading; the
///    first one is always "No change".
/// 4. Sum sold and refilled volumes over the same kept readings.
///
/// # Errors
///
/// * `MalformedTimeLabel` if any label (even outside the window) is invalid.
/// * `InvalidWindow` if exactly one bound is set.
pub fn analyze(readings: &[Reading], window: &WindowQuery) -> Result<AnalysisResult> {
    analyze_with_baseline(readings, window, Baseline::WindowStart)
}

/// Like [`analyze`], with a choice of what the first in-window reading is
/// compared with.
///
/// Under [`Baseline::PrecedingReading`] the first in-window reading is
/// classified against the last reading before the window (when one
/// exists). That earlier reading is not itself part of the result.
pub fn analyze_with_baseline(
    readings: &[Reading],
    window: &WindowQuery,
    baseline: Baseline,
) -> Result<AnalysisResult> {
    let analyzer = SeriesAnalyzer::new(baseline);

    let series = analyzer.normalize_series(readings)?;
    let selection = analyzer.select_window(&series, window)?;
    let (entries, totals) = analyzer.classify(&selection);

    debug!(
        entries = entries.len(),
        total_sold = totals.total_sold,
        total_refill = totals.total_refill,
        refill_count = totals.refill_count,
        sale_count = totals.sale_count,
        net_change = totals.net_change(),
        baseline = baseline.name(),
        "series analysed"
    );

    Ok(totals.into_result(entries))
}

/// The unfiltered classified view of the whole series.
///
/// Used both for the initial display and after a reset.
pub fn full_series(readings: &[Reading]) -> Result<AnalysisResult> {
    analyze(readings, &WindowQuery::unbounded())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
