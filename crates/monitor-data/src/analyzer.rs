//! Series analyser for the tank monitor.
//!
//! Normalizes reading labels, narrows the series to an inclusive time window
//! and classifies each level against its predecessor.

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{Baseline, ChangeKind, ClassifiedEntry, NormalizedTime, Reading, WindowQuery};
use monitor_core::time_utils;
use tracing::debug;

use crate::aggregator::SeriesTotals;

// ── TimedReading ──────────────────────────────────────────────────────────────

/// A reading paired with its normalized time.
#[derive(Debug, Clone, Copy)]
pub struct TimedReading<'a> {
    pub reading: &'a Reading,
    pub time: NormalizedTime,
}

/// The part of a series that falls inside a window.
#[derive(Debug, Clone)]
pub struct WindowSelection<'a> {
    /// In-window readings, in input order.
    pub readings: Vec<TimedReading<'a>>,
    /// Level of the last reading before the first in-window reading, if any.
    pub preceding_level: Option<f64>,
}

// ── SeriesAnalyzer ────────────────────────────────────────────────────────────

/// Classifies consecutive level changes over a windowed reading series.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesAnalyzer {
    baseline: Baseline,
}

impl SeriesAnalyzer {
    pub fn new(baseline: Baseline) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    // ── Public methods ────────────────────────────────────────────────────────

    /// Normalize every label, preserving input order.
    ///
    /// Fails on the first malformed label; nothing is returned for the rest.
    pub fn normalize_series<'a>(&self, readings: &'a [Reading]) -> Result<Vec<TimedReading<'a>>> {
        readings
            .iter()
            .map(|reading| {
                Ok(TimedReading {
                    reading,
                    time: time_utils::normalize(&reading.label)?,
                })
            })
            .collect()
    }

    /// Keep the readings whose time lies in `[start, end]`.
    ///
    /// An unbounded window passes everything through. A window with exactly
    /// one bound is rejected. `start > end` selects nothing.
    pub fn select_window<'a>(
        &self,
        series: &[TimedReading<'a>],
        window: &WindowQuery,
    ) -> Result<WindowSelection<'a>> {
        let (start, end) = match (window.start, window.end) {
            (None, None) => {
                return Ok(WindowSelection {
                    readings: series.to_vec(),
                    preceding_level: None,
                })
            }
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                return Err(MonitorError::InvalidWindow {
                    start: start.map(|t| t.to_string()),
                    end: end.map(|t| t.to_string()),
                })
            }
        };

        let mut preceding_level = None;
        let mut readings = Vec::new();
        for timed in series {
            if timed.time >= start && timed.time <= end {
                readings.push(*timed);
            } else if readings.is_empty() && timed.time < start {
                preceding_level = Some(timed.reading.level);
            }
        }

        if readings.is_empty() {
            preceding_level = None;
        }

        debug!(
            "SeriesAnalyzer: window [{}, {}] kept {} of {} readings",
            start,
            end,
            readings.len(),
            series.len()
        );

        Ok(WindowSelection {
            readings,
            preceding_level,
        })
    }

    /// Classify each selected reading against the one before it and
    /// accumulate the totals.
    ///
    /// The first reading is compared with `selection.preceding_level` only
    /// under [`Baseline::PrecedingReading`]; otherwise it is "No change".
    pub fn classify(&self, selection: &WindowSelection<'_>) -> (Vec<ClassifiedEntry>, SeriesTotals) {
        let mut totals = SeriesTotals::default();
        let mut entries = Vec::with_capacity(selection.readings.len());

        let mut previous = match self.baseline {
            Baseline::WindowStart => None,
            Baseline::PrecedingReading => selection.preceding_level,
        };

        for timed in &selection.readings {
            let level = timed.reading.level;
            let change = match previous {
                None => ChangeKind::NoChange,
                Some(prev) => {
                    let change = ChangeKind::between(prev, level);
                    totals.record(change, prev, level);
                    change
                }
            };

            entries.push(ClassifiedEntry {
                label: timed.reading.label.clone(),
                level,
                change,
            });
            previous = Some(level);
        }

        (entries, totals)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
