//! Running totals for classified level changes.

use monitor_core::models::{AnalysisResult, ChangeKind, ClassifiedEntry};

// ── SeriesTotals ──────────────────────────────────────────────────────────────

/// Volume and count totals accumulated while walking a classified series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SeriesTotals {
    /// Sum of level decreases.
    pub total_sold: f64,
    /// Sum of level increases.
    pub total_refill: f64,
    pub refill_count: u32,
    pub sale_count: u32,
}

impl SeriesTotals {
    /// Add one classified step from `previous` to `level`.
    pub fn record(&mut self, change: ChangeKind, previous: f64, level: f64) {
        match change {
            ChangeKind::Sale => {
                self.total_sold += previous - level;
                self.sale_count += 1;
            }
            ChangeKind::Refill => {
                self.total_refill += level - previous;
                self.refill_count += 1;
            }
            ChangeKind::NoChange => {}
        }
    }

    /// Net movement over the series: refilled minus sold.
    pub fn net_change(&self) -> f64 {
        self.total_refill - self.total_sold
    }

    /// Attach the totals to their entries.
    pub fn into_result(self, entries: Vec<ClassifiedEntry>) -> AnalysisResult {
        AnalysisResult {
            entries,
            total_sold: self.total_sold,
            total_refill: self.total_refill,
            refill_count: self.refill_count,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
