use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Calendar day every [`NormalizedTime`] is anchored to.
///
/// Only the time of day carries meaning; the date just has to be identical
/// across all values so that comparisons are valid.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// A single timestamped tank-level observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Time of day in `H:MM AM|PM` form, e.g. `"9:03 AM"`.
    pub label: String,
    /// Tank level in liters.
    pub level: f64,
}

impl Reading {
    pub fn new(label: impl Into<String>, level: f64) -> Self {
        Self {
            label: label.into(),
            level,
        }
    }
}

/// A comparable point in time derived from a reading label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NormalizedTime(NaiveDateTime);

impl NormalizedTime {
    /// Build a value from a 24-hour clock hour and a minute.
    ///
    /// Returns `None` when either component is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self(reference_date().and_time(time)))
    }

    /// Hour on the 24-hour clock (0–23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// The anchored date-time backing this value.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for NormalizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::time_utils::format_label(*self))
    }
}

/// Direction of the level change between two consecutive readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The level dropped: product was sold.
    Sale,
    /// The level rose: the tank was refilled.
    Refill,
    /// Equal levels, or the first entry of a sequence.
    #[serde(rename = "No change")]
    NoChange,
}

impl ChangeKind {
    /// Classify `level` against the level of the preceding reading.
    pub fn between(previous: f64, level: f64) -> Self {
        if level < previous {
            ChangeKind::Sale
        } else if level > previous {
            ChangeKind::Refill
        } else {
            ChangeKind::NoChange
        }
    }

    /// Label used in tables and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Sale => "Sale",
            ChangeKind::Refill => "Refill",
            ChangeKind::NoChange => "No change",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reading together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub label: String,
    pub level: f64,
    pub change: ChangeKind,
}

/// Inclusive time range used to filter readings before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowQuery {
    pub start: Option<NormalizedTime>,
    pub end: Option<NormalizedTime>,
}

impl WindowQuery {
    /// No filtering: the full series is analysed.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Inclusive range `[start, end]`.
    pub fn between(start: NormalizedTime, end: NormalizedTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Which predecessor the first entry of a windowed sequence is compared with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    /// The first entry of the active sequence has no predecessor and is
    /// always "No change".
    #[default]
    #[serde(rename = "window")]
    WindowStart,
    /// The first in-window entry is compared against the last reading before
    /// the window, when there is one.
    #[serde(rename = "preceding")]
    PrecedingReading,
}

impl Baseline {
    /// Parse a CLI / config name (`"window"` or `"preceding"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "window" => Some(Baseline::WindowStart),
            "preceding" => Some(Baseline::PrecedingReading),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Baseline::WindowStart => "window",
            Baseline::PrecedingReading => "preceding",
        }
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            Baseline::WindowStart => Baseline::PrecedingReading,
            Baseline::PrecedingReading => Baseline::WindowStart,
        }
    }
}

/// Which classified rows (and which totals) a report shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    #[serde(rename = "sale")]
    Sales,
    #[serde(rename = "refill")]
    Refills,
}

impl FilterMode {
    /// Parse a CLI / config name (`"all"`, `"sale"` or `"refill"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "all" => Some(FilterMode::All),
            "sale" | "sales" => Some(FilterMode::Sales),
            "refill" | "refills" => Some(FilterMode::Refills),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Sales => "sale",
            FilterMode::Refills => "refill",
        }
    }

    /// Whether an entry with the given change is shown in this mode.
    pub fn accepts(&self, change: ChangeKind) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Sales => change == ChangeKind::Sale,
            FilterMode::Refills => change == ChangeKind::Refill,
        }
    }
}

/// Classified view of a (possibly windowed) series plus its totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Classified entries in chronological order.
    pub entries: Vec<ClassifiedEntry>,
    /// Sum of all level decreases.
    pub total_sold: f64,
    /// Sum of all level increases.
    pub total_refill: f64,
    /// Number of entries classified as a refill.
    pub refill_count: u32,
}

impl AnalysisResult {
    /// Entries shown under `filter`, in order.
    pub fn visible_entries(
        &self,
        filter: FilterMode,
    ) -> impl Iterator<Item = &ClassifiedEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| filter.accepts(entry.change))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
