use monitor_core::models::{Baseline, FilterMode, WindowQuery};
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Marker drawn either side of the title.
pub const ACCENT: &str = "≈≈≈";

const SEPARATOR_WIDTH: usize = 60;

/// Describe a window for display: `"9:02 AM - 9:15 AM"` or `"full series"`.
pub fn window_text(window: &WindowQuery) -> String {
    match (window.start, window.end) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        _ => "full series".to_string(),
    }
}

/// Four-line dashboard header:
///
/// 1. `≈≈≈ TANK LEVEL MONITOR ≈≈≈`
/// 2. a 60-column `=` rule
/// 3. `[ window | filter | baseline ]`
/// 4. blank
pub struct Header<'a> {
    pub window: &'a WindowQuery,
    pub filter: FilterMode,
    pub baseline: Baseline,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        window: &'a WindowQuery,
        filter: FilterMode,
        baseline: Baseline,
        theme: &'a Theme,
    ) -> Self {
        Self {
            window,
            filter,
            baseline,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let theme = self.theme;
        vec![
            Line::from(vec![
                Span::styled(ACCENT, theme.header_accent),
                Span::styled(" TANK LEVEL MONITOR ", theme.header),
                Span::styled(ACCENT, theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(SEPARATOR_WIDTH), theme.separator)),
            Line::from(vec![
                Span::styled("[ ", theme.label),
                Span::styled(window_text(self.window), theme.value),
                Span::styled(" | ", theme.label),
                Span::styled(self.filter.name(), theme.value),
                Span::styled(" | ", theme.label),
                Span::styled(self.baseline.name(), theme.value),
                Span::styled(" ]", theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
