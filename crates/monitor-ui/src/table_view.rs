//! Readings table and summary block for the tank monitor TUI.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per visible
//! classified entry (Time / Level / Change) and, below it, the totals that
//! apply to the active [`FilterMode`].

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use monitor_core::formatting::{format_level, format_liters};
use monitor_core::models::{AnalysisResult, FilterMode};

use crate::themes::Theme;

const COLUMN_HEADERS: [&str; 3] = ["Time", "Level", "Change"];

/// Column widths fitted to the widest cell of each column.
fn column_widths(result: &AnalysisResult, filter: FilterMode) -> [Constraint; 3] {
    let mut widths = COLUMN_HEADERS.map(|h| h.width());
    for entry in result.visible_entries(filter) {
        widths[0] = widths[0].max(entry.label.width());
        widths[1] = widths[1].max(format_level(entry.level).width());
        widths[2] = widths[2].max(entry.change.as_str().width());
    }
    widths.map(|w| Constraint::Length(w as u16 + 2))
}

/// Render the entries of `result` that pass `filter` into `area`.
pub fn render_readings_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    result: &AnalysisResult,
    filter: FilterMode,
    theme: &Theme,
) {
    let header = Row::new(
        COLUMN_HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = result
        .visible_entries(filter)
        .enumerate()
        .map(|(i, entry)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(entry.label.clone()),
                Cell::from(Text::from(format_level(entry.level)).right_aligned()),
                Cell::from(entry.change.as_str()).style(theme.change_style(entry.change)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, column_widths(result, filter))
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {title} ")),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Summary lines for `filter`: Sales shows the sold volume, Refills the
/// refilled volume and refill count, All shows all three.
pub fn summary_lines(result: &AnalysisResult, filter: FilterMode, theme: &Theme) -> Vec<Line<'static>> {
    let line = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, theme.label),
            Span::styled(value, theme.summary),
        ])
    };
    let sold = line("Total Sold: ", format_liters(result.total_sold));
    let refilled = line("Total Refilled: ", format_liters(result.total_refill));
    let count = line("Number of Refills: ", result.refill_count.to_string());

    match filter {
        FilterMode::Sales => vec![sold],
        FilterMode::Refills => vec![refilled, count],
        FilterMode::All => vec![sold, refilled, count],
    }
}

/// Render the summary block into `area`.
pub fn render_summary(
    frame: &mut Frame,
    area: Rect,
    result: &AnalysisResult,
    filter: FilterMode,
    theme: &Theme,
) {
    frame.render_widget(
        Paragraph::new(Text::from(summary_lines(result, filter, theme))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Summary "),
        ),
        area,
    );
}

/// Placeholder shown when the active window selects no readings.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No readings in the selected range", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'x' to reset to the full series", theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tank Monitor "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
