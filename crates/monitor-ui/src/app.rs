//! Application state and TUI event loop for the tank monitor.
//!
//! [`App`] owns the readings, the active window, filter and baseline, and
//! the last [`AnalysisResult`]. Every state change that affects the
//! analysis goes through [`App::recompute`], which replaces the result.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, error, info};

use monitor_core::models::{AnalysisResult, Baseline, FilterMode, Reading, WindowQuery};
use monitor_data::analysis::{analyze_with_baseline, full_series};
use monitor_data::export::{self, DEFAULT_REPORT_TITLE};

use crate::components::header::{window_text, Header};
use crate::table_view;
use crate::themes::Theme;

const KEY_HELP: &str = "[s] sales  [r] refills  [a] all  [b] baseline  [x] reset  [w] window  \
                        [c] csv  [p] report  [q] quit";

// ── ExportKind ────────────────────────────────────────────────────────────────

/// File formats the `c` / `p` keys write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Csv,
    Report,
}

impl ExportKind {
    /// Default file name inside the export directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportKind::Csv => "report.csv",
            ExportKind::Report => "report.txt",
        }
    }
}

// ── StatusMessage ─────────────────────────────────────────────────────────────

/// One-line feedback shown under the summary.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    /// A file was written.
    Saved(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Saved(text) | StatusMessage::Error(text) => {
                text
            }
        }
    }

    pub fn style(&self, theme: &Theme) -> Style {
        match self {
            StatusMessage::Info(_) => theme.info,
            StatusMessage::Saved(_) => theme.success,
            StatusMessage::Error(_) => theme.error,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state.
pub struct App {
    pub theme: Theme,
    /// Input series; never modified after construction.
    pub readings: Vec<Reading>,
    pub window: WindowQuery,
    /// Window the app started with; `w` brings it back after a reset.
    pub initial_window: WindowQuery,
    pub filter: FilterMode,
    pub baseline: Baseline,
    /// Title written at the top of text reports.
    pub report_title: String,
    /// Directory that receives `report.csv` / `report.txt`.
    pub export_dir: PathBuf,
    /// Result of the most recent successful analysis.
    pub result: AnalysisResult,
    pub status: Option<StatusMessage>,
    /// Set to `true` to leave the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Build the app and run the first analysis.
    pub fn new(
        theme_name: &str,
        readings: Vec<Reading>,
        window: WindowQuery,
        filter: FilterMode,
        baseline: Baseline,
    ) -> monitor_core::Result<Self> {
        let result = analyze_with_baseline(&readings, &window, baseline)?;
        Ok(Self {
            theme: Theme::from_name(theme_name),
            readings,
            window,
            initial_window: window,
            filter,
            baseline,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            export_dir: PathBuf::from("."),
            result,
            status: None,
            should_quit: false,
        })
    }

    pub fn with_report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = title.into();
        self
    }

    pub fn with_export_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.export_dir = dir.as_ref().to_path_buf();
        self
    }

    // ── State transitions ─────────────────────────────────────────────────────

    /// Re-run the analysis for the current window and baseline.
    ///
    /// On failure the previous result is kept and the error is shown in the
    /// status line.
    pub fn recompute(&mut self) {
        match analyze_with_baseline(&self.readings, &self.window, self.baseline) {
            Ok(result) => self.result = result,
            Err(e) => {
                error!("Analysis failed: {}", e);
                self.status = Some(StatusMessage::Error(e.to_string()));
            }
        }
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        debug!("Filter mode -> {}", filter.name());
        self.filter = filter;
        self.recompute();
    }

    pub fn toggle_baseline(&mut self) {
        self.baseline = self.baseline.toggled();
        debug!("Baseline mode -> {}", self.baseline.name());
        self.recompute();
    }

    /// Clear the window and show the whole series under the All filter.
    pub fn reset(&mut self) {
        self.window = WindowQuery::unbounded();
        self.filter = FilterMode::All;
        match full_series(&self.readings) {
            Ok(result) => {
                self.result = result;
                self.status = Some(StatusMessage::Info("Showing full series".to_string()));
            }
            Err(e) => self.status = Some(StatusMessage::Error(e.to_string())),
        }
    }

    /// Return to the window the app was started with.
    pub fn restore_window(&mut self) {
        self.window = self.initial_window;
        self.status = Some(StatusMessage::Info(format!(
            "Window {}",
            window_text(&self.window)
        )));
        self.recompute();
    }

    /// Write the visible entries to `export_dir/<kind file name>`.
    ///
    /// Returns the written path; failures are also reported in the status line.
    pub fn export(&mut self, kind: ExportKind) -> monitor_core::Result<PathBuf> {
        let path = self.export_dir.join(kind.file_name());
        let written = match kind {
            ExportKind::Csv => export::to_csv(&self.result, self.filter),
            ExportKind::Report => Ok(export::to_report(
                &self.result,
                self.filter,
                &self.report_title,
            )),
        }
        .and_then(|contents| export::write_export(&path, &contents));

        match written {
            Ok(()) => {
                info!("Exported {:?} to {}", kind, path.display());
                self.status = Some(StatusMessage::Saved(format!("Saved {}", path.display())));
                Ok(path)
            }
            Err(e) => {
                error!("Export to {} failed: {}", path.display(), e);
                self.status = Some(StatusMessage::Error(format!("Export failed: {e}")));
                Err(e)
            }
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('s') => self.set_filter(FilterMode::Sales),
            KeyCode::Char('r') => self.set_filter(FilterMode::Refills),
            KeyCode::Char('a') => self.set_filter(FilterMode::All),
            KeyCode::Char('b') => self.toggle_baseline(),
            KeyCode::Char('x') => self.reset(),
            KeyCode::Char('w') => self.restore_window(),
            KeyCode::Char('c') => {
                let _ = self.export(ExportKind::Csv);
            }
            KeyCode::Char('p') => {
                let _ = self.export(ExportKind::Report);
            }
            _ => {}
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive view until `q`, `Esc` or Ctrl+C.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore the terminal even when the loop failed.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Draw the current state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let summary_height = match self.filter {
            FilterMode::Sales => 1,
            FilterMode::Refills => 2,
            FilterMode::All => 3,
        } + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(4),
                Constraint::Length(summary_height),
                Constraint::Length(2),
            ])
            .split(frame.area());

        let header = Header::new(&self.window, self.filter, self.baseline, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        if self.result.visible_entries(self.filter).next().is_none() {
            table_view::render_no_data(frame, chunks[1], &self.theme);
        } else {
            table_view::render_readings_table(
                frame,
                chunks[1],
                "Readings",
                &self.result,
                self.filter,
                &self.theme,
            );
        }
        table_view::render_summary(frame, chunks[2], &self.result, self.filter, &self.theme);

        let status = match &self.status {
            Some(message) => Span::styled(message.text().to_string(), message.style(&self.theme)),
            None => Span::raw(""),
        };
        let footer = vec![
            Line::from(Span::styled(KEY_HELP, self.theme.dim)),
            Line::from(status),
        ];
        frame.render_widget(Paragraph::new(Text::from(footer)), chunks[3]);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::models::ChangeKind;
    use monitor_core::time_utils::normalize;
    use monitor_data::sample::sample_series;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn morning_window() -> WindowQuery {
        WindowQuery::between(
            normalize("9:02 AM").unwrap(),
            normalize("9:15 AM").unwrap(),
        )
    }

    fn make_app(window: WindowQuery) -> App {
        App::new(
            "dark",
            sample_series(),
            window,
            FilterMode::All,
            Baseline::WindowStart,
        )
        .unwrap()
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_runs_first_analysis() {
        let app = make_app(WindowQuery::unbounded());
        assert_eq!(app.result.entries.len(), 14);
        assert_eq!(app.result.total_sold, 1_400.0);
        assert_eq!(app.result.refill_count, 1);
        assert!(!app.should_quit);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_app_creation_rejects_half_open_window() {
        let window = WindowQuery {
            start: Some(normalize("9:00 AM").unwrap()),
            end: None,
        };
        let err = App::new(
            "dark",
            sample_series(),
            window,
            FilterMode::All,
            Baseline::WindowStart,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_app_creation_unknown_theme_does_not_panic() {
        let app = App::new(
            "neon",
            Vec::new(),
            WindowQuery::unbounded(),
            FilterMode::Sales,
            Baseline::WindowStart,
        )
        .unwrap();
        assert!(app.result.is_empty());
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_filter_keys() {
        let mut app = make_app(morning_window());

        app.handle_key(key('s'));
        assert_eq!(app.filter, FilterMode::Sales);
        app.handle_key(key('r'));
        assert_eq!(app.filter, FilterMode::Refills);
        app.handle_key(key('a'));
        assert_eq!(app.filter, FilterMode::All);
        assert_eq!(app.result.entries.len(), 4);
    }

    #[test]
    fn test_baseline_toggle_reclassifies_first_entry() {
        let window = WindowQuery::between(
            normalize("9:03 AM").unwrap(),
            normalize("9:15 AM").unwrap(),
        );
        let mut app = make_app(window);
        assert_eq!(app.result.entries[0].change, ChangeKind::NoChange);

        app.handle_key(key('b'));
        assert_eq!(app.baseline, Baseline::PrecedingReading);
        assert_eq!(app.result.entries[0].change, ChangeKind::Sale);
        assert_eq!(app.result.total_sold, 100.0);

        app.handle_key(key('b'));
        assert_eq!(app.baseline, Baseline::WindowStart);
        assert_eq!(app.result.entries[0].change, ChangeKind::NoChange);
    }

    #[test]
    fn test_reset_restores_full_series() {
        let mut app = make_app(morning_window());
        app.handle_key(key('r'));
        assert_eq!(app.result.entries.len(), 4);

        app.handle_key(key('x'));
        assert!(app.window.is_unbounded());
        assert_eq!(app.filter, FilterMode::All);
        assert_eq!(app.result, full_series(&sample_series()).unwrap());
        assert_eq!(
            app.status,
            Some(StatusMessage::Info("Showing full series".to_string()))
        );
    }

    #[test]
    fn test_window_key_restores_start_window_after_reset() {
        let mut app = make_app(morning_window());
        app.handle_key(key('x'));
        assert!(app.window.is_unbounded());
        assert_eq!(app.result.entries.len(), 14);

        app.handle_key(key('w'));

        assert_eq!(app.window, morning_window());
        assert_eq!(app.result.entries.len(), 4);
        assert_eq!(app.result.total_refill, 400.0);
        assert_eq!(
            app.status,
            Some(StatusMessage::Info("Window 9:02 AM - 9:15 AM".to_string()))
        );
    }

    #[test]
    fn test_window_key_without_start_window_keeps_full_series() {
        let mut app = make_app(WindowQuery::unbounded());
        app.handle_key(key('w'));
        assert!(app.window.is_unbounded());
        assert_eq!(app.result, full_series(&sample_series()).unwrap());
    }

    // ── Status line ───────────────────────────────────────────────────────────

    #[test]
    fn test_status_styles_follow_theme() {
        let theme = Theme::dark();
        assert_eq!(StatusMessage::Info("x".into()).style(&theme), theme.info);
        assert_eq!(StatusMessage::Saved("x".into()).style(&theme), theme.success);
        assert_eq!(StatusMessage::Error("x".into()).style(&theme), theme.error);
        assert_eq!(StatusMessage::Saved("Saved a.csv".into()).text(), "Saved a.csv");
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            key('q'),
            key('Q'),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = make_app(WindowQuery::unbounded());
            app.handle_key(event);
            assert!(app.should_quit, "{event:?} should quit");
        }
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut app = make_app(morning_window());
        let before = app.result.clone();
        app.handle_key(key('z'));
        assert_eq!(app.result, before);
        assert!(!app.should_quit);
    }

    // ── Export ────────────────────────────────────────────────────────────────

    #[test]
    fn test_csv_export_key_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(morning_window()).with_export_dir(dir.path());

        app.handle_key(key('c'));

        let written = std::fs::read_to_string(dir.path().join("report.csv")).unwrap();
        assert!(written.starts_with("Time,Level,Change\n9:02 AM,9300,No change"));
        assert!(matches!(app.status, Some(StatusMessage::Saved(_))));
    }

    #[test]
    fn test_report_export_uses_filter_and_title() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(morning_window())
            .with_export_dir(dir.path())
            .with_report_title("Station 7");
        app.set_filter(FilterMode::Sales);

        let path = app.export(ExportKind::Report).unwrap();

        assert_eq!(path, dir.path().join("report.txt"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("Station 7\n"));
        assert!(written.contains("Total LPG Sold: 100 liters"));
        assert!(!written.contains("Refilled"));
    }

    #[test]
    fn test_export_failure_sets_error_status() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let mut app = make_app(morning_window()).with_export_dir(&blocker);

        assert!(app.export(ExportKind::Csv).is_err());
        assert!(matches!(app.status, Some(StatusMessage::Error(_))));
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_full_view() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let app = make_app(morning_window());

        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("TANK LEVEL MONITOR"));
        assert!(text.contains("9:02 AM - 9:15 AM"));
        assert!(text.contains("Total Sold: 100 liters"));
        assert!(text.contains("[q] quit"));
    }

    #[test]
    fn test_render_empty_filter_shows_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = make_app(WindowQuery::between(
            normalize("9:00 AM").unwrap(),
            normalize("9:01 AM").unwrap(),
        ));
        app.set_filter(FilterMode::Refills);

        terminal.draw(|frame| app.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No readings in the selected range"));
    }
}
