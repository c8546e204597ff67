mod bootstrap;

use anyhow::Result;
use monitor_core::settings::Settings;
use monitor_data::analysis::analyze_with_baseline;
use monitor_data::export;
use monitor_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Tank Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Filter: {}, Baseline: {}, Theme: {}",
        settings.filter,
        settings.baseline,
        settings.theme
    );

    let readings = bootstrap::load_series(settings.readings.as_deref())?;
    let window = settings.window()?;
    let filter = settings.filter_mode();
    let baseline = settings.baseline_mode();

    if let Some(format) = settings.export.as_deref() {
        let result = analyze_with_baseline(&readings, &window, baseline)?;
        let contents = match format {
            "csv" => export::to_csv(&result, filter)?,
            _ => export::to_report(&result, filter, &settings.title),
        };
        let path = bootstrap::export_path(format, settings.output.as_ref());
        export::write_export(&path, &contents)?;
        println!("Saved {}", path.display());
        return Ok(());
    }

    let mut app = App::new(&settings.theme, readings, window, filter, baseline)?
        .with_report_title(settings.title.clone());
    if let Some(dir) = settings.output.as_ref().filter(|p| p.is_dir()) {
        app = app.with_export_dir(dir);
    }

    // Ctrl+C arrives as a key event while the terminal is in raw mode.
    app.run().await?;

    Ok(())
}
