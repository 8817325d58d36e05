#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use gantt_deps::{app, config::Settings, logging};

fn main() -> eframe::Result<()> {
    let (settings, load_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    logging::init_logging(settings.log_level.as_deref());
    if let Some(e) = load_error {
        tracing::warn!(config = ?Settings::config_path(), "ignoring unreadable settings: {e}");
    }
    tracing::info!(config = ?Settings::config_path(), "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Dependencies"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Dependencies",
        options,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, &settings)))),
    )
}
