mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::GapviewApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Data directory: first CLI argument, else the working directory.
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gapview – Gapminder Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(GapviewApp::new(data_dir)))),
    )
}
