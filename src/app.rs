use std::path::PathBuf;

use eframe::egui;

use crate::data::loader::DataSources;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GapviewApp {
    pub state: AppState,
}

impl GapviewApp {
    /// Build the app, auto-loading from `data_dir` when the three expected
    /// files are present there.
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        let mut state = AppState::default();
        if let Some(dir) = data_dir {
            let sources = DataSources::from_dir(&dir);
            if sources.all_exist() {
                state.load_sources(sources);
            } else {
                log::info!(
                    "no data files in {}, waiting for File → Open data folder…",
                    dir.display()
                );
            }
        }
        Self { state }
    }
}

impl eframe::App for GapviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year + country controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: bubble chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::bubble_chart(ui, &mut self.state);
        });
    }
}
