use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::{
    DataSources, GNI_PER_CAPITA_FILE, LIFE_EXPECTANCY_FILE, POPULATION_FILE,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year slider and country multiselect
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No data loaded.");
        return;
    };

    // ---- Year slider ----
    ui.strong("Year");
    let mut year = state.year;
    if ui
        .add(egui::Slider::new(&mut year, dataset.min_year..=dataset.max_year))
        .changed()
    {
        state.set_year(year);
    }
    ui.separator();

    // ---- Country multiselect ----
    let n_selected = state.selected_countries.len();
    let n_total = dataset.countries.len();
    let header_text = format!("Countries  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for country in &dataset.countries {
                        let mut checked = state.selected_countries.contains(country);
                        let text =
                            RichText::new(country).color(state.colors.color_for(country));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_country(country);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} observations, {} visible",
                ds.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Open data folder")
        .pick_folder();

    if let Some(dir) = dir {
        let sources = DataSources::from_dir(&dir);
        if !sources.all_exist() {
            let msg = format!(
                "Expected {POPULATION_FILE}, {LIFE_EXPECTANCY_FILE} and {GNI_PER_CAPITA_FILE} in {}",
                dir.display()
            );
            log::error!("{msg}");
            state.status_message = Some(msg);
            return;
        }
        state.load_sources(sources);
    }
}
