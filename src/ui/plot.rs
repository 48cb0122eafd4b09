use eframe::egui::Ui;
use egui_plot::{Legend, MarkerShape, Plot, PlotBounds, Points};

use crate::data::model::GapminderDataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bubble chart (central panel)
// ---------------------------------------------------------------------------

/// Maximum bubble radius in screen points. The largest population in the
/// current view gets exactly this radius; bubble area tracks population.
const SIZE_MAX: f32 = 12.0;

/// Fixed x-axis view imposed on every reset, independent of the data
/// extent. Rows beyond the cap stay in the data; the user can pan to them.
const X_VIEW: (f64, f64) = (0.0, 110_000.0);

/// Render the bubble chart in the central panel.
pub fn bubble_chart(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to start  (File → Open data folder…)");
        });
        return;
    };

    ui.heading(format!("Gapminder data for {}", state.year));
    ui.label("Unlocking Lifetimes: Visualizing Progress in Longevity and Poverty Eradication");
    ui.add_space(4.0);

    let max_population = state
        .visible
        .iter()
        .map(|&i| dataset.observations[i].population)
        .fold(0.0_f64, f64::max);

    let reset = std::mem::take(&mut state.reset_view);

    Plot::new("bubble_chart")
        .legend(Legend::default())
        .x_axis_label("GNI per capita")
        .y_axis_label("Life expectancy")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if reset {
                plot_ui.set_plot_bounds(view_bounds(&dataset, &state.visible));
            }

            for &idx in &state.visible {
                let obs = &dataset.observations[idx];

                // Area ∝ population; a zero or near-zero population shrinks
                // to an invisible dot instead of failing.
                let radius = if max_population > 0.0 {
                    SIZE_MAX * ((obs.population.max(0.0) / max_population).sqrt() as f32)
                } else {
                    0.0
                };

                let point = Points::new(vec![[obs.gni_per_capita, obs.life_expectancy]])
                    .name(&obs.country)
                    .color(state.colors.color_for(&obs.country))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(radius);

                plot_ui.points(point);
            }
        });
}

/// Bounds applied after a dataset or filter change: x pinned to the fixed
/// view, y fitted to the visible rows with a margin.
fn view_bounds(dataset: &GapminderDataset, visible: &[usize]) -> PlotBounds {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &i in visible {
        let y = dataset.observations[i].life_expectancy;
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        // Empty view: a plausible life-expectancy window.
        y_min = 0.0;
        y_max = 90.0;
    }
    let margin = ((y_max - y_min) * 0.08).max(2.0);

    PlotBounds::from_min_max([X_VIEW.0, y_min - margin], [X_VIEW.1, y_max + margin])
}
