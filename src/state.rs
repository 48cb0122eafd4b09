use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::CountryColors;
use crate::data::filter::filtered_indices;
use crate::data::loader::{DataSources, LoadCache};
use crate::data::model::GapminderDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Merged dataset (None until data is loaded). Immutable once built.
    pub dataset: Option<Arc<GapminderDataset>>,

    /// Paths the current dataset was loaded from.
    pub sources: Option<DataSources>,

    /// Content-hash memoization of the merged dataset.
    pub cache: LoadCache,

    /// Selected year, within [min_year, max_year] of the dataset.
    pub year: i32,

    /// Selected countries; subset of the dataset's country list.
    pub selected_countries: BTreeSet<String>,

    /// Indices of observations passing the current filters (cached).
    pub visible: Vec<usize>,

    /// One colour per country, shared by chart and side panel.
    pub colors: CountryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set after any dataset or filter change; the plot consumes it to
    /// re-impose its view bounds.
    pub reset_view: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            sources: None,
            cache: LoadCache::default(),
            year: 0,
            selected_countries: BTreeSet::new(),
            visible: Vec::new(),
            colors: CountryColors::default(),
            status_message: None,
            reset_view: false,
        }
    }
}

impl AppState {
    /// Load (or fetch from cache) the dataset behind `sources`. On failure
    /// the previous dataset stays in place and the error lands in the
    /// status line.
    pub fn load_sources(&mut self, sources: DataSources) {
        match self.cache.get_or_load(&sources) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} observations, {} countries, years {}–{}",
                    dataset.len(),
                    dataset.countries.len(),
                    dataset.min_year,
                    dataset.max_year
                );
                self.sources = Some(sources);
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-run the load for the current sources. Unchanged files hit the
    /// cache; edited files produce a fresh dataset.
    pub fn reload(&mut self) {
        if let Some(sources) = self.sources.clone() {
            self.load_sources(sources);
        }
    }

    /// Ingest a dataset and reset filters to their defaults: the earliest
    /// year, all countries selected.
    pub fn set_dataset(&mut self, dataset: Arc<GapminderDataset>) {
        self.year = dataset.min_year;
        self.selected_countries = dataset.countries.iter().cloned().collect();
        self.colors = CountryColors::new(&dataset.countries);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    pub fn set_year(&mut self, year: i32) {
        if self.year != year {
            self.year = year;
            self.refilter();
        }
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected_countries.remove(country) {
            self.selected_countries.insert(country.to_string());
        }
        self.refilter();
    }

    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected_countries = ds.countries.iter().cloned().collect();
        }
        self.refilter();
    }

    pub fn select_none(&mut self) {
        self.selected_countries.clear();
        self.refilter();
    }

    /// Recompute `visible` after any dataset or filter change.
    pub fn refilter(&mut self) {
        match &self.dataset {
            Some(ds) => {
                self.visible = filtered_indices(ds, self.year, &self.selected_countries);
            }
            None => self.visible.clear(),
        }
        self.reset_view = true;
    }
}
