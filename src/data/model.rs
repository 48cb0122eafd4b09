// ---------------------------------------------------------------------------
// RawTable – one wide source table (country rows × year columns)
// ---------------------------------------------------------------------------

/// A raw wide table as read from disk: one row per country, one column per
/// year. Cells are kept as strings until the pipeline coerces them, since
/// GNI values may carry a "k" unit suffix.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Metric name, e.g. "population".
    pub metric: String,
    /// Year columns, sorted ascending. Fill and reshape always walk this
    /// order, never the file's column order.
    pub years: Vec<i32>,
    /// (country, cells) with cells aligned to `years`. `None` = empty cell.
    pub rows: Vec<(String, Vec<Option<String>>)>,
}

impl RawTable {
    /// Whether any cell in the table is missing.
    pub fn has_missing(&self) -> bool {
        self.rows
            .iter()
            .any(|(_, cells)| cells.iter().any(|c| c.is_none()))
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the merged tidy table
// ---------------------------------------------------------------------------

/// A fully populated (country, year) observation. The pipeline only emits
/// rows where all three metrics survived fill and drop.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub population: f64,
    pub life_expectancy: f64,
    pub gni_per_capita: f64,
}

// ---------------------------------------------------------------------------
// GapminderDataset – the complete merged dataset
// ---------------------------------------------------------------------------

/// The merged dataset with pre-computed indices for the UI. Immutable after
/// construction; the app shares it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GapminderDataset {
    /// All observations, (country, year) unique.
    pub observations: Vec<Observation>,
    /// Sorted distinct country names.
    pub countries: Vec<String>,
    /// Smallest year present. 0 when the dataset is empty.
    pub min_year: i32,
    /// Largest year present. 0 when the dataset is empty.
    pub max_year: i32,
}

impl GapminderDataset {
    /// Build country and year indices from the merged observations.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut countries: Vec<String> = observations
            .iter()
            .map(|obs| obs.country.clone())
            .collect();
        countries.sort();
        countries.dedup();

        let min_year = observations.iter().map(|obs| obs.year).min().unwrap_or(0);
        let max_year = observations.iter().map(|obs| obs.year).max().unwrap_or(0);

        GapminderDataset {
            observations,
            countries,
            min_year,
            max_year,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, year: i32) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            population: 1.0,
            life_expectancy: 70.0,
            gni_per_capita: 10_000.0,
        }
    }

    #[test]
    fn indices_are_computed_from_observations() {
        let ds = GapminderDataset::from_observations(vec![
            obs("Norway", 2000),
            obs("Chad", 1990),
            obs("Norway", 1990),
        ]);
        assert_eq!(ds.countries, vec!["Chad", "Norway"]);
        assert_eq!(ds.min_year, 1990);
        assert_eq!(ds.max_year, 2000);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_dataset_has_zero_year_bounds() {
        let ds = GapminderDataset::from_observations(Vec::new());
        assert!(ds.is_empty());
        assert_eq!((ds.min_year, ds.max_year), (0, 0));
        assert!(ds.countries.is_empty());
    }
}
