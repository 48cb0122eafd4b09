use std::collections::BTreeSet;

use super::model::GapminderDataset;

// ---------------------------------------------------------------------------
// Year + country filter
// ---------------------------------------------------------------------------

/// Return indices of observations for the selected year whose country is in
/// the selection. An empty selection yields an empty view. Metric values are
/// never inspected here, so rows outside the chart's displayed axis range
/// still pass.
pub fn filtered_indices(
    dataset: &GapminderDataset,
    year: i32,
    countries: &BTreeSet<String>,
) -> Vec<usize> {
    dataset
        .observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| obs.year == year && countries.contains(&obs.country))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn dataset() -> GapminderDataset {
        let mut observations = Vec::new();
        for year in [1990, 2000] {
            for country in ["A", "B", "C"] {
                observations.push(Observation {
                    country: country.to_string(),
                    year,
                    population: 1_000_000.0,
                    life_expectancy: 70.0,
                    gni_per_capita: if country == "C" { 200_000.0 } else { 9_000.0 },
                });
            }
        }
        GapminderDataset::from_observations(observations)
    }

    fn selection(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn year_and_country_selection() {
        let ds = dataset();
        let indices = filtered_indices(&ds, 2000, &selection(&["A", "C"]));

        let mut matched: Vec<(&str, i32)> = indices
            .iter()
            .map(|&i| (ds.observations[i].country.as_str(), ds.observations[i].year))
            .collect();
        matched.sort();
        assert_eq!(matched, vec![("A", 2000), ("C", 2000)]);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let ds = dataset();
        assert!(filtered_indices(&ds, 1990, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn rows_beyond_the_axis_cap_still_pass() {
        // C's GNI (200 000) lies past the chart's fixed 110 000 view; the
        // clipping is visual only and the row must stay in the result set.
        let ds = dataset();
        let indices = filtered_indices(&ds, 1990, &selection(&["C"]));
        assert_eq!(indices.len(), 1);
        assert_eq!(ds.observations[indices[0]].gni_per_capita, 200_000.0);
    }
}
