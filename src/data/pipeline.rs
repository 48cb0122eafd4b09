use std::collections::HashMap;

use super::model::{GapminderDataset, Observation, RawTable};

// ---------------------------------------------------------------------------
// Forward-fill (per country row, ascending year order)
// ---------------------------------------------------------------------------

/// Replace each missing cell with the nearest preceding value of the same
/// country, scanning year columns in ascending order. Leading gaps stay
/// missing and are dropped at the end of the pipeline.
pub fn forward_fill(table: &RawTable) -> RawTable {
    let rows = table
        .rows
        .iter()
        .map(|(country, cells)| {
            let mut last: Option<&String> = None;
            let filled = cells
                .iter()
                .map(|cell| {
                    if let Some(value) = cell {
                        last = Some(value);
                    }
                    last.cloned()
                })
                .collect();
            (country.clone(), filled)
        })
        .collect();

    RawTable {
        metric: table.metric.clone(),
        years: table.years.clone(),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Parse a plain numeric cell. Anything that is not a finite number becomes
/// missing rather than an error.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a GNI cell, which may carry a "k" (thousand) suffix, e.g. "32k".
/// Malformed values become missing, with or without the suffix.
pub fn parse_gni_value(s: &str) -> Option<f64> {
    if s.contains('k') {
        let stripped: String = s.chars().filter(|&c| c != 'k').collect();
        parse_number(&stripped).map(|v| v * 1000.0)
    } else {
        parse_number(s)
    }
}

// ---------------------------------------------------------------------------
// Reshape wide → long
// ---------------------------------------------------------------------------

/// One (country, year) cell of a tidy table, after numeric coercion.
#[derive(Debug, Clone, PartialEq)]
struct TidyValue {
    country: String,
    year: i32,
    value: Option<f64>,
}

/// Melt a wide table into tidy rows, coercing cells with the given parser.
/// Output is country-major with years ascending, one row per cell, so each
/// (country, year) pair appears at most once.
fn melt_with(table: &RawTable, parse: fn(&str) -> Option<f64>) -> Vec<TidyValue> {
    let mut out = Vec::with_capacity(table.rows.len() * table.years.len());
    for (country, cells) in &table.rows {
        for (&year, cell) in table.years.iter().zip(cells) {
            out.push(TidyValue {
                country: country.clone(),
                year,
                value: cell.as_deref().and_then(parse),
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Inner join on (country, year)
// ---------------------------------------------------------------------------

/// A merged row before the final fill/drop. Values may still be missing;
/// what the join requires is key presence in all three tables.
#[derive(Debug)]
struct MergedRow {
    country: String,
    year: i32,
    population: Option<f64>,
    life_expectancy: Option<f64>,
    gni_per_capita: Option<f64>,
}

fn inner_join(
    population: Vec<TidyValue>,
    life_expectancy: Vec<TidyValue>,
    gni_per_capita: Vec<TidyValue>,
) -> Vec<MergedRow> {
    let lex_by_key: HashMap<(String, i32), Option<f64>> = life_expectancy
        .into_iter()
        .map(|t| ((t.country, t.year), t.value))
        .collect();
    let gni_by_key: HashMap<(String, i32), Option<f64>> = gni_per_capita
        .into_iter()
        .map(|t| ((t.country, t.year), t.value))
        .collect();

    // Row order follows the population table, so the merged output stays
    // country-major with years ascending.
    population
        .into_iter()
        .filter_map(|t| {
            let population = t.value;
            let key = (t.country, t.year);
            let &life_expectancy = lex_by_key.get(&key)?;
            let &gni_per_capita = gni_by_key.get(&key)?;
            Some(MergedRow {
                country: key.0,
                year: key.1,
                population,
                life_expectancy,
                gni_per_capita,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Post-merge fill and drop
// ---------------------------------------------------------------------------

/// Fill residual gaps per country in year order (each metric independently),
/// then drop rows that still miss any metric. Relies on the rows arriving
/// year-ascending within a country, which `melt_with` guarantees.
fn fill_and_drop(rows: Vec<MergedRow>) -> Vec<Observation> {
    let mut last_seen: HashMap<String, [Option<f64>; 3]> = HashMap::new();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let carried = last_seen.entry(row.country.clone()).or_default();
        let mut metrics = [row.population, row.life_expectancy, row.gni_per_capita];
        for (metric, prior) in metrics.iter_mut().zip(carried.iter_mut()) {
            if metric.is_none() {
                *metric = *prior;
            }
            *prior = *metric;
        }

        if let [Some(population), Some(life_expectancy), Some(gni_per_capita)] = metrics {
            out.push(Observation {
                country: row.country,
                year: row.year,
                population,
                life_expectancy,
                gni_per_capita,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

/// Run the whole preparation pipeline: per-table forward-fill, reshape and
/// coercion (with "k" handling for GNI), three-way inner join, post-merge
/// fill, and the final drop of incomplete rows.
pub fn prepare(
    population: &RawTable,
    life_expectancy: &RawTable,
    gni_per_capita: &RawTable,
) -> GapminderDataset {
    let pop = melt_with(&forward_fill(population), parse_number);
    let lex = melt_with(&forward_fill(life_expectancy), parse_number);
    let gni = melt_with(&forward_fill(gni_per_capita), parse_gni_value);

    let merged = inner_join(pop, lex, gni);
    GapminderDataset::from_observations(fill_and_drop(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Build a RawTable from string literals; "" means a missing cell.
    fn raw(metric: &str, years: &[i32], rows: &[(&str, &[&str])]) -> RawTable {
        RawTable {
            metric: metric.to_string(),
            years: years.to_vec(),
            rows: rows
                .iter()
                .map(|(country, cells)| {
                    let cells = cells
                        .iter()
                        .map(|c| {
                            if c.is_empty() {
                                None
                            } else {
                                Some(c.to_string())
                            }
                        })
                        .collect();
                    (country.to_string(), cells)
                })
                .collect(),
        }
    }

    #[test]
    fn unit_suffix_parsing() {
        assert_eq!(parse_gni_value("5k"), Some(5000.0));
        assert_eq!(parse_gni_value("5000"), Some(5000.0));
        assert_eq!(parse_gni_value("3.2k"), Some(3200.0));
        assert_eq!(parse_gni_value("abc"), None);
        assert_eq!(parse_gni_value("abck"), None);
        assert_eq!(parse_number("72.5"), Some(72.5));
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn forward_fill_without_missing_is_identity() {
        let table = raw(
            "population",
            &[1990, 1991],
            &[("A", &["1", "2"]), ("B", &["3", "4"])],
        );
        let filled = forward_fill(&table);
        assert_eq!(filled.rows, table.rows);
        assert!(!filled.has_missing());
    }

    #[test]
    fn forward_fill_carries_last_value_and_keeps_leading_gaps() {
        let table = raw("lex", &[1990, 1991, 1992], &[("A", &["", "60", ""])]);
        let filled = forward_fill(&table);
        assert_eq!(
            filled.rows[0].1,
            vec![None, Some("60".to_string()), Some("60".to_string())]
        );
    }

    #[test]
    fn join_drops_keys_missing_from_any_table() {
        // B has no life expectancy at all, so only (A, 2000) survives.
        let pop = raw("pop", &[2000], &[("A", &["10"]), ("B", &["20"])]);
        let lex = raw("lex", &[2000], &[("A", &["70"])]);
        let gni = raw("gni", &[2000], &[("A", &["5k"]), ("B", &["6k"])]);

        let ds = prepare(&pop, &lex, &gni);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.observations[0].country, "A");
        assert_eq!(ds.observations[0].year, 2000);
        assert_eq!(ds.observations[0].gni_per_capita, 5000.0);
    }

    #[test]
    fn merged_output_is_fully_populated() {
        let pop = raw(
            "pop",
            &[1990, 1991, 1992],
            &[("A", &["1", "", "3"]), ("B", &["", "", "9"])],
        );
        let lex = raw(
            "lex",
            &[1990, 1991, 1992],
            &[("A", &["60", "61", ""]), ("B", &["70", "", "72"])],
        );
        let gni = raw(
            "gni",
            &[1990, 1991, 1992],
            &[("A", &["1k", "bad", "2k"]), ("B", &["3k", "3k", ""])],
        );

        let ds = prepare(&pop, &lex, &gni);
        assert!(!ds.is_empty());
        for obs in &ds.observations {
            assert!(obs.population.is_finite());
            assert!(obs.life_expectancy.is_finite());
            assert!(obs.gni_per_capita.is_finite());
        }
    }

    #[test]
    fn country_year_pairs_are_unique() {
        let years = [1990, 1991, 1992];
        let rows: &[(&str, &[&str])] = &[("A", &["1", "2", "3"]), ("B", &["4", "5", "6"])];
        let ds = prepare(
            &raw("pop", &years, rows),
            &raw("lex", &years, rows),
            &raw("gni", &years, rows),
        );

        let mut seen = HashSet::new();
        for obs in &ds.observations {
            assert!(seen.insert((obs.country.clone(), obs.year)));
        }
        assert_eq!(ds.len(), 6);
    }

    #[test]
    fn malformed_cell_is_filled_from_prior_year_after_merge() {
        // "oops" is present (not missing), so the per-table fill leaves it
        // alone; it only becomes a gap after coercion, and the post-merge
        // fill takes the same country's 1990 value.
        let pop = raw("pop", &[1990, 1991], &[("A", &["1", "2"])]);
        let lex = raw("lex", &[1990, 1991], &[("A", &["60", "61"])]);
        let gni = raw("gni", &[1990, 1991], &[("A", &["10k", "oops"])]);

        let ds = prepare(&pop, &lex, &gni);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.observations[1].year, 1991);
        assert_eq!(ds.observations[1].gni_per_capita, 10_000.0);
    }

    #[test]
    fn fill_never_crosses_countries() {
        // B's leading gap must not be filled from A's rows; the 1990 row for
        // B is dropped instead.
        let pop = raw("pop", &[1990, 1991], &[("A", &["1", "2"]), ("B", &["", "4"])]);
        let lex = raw(
            "lex",
            &[1990, 1991],
            &[("A", &["60", "61"]), ("B", &["70", "71"])],
        );
        let gni = raw(
            "gni",
            &[1990, 1991],
            &[("A", &["1k", "1k"]), ("B", &["2k", "2k"])],
        );

        let ds = prepare(&pop, &lex, &gni);
        let b_years: Vec<i32> = ds
            .observations
            .iter()
            .filter(|obs| obs.country == "B")
            .map(|obs| obs.year)
            .collect();
        assert_eq!(b_years, vec![1991]);
    }

    #[test]
    fn year_absent_from_one_table_is_dropped() {
        // gni only covers 1991, so 1990 rows drop for every country.
        let pop = raw("pop", &[1990, 1991], &[("A", &["1", "2"])]);
        let lex = raw("lex", &[1990, 1991], &[("A", &["60", "61"])]);
        let gni = raw("gni", &[1991], &[("A", &["1k"])]);

        let ds = prepare(&pop, &lex, &gni);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.observations[0].year, 1991);
        assert_eq!((ds.min_year, ds.max_year), (1991, 1991));
    }
}
