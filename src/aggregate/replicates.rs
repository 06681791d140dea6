//! Averaging of technical replicates within one array.

use crate::data::{FeatureTable, SampleColumn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coerce a raw signal value to a number.
///
/// Anything that does not parse as a number (`N/A`, empty cells, `NaN`) is a
/// missing value, not an error.
pub fn parse_signal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Statistics about replicate averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicateStats {
    /// Rows in the input table.
    pub n_rows: usize,
    /// Distinct features in the output.
    pub n_features: usize,
    /// Rows whose signal could not be parsed.
    pub n_malformed: usize,
    /// Features with no parseable value among their replicates.
    pub n_all_missing: usize,
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Collapse duplicate identifiers to the mean of their numeric values.
///
/// Each distinct identifier appears once in the result, in sorted order.
/// Identifiers whose values are all missing stay missing. Rows with an empty
/// identifier are dropped.
pub fn average_replicates(table: &FeatureTable, name: &str) -> SampleColumn {
    average_replicates_with_stats(table, name).0
}

/// Average replicates with statistics about what was coerced.
pub fn average_replicates_with_stats(
    table: &FeatureTable,
    name: &str,
) -> (SampleColumn, ReplicateStats) {
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut n_malformed = 0;

    for record in table.iter() {
        if record.row.is_empty() {
            continue;
        }
        let acc = groups.entry(record.row.clone()).or_default();
        match parse_signal(&record.signal) {
            Some(value) => {
                acc.sum += value;
                acc.count += 1;
            }
            None => n_malformed += 1,
        }
    }

    let values: BTreeMap<String, Option<f64>> = groups
        .into_iter()
        .map(|(id, acc)| {
            let mean = (acc.count > 0).then(|| acc.sum / acc.count as f64);
            (id, mean)
        })
        .collect();

    let column = SampleColumn::from_map(name, values);
    let stats = ReplicateStats {
        n_rows: table.len(),
        n_features: column.len(),
        n_malformed,
        n_all_missing: column.n_missing(),
    };
    log::info!("  Averaged to {} unique proteins/features", stats.n_features);
    if stats.n_malformed > 0 {
        log::debug!("  {} non-numeric signal values treated as missing", stats.n_malformed);
    }

    (column, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    #[test]
    fn test_parse_signal() {
        assert_eq!(parse_signal("12.5"), Some(12.5));
        assert_eq!(parse_signal(" -3 "), Some(-3.0));
        assert_eq!(parse_signal("1e3"), Some(1000.0));
        assert_eq!(parse_signal("N/A"), None);
        assert_eq!(parse_signal(""), None);
        assert_eq!(parse_signal("NaN"), None);
    }

    #[test]
    fn test_average_replicates() {
        let table = FeatureTable::from_pairs([
            ("P2", "10"),
            ("P1", "1"),
            ("P2", "20"),
            ("P1", "N/A"),
            ("P1", "3"),
        ]);
        let (col, stats) = average_replicates_with_stats(&table, "array1");

        assert_eq!(col.name(), "array1");
        assert_eq!(col.ids().collect::<Vec<_>>(), vec!["P1", "P2"]);
        assert_relative_eq!(col.get("P1").unwrap().unwrap(), 2.0);
        assert_relative_eq!(col.get("P2").unwrap().unwrap(), 15.0);
        assert_eq!(stats.n_rows, 5);
        assert_eq!(stats.n_malformed, 1);
        assert_eq!(stats.n_all_missing, 0);
    }

    #[test]
    fn test_all_missing_stays_missing() {
        let table = FeatureTable::from_pairs([("P1", "N/A"), ("P1", "bad"), ("P2", "4")]);
        let col = average_replicates(&table, "s");

        assert_eq!(col.get("P1"), Some(None));
        assert_eq!(col.get("P2"), Some(Some(4.0)));
    }

    #[test]
    fn test_identifier_set_preserved() {
        let table = FeatureTable::from_pairs([
            ("A", "1"),
            ("B", "x"),
            ("A", "2"),
            ("C", "3"),
            ("B", "4"),
            ("C", ""),
        ]);
        let col = average_replicates(&table, "s");

        let input: BTreeSet<&str> = table.row_ids().collect();
        let output: Vec<&str> = col.ids().collect();
        let output_set: BTreeSet<&str> = output.iter().copied().collect();
        assert_eq!(output.len(), output_set.len());
        assert_eq!(input, output_set);
    }

    #[test]
    fn test_empty_identifier_dropped() {
        let table = FeatureTable::from_pairs([("", "1"), ("A", "2")]);
        let col = average_replicates(&table, "s");
        assert_eq!(col.ids().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_empty_table() {
        let col = average_replicates(&FeatureTable::default(), "s");
        assert!(col.is_empty());
    }
}
