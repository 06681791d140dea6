//! Per-file feature tables before and after replicate aggregation.

use crate::error::{GprError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One data row of a result file: an identifier and its raw signal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Feature identifier (`Row`).
    pub row: String,
    /// Unparsed signal value (`Signal`). May be malformed.
    pub signal: String,
}

impl RawRecord {
    pub fn new(row: impl Into<String>, signal: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            signal: signal.into(),
        }
    }
}

/// An ordered `Row`/`Signal` table read from a single file.
///
/// Identifiers may repeat (technical replicates) until the table is
/// aggregated into a [`SampleColumn`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureTable {
    records: Vec<RawRecord>,
}

impl FeatureTable {
    /// Create a table from records, preserving their order.
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Build a table from `(identifier, signal)` pairs.
    pub fn from_pairs<I, R, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, S)>,
        R: Into<String>,
        S: Into<String>,
    {
        Self {
            records: pairs
                .into_iter()
                .map(|(row, signal)| RawRecord::new(row, signal))
                .collect(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows in source order.
    #[inline]
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawRecord> + '_ {
        self.records.iter()
    }

    /// Identifiers in source order, duplicates included.
    pub fn row_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.row.as_str())
    }

    /// Keep only rows matching the predicate, preserving order.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&RawRecord) -> bool,
    {
        self.records.retain(f);
    }
}

impl FromIterator<RawRecord> for FeatureTable {
    fn from_iter<T: IntoIterator<Item = RawRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A named column of per-feature signal values with unique identifiers.
///
/// Entries are kept sorted by identifier. A value of `None` is a missing
/// measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumn {
    name: String,
    values: BTreeMap<String, Option<f64>>,
}

impl SampleColumn {
    /// Create a column, rejecting duplicate identifiers.
    pub fn new<I>(name: impl Into<String>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Option<f64>)>,
    {
        let name = name.into();
        let mut values = BTreeMap::new();
        for (id, value) in entries {
            if values.insert(id.clone(), value).is_some() {
                return Err(GprError::InvalidParameter(format!(
                    "Duplicate identifier '{}' in sample column '{}'",
                    id, name
                )));
            }
        }
        Ok(Self { name, values })
    }

    /// Create a column from an already de-duplicated map.
    pub fn from_map(name: impl Into<String>, values: BTreeMap<String, Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Sample name (usually the source file stem).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for an identifier. The outer `Option` is presence of the
    /// identifier, the inner one presence of a measurement.
    pub fn get(&self, id: &str) -> Option<Option<f64>> {
        self.values.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// `(identifier, value)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of identifiers without a measurement.
    pub fn n_missing(&self) -> usize {
        self.values.values().filter(|v| v.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_table_preserves_order() {
        let table = FeatureTable::from_pairs([("B", "1"), ("A", "2"), ("B", "3")]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.row_ids().collect::<Vec<_>>(), vec!["B", "A", "B"]);
    }

    #[test]
    fn test_retain() {
        let mut table = FeatureTable::from_pairs([("A", "1"), ("Blank", "2"), ("C", "3")]);
        table.retain(|r| r.row != "Blank");
        assert_eq!(table.row_ids().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[test]
    fn test_sample_column_sorted_and_unique() {
        let col = SampleColumn::new(
            "s1",
            vec![("b".to_string(), Some(2.0)), ("a".to_string(), None)],
        )
        .unwrap();
        assert_eq!(col.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(col.get("a"), Some(None));
        assert_eq!(col.get("b"), Some(Some(2.0)));
        assert_eq!(col.get("z"), None);
        assert_eq!(col.n_missing(), 1);
    }

    #[test]
    fn test_sample_column_rejects_duplicates() {
        let result = SampleColumn::new(
            "s1",
            vec![("a".to_string(), Some(1.0)), ("a".to_string(), Some(2.0))],
        );
        assert!(result.is_err());
    }
}
