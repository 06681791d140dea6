//! Feature-by-sample matrix built by outer-joining sample columns.

use super::feature_table::SampleColumn;
use crate::error::{GprError, Result};
use crate::impute::{fill_median, ImputeResult};
use std::collections::BTreeMap;

/// A dense feature × sample matrix of optional signal values.
///
/// Rows are keyed by feature identifier and kept in identifier order;
/// columns follow the order in which sample columns were joined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    /// Sample identifiers (column names).
    sample_ids: Vec<String>,
    /// Feature identifier -> one cell per sample column.
    rows: BTreeMap<String, Vec<Option<f64>>>,
}

impl FeatureMatrix {
    /// An identifier-only matrix with no rows and no sample columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-column matrix holding one sample column.
    pub fn from_column(column: &SampleColumn) -> Self {
        let mut matrix = Self::new();
        matrix.outer_join(column);
        matrix
    }

    /// Outer-join all columns in order, starting from an empty matrix.
    pub fn from_columns<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = &'a SampleColumn>,
    {
        let mut matrix = Self::new();
        for column in columns {
            matrix.outer_join(column);
        }
        matrix
    }

    /// Append a sample column, joining on feature identifier.
    ///
    /// Features present on only one side survive; the side lacking the
    /// feature gets a missing cell.
    pub fn outer_join(&mut self, column: &SampleColumn) {
        let n_before = self.sample_ids.len();

        for (id, cells) in self.rows.iter_mut() {
            cells.push(column.get(id).flatten());
        }
        for (id, value) in column.iter() {
            if !self.rows.contains_key(id) {
                let mut cells = vec![None; n_before];
                cells.push(value);
                self.rows.insert(id.to_string(), cells);
            }
        }

        self.sample_ids.push(column.name().to_string());
    }

    /// Number of features (rows).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.rows.len()
    }

    /// Number of samples (columns).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Feature identifiers in row order.
    pub fn feature_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    /// Iterate over `(feature identifier, cells)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> + '_ {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Cell value for a feature and column index.
    pub fn get(&self, feature_id: &str, col: usize) -> Option<f64> {
        self.rows
            .get(feature_id)
            .and_then(|cells| cells.get(col).copied().flatten())
    }

    /// All cells of one column in row order.
    pub fn column(&self, col: usize) -> Result<Vec<Option<f64>>> {
        self.check_column(col)?;
        Ok(self.rows.values().map(|cells| cells[col]).collect())
    }

    /// Replace every missing cell of one column with `value`.
    ///
    /// Returns the number of cells filled.
    pub fn fill_column(&mut self, col: usize, value: f64) -> Result<usize> {
        self.check_column(col)?;
        let mut filled = 0;
        for cells in self.rows.values_mut() {
            if cells[col].is_none() {
                cells[col] = Some(value);
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// Fill every missing cell with its column's median.
    ///
    /// See [`fill_median`](crate::impute::fill_median).
    pub fn fill_missing_with_median(&mut self) -> Result<ImputeResult> {
        fill_median(self)
    }

    /// Number of missing cells in the whole matrix.
    pub fn n_missing(&self) -> usize {
        self.rows
            .values()
            .map(|cells| cells.iter().filter(|c| c.is_none()).count())
            .sum()
    }

    /// True if no cell is missing.
    pub fn is_complete(&self) -> bool {
        self.n_missing() == 0
    }

    fn check_column(&self, col: usize) -> Result<()> {
        if col >= self.n_samples() {
            return Err(GprError::InvalidParameter(format!(
                "Sample index {} out of bounds",
                col
            )));
        }
        Ok(())
    }
}
