//! Per-column median imputation for missing signal values.

use crate::data::FeatureMatrix;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Fill value used for a column that has no observed values at all.
pub const DEGENERATE_FILL: f64 = 0.0;

/// Imputation record for one sample column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnImputation {
    /// Sample identifier.
    pub sample_id: String,
    /// Cells that were missing before imputation.
    pub n_imputed: usize,
    /// Value written into the missing cells.
    pub fill_value: f64,
    /// True when the column had no observed values and fell back to
    /// [`DEGENERATE_FILL`].
    pub degenerate: bool,
}

/// Result of median imputation across a matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImputeResult {
    /// One record per sample column, in column order.
    pub columns: Vec<ColumnImputation>,
}

impl ImputeResult {
    /// Total number of cells filled.
    pub fn total_imputed(&self) -> usize {
        self.columns.iter().map(|c| c.n_imputed).sum()
    }

    /// Columns that had no observed values.
    pub fn degenerate_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.degenerate)
            .map(|c| c.sample_id.as_str())
            .collect()
    }
}

impl std::fmt::Display for ImputeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Imputation")?;
        writeln!(f, "  Cells filled: {}", self.total_imputed())?;
        for col in &self.columns {
            write!(
                f,
                "  {}: {} filled with {}",
                col.sample_id, col.n_imputed, col.fill_value
            )?;
            if col.degenerate {
                write!(f, " (no observed values)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Median of the observed (non-missing) values, or `None` if there are none.
pub fn column_median(values: &[Option<f64>]) -> Option<f64> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(|a, b| a.total_cmp(b));
    let n = observed.len();
    if n % 2 == 0 {
        Some((observed[n / 2 - 1] + observed[n / 2]) / 2.0)
    } else {
        Some(observed[n / 2])
    }
}

/// Replace every missing cell with its column's median.
///
/// Each column is handled independently: the fill value for one column only
/// depends on that column's observed values. A column with no observed
/// values is filled with [`DEGENERATE_FILL`].
pub fn fill_median(matrix: &mut FeatureMatrix) -> Result<ImputeResult> {
    let mut columns = Vec::with_capacity(matrix.n_samples());

    for col in 0..matrix.n_samples() {
        let values = matrix.column(col)?;
        let median = column_median(&values);
        let fill_value = median.unwrap_or(DEGENERATE_FILL);
        let n_imputed = matrix.fill_column(col, fill_value)?;
        if median.is_none() && n_imputed > 0 {
            log::warn!(
                "Sample '{}' has no observed values; filled with {}",
                matrix.sample_ids()[col],
                fill_value
            );
        }

        columns.push(ColumnImputation {
            sample_id: matrix.sample_ids()[col].clone(),
            n_imputed,
            fill_value,
            degenerate: median.is_none(),
        });
    }

    Ok(ImputeResult { columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleColumn;
    use approx::assert_relative_eq;

    fn column(name: &str, entries: &[(&str, Option<f64>)]) -> SampleColumn {
        SampleColumn::new(
            name,
            entries.iter().map(|(id, v)| (id.to_string(), *v)),
        )
        .unwrap()
    }

    #[test]
    fn test_column_median() {
        assert_eq!(column_median(&[]), None);
        assert_eq!(column_median(&[None, None]), None);
        let odd = column_median(&[Some(3.0), None, Some(1.0), Some(2.0)]);
        assert_relative_eq!(odd.unwrap(), 2.0);
        let even = column_median(&[Some(4.0), Some(1.0), Some(2.0), Some(10.0)]);
        assert_relative_eq!(even.unwrap(), 3.0);
    }

    #[test]
    fn test_fill_median() {
        let a = column("a", &[("A", Some(1.0)), ("B", Some(3.0)), ("C", Some(5.0))]);
        let b = column("b", &[("B", Some(10.0)), ("D", Some(20.0))]);
        let mut matrix = FeatureMatrix::from_columns([&a, &b]);

        let result = fill_median(&mut matrix).unwrap();

        assert!(matrix.is_complete());
        assert_relative_eq!(matrix.get("D", 0).unwrap(), 3.0);
        assert_relative_eq!(matrix.get("A", 1).unwrap(), 15.0);
        assert_relative_eq!(matrix.get("C", 1).unwrap(), 15.0);
        assert_eq!(result.columns[0].n_imputed, 1);
        assert_eq!(result.columns[1].n_imputed, 2);
        assert_eq!(result.total_imputed(), 3);
    }

    #[test]
    fn test_all_missing_column_fills_zero() {
        let a = column("a", &[("A", Some(7.0))]);
        let b = column("b", &[("A", None), ("B", None)]);
        let mut matrix = FeatureMatrix::from_columns([&a, &b]);

        let result = fill_median(&mut matrix).unwrap();

        assert_eq!(matrix.get("A", 1), Some(0.0));
        assert_eq!(matrix.get("B", 1), Some(0.0));
        assert!(result.columns[1].degenerate);
        assert_eq!(result.degenerate_columns(), vec!["b"]);
    }

    #[test]
    fn test_imputation_is_column_local() {
        let a = column("a", &[("A", Some(1.0)), ("B", Some(2.0))]);
        let b1 = column("b", &[("A", Some(100.0))]);
        let b2 = column("b", &[("A", Some(-50.0))]);

        let mut m1 = FeatureMatrix::from_columns([&a, &b1]);
        let mut m2 = FeatureMatrix::from_columns([&a, &b2]);
        let r1 = fill_median(&mut m1).unwrap();
        let r2 = fill_median(&mut m2).unwrap();

        assert_eq!(r1.columns[0].fill_value, r2.columns[0].fill_value);
        assert_ne!(r1.columns[1].fill_value, r2.columns[1].fill_value);
    }

    #[test]
    fn test_display() {
        let a = column("a", &[("A", None)]);
        let mut matrix = FeatureMatrix::from_column(&a);
        let result = fill_median(&mut matrix).unwrap();
        let text = result.to_string();
        assert!(text.contains("Cells filled: 1"));
        assert!(text.contains("no observed values"));
    }
}
