//! Summary of a labelled matrix for reporting.

use super::labeled::{GroupLabel, LabeledMatrix};
use crate::impute::ImputeResult;
use serde::{Deserialize, Serialize};

/// Per-sample line of a [`MatrixSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Sample identifier (file stem).
    pub sample_id: String,
    /// Group the sample belongs to.
    pub group: GroupLabel,
    /// Cells that carried a measurement before imputation.
    pub n_observed: usize,
    /// Cells filled by imputation.
    pub n_imputed: usize,
    /// Value used for the filled cells.
    pub fill_value: f64,
}

/// Dimensions and imputation statistics of a preprocessed matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixSummary {
    pub n_features: usize,
    pub n_experimental: usize,
    pub n_control: usize,
    pub n_imputed: usize,
    pub samples: Vec<SampleSummary>,
}

impl MatrixSummary {
    pub fn new(matrix: &LabeledMatrix, imputation: &ImputeResult) -> Self {
        let n_features = matrix.n_features();
        let samples = matrix
            .labels()
            .into_iter()
            .zip(&imputation.columns)
            .map(|(group, col)| SampleSummary {
                sample_id: col.sample_id.clone(),
                group,
                n_observed: n_features - col.n_imputed,
                n_imputed: col.n_imputed,
                fill_value: col.fill_value,
            })
            .collect();

        Self {
            n_features,
            n_experimental: matrix.n_experimental(),
            n_control: matrix.n_control(),
            n_imputed: imputation.total_imputed(),
            samples,
        }
    }
}

impl std::fmt::Display for MatrixSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Matrix Summary")?;
        writeln!(f, "  Total proteins/features:        {}", self.n_features)?;
        writeln!(f, "  Experimental samples (label=1): {}", self.n_experimental)?;
        writeln!(f, "  Control samples (label=2):      {}", self.n_control)?;
        writeln!(f, "  Imputed cells:                  {}", self.n_imputed)?;
        for s in &self.samples {
            writeln!(
                f,
                "    [{}] {}: {} observed, {} imputed (fill {})",
                s.group.code(),
                s.sample_id,
                s.n_observed,
                s.n_imputed,
                s.fill_value
            )?;
        }
        Ok(())
    }
}
