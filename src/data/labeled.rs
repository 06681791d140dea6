//! The two-group labelled matrix handed to the downstream test.

use super::matrix::FeatureMatrix;
use crate::error::{GprError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Group membership of a sample column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupLabel {
    /// Experimental group, rendered as `1`.
    Experimental,
    /// Control group, rendered as `2`.
    Control,
}

impl GroupLabel {
    /// Numeric label written in the header row.
    pub fn code(&self) -> u8 {
        match self {
            Self::Experimental => 1,
            Self::Control => 2,
        }
    }
}

/// A fully imputed matrix whose first `n_experimental` columns belong to the
/// experimental group and the remaining `n_control` columns to the control
/// group.
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    matrix: FeatureMatrix,
    n_experimental: usize,
    n_control: usize,
}

impl LabeledMatrix {
    /// Wrap an imputed matrix with its positional group split.
    pub fn new(matrix: FeatureMatrix, n_experimental: usize, n_control: usize) -> Result<Self> {
        if n_experimental + n_control != matrix.n_samples() {
            return Err(GprError::DimensionMismatch {
                expected: matrix.n_samples(),
                actual: n_experimental + n_control,
            });
        }
        if !matrix.is_complete() {
            return Err(GprError::InvalidParameter(format!(
                "Labelled matrix still has {} missing cells",
                matrix.n_missing()
            )));
        }
        Ok(Self {
            matrix,
            n_experimental,
            n_control,
        })
    }

    #[inline]
    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    #[inline]
    pub fn n_experimental(&self) -> usize {
        self.n_experimental
    }

    #[inline]
    pub fn n_control(&self) -> usize {
        self.n_control
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.matrix.n_features()
    }

    /// Group label of every sample column, in column order.
    pub fn labels(&self) -> Vec<GroupLabel> {
        std::iter::repeat(GroupLabel::Experimental)
            .take(self.n_experimental)
            .chain(std::iter::repeat(GroupLabel::Control).take(self.n_control))
            .collect()
    }

    /// Header row: two blank cells, then one group code per sample column.
    pub fn header_row(&self) -> Vec<String> {
        let mut header = vec![String::new(), String::new()];
        header.extend(self.labels().iter().map(|l| l.code().to_string()));
        header
    }

    /// Data rows: identifier, identifier again as display name, then values.
    pub fn data_rows(&self) -> Vec<Vec<String>> {
        self.matrix
            .rows()
            .map(|(id, cells)| {
                let mut row = Vec::with_capacity(cells.len() + 2);
                row.push(id.to_string());
                row.push(id.to_string());
                // Imputation leaves no empty cells; guard anyway for the writer.
                row.extend(cells.iter().map(|c| c.unwrap_or(0.0).to_string()));
                row
            })
            .collect()
    }

    /// Write the matrix to a delimited file.
    ///
    /// `.csv` files are comma-separated; any other extension is tab-separated.
    /// Parent directories are created as needed.
    pub fn to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let delimiter = if is_csv { b',' } else { b'\t' };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(false)
            .from_path(path)?;

        writer.write_record(self.header_row())?;
        for row in self.data_rows() {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
