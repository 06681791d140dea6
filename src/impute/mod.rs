//! Missing-value imputation for merged matrices.

pub mod median;

pub use median::{column_median, fill_median, ColumnImputation, ImputeResult, DEGENERATE_FILL};
