//! Data structures for per-file tables and merged matrices.

mod feature_table;
mod labeled;
mod matrix;
mod summary;

pub use feature_table::{FeatureTable, RawRecord, SampleColumn};
pub use labeled::{GroupLabel, LabeledMatrix};
pub use matrix::FeatureMatrix;
pub use summary::{MatrixSummary, SampleSummary};
