//! Composable GenePix Result Preprocessing Library
//!
//! This library turns per-array GenePix result (`.gpr`) files from an
//! experimental and a control group into a single feature-by-sample matrix,
//! labelled by group, for a downstream two-class statistical test.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **read**: Result file parsing (encoding fallback, column discovery)
//! - **filter**: Control-spot removal
//! - **aggregate**: Replicate averaging within an array
//! - **data**: Core data structures (FeatureTable, SampleColumn, FeatureMatrix)
//! - **impute**: Missing-value imputation (per-column median)
//! - **pipeline**: Group processing, matrix building and configuration
//!
//! # Example
//!
//! ```no_run
//! use gpr_prep::prelude::*;
//!
//! let result = Preprocessor::new()
//!     .signal_column("F650 Median - B650")
//!     .run_dirs("data/experimental_group", "data/control_group")
//!     .unwrap();
//!
//! result.write("preprocessed/sam_input.csv").unwrap();
//! println!("{}", result.summary());
//! ```

pub mod aggregate;
pub mod data;
pub mod error;
pub mod filter;
pub mod impute;
pub mod pipeline;
pub mod read;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::aggregate::{average_replicates, average_replicates_with_stats, parse_signal};
    pub use crate::data::{
        FeatureMatrix, FeatureTable, GroupLabel, LabeledMatrix, MatrixSummary, RawRecord,
        SampleColumn,
    };
    pub use crate::error::{GprError, Result};
    pub use crate::filter::{
        remove_control_spots, remove_control_spots_with_stats, ControlDenylist, FilterResult,
    };
    pub use crate::impute::{fill_median, ImputeResult};
    pub use crate::pipeline::{
        build_matrix, discover_files, process_file, process_files, run_preprocessing,
        PreprocessConfig, PreprocessOutput, Preprocessor, RunConfig,
    };
    pub use crate::read::{read_gpr_file, ReaderOptions, TextEncoding};
}
