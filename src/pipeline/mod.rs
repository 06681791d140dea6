//! Pipeline composition: from result folders to a labelled matrix.

mod config;
mod runner;

pub use config::{
    AnalysisConfig, InputConfig, OutputConfig, PreprocessConfig, RunConfig,
    DEFAULT_D_VALUE_CUTOFF, DEFAULT_LOG2FC_CUTOFF, MATRIX_FILE_NAME,
};
pub use runner::{
    build_matrix, discover_files, process_file, process_files, run_preprocessing,
    sample_name, PreprocessOutput, Preprocessor,
};
