//! Preprocessing runner: files in, labelled matrix out.

use super::config::PreprocessConfig;
use crate::aggregate::average_replicates;
use crate::data::{FeatureMatrix, LabeledMatrix, MatrixSummary, SampleColumn};
use crate::error::{GprError, Result};
use crate::filter::{remove_control_spots, ControlDenylist};
use crate::impute::{fill_median, ImputeResult};
use crate::read::{read_gpr_file, ReaderOptions};
use std::path::{Path, PathBuf};

/// List the files in `dir` with the given extension, sorted by path.
///
/// The extension is compared ASCII case-insensitively and without a leading
/// dot.
pub fn discover_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Sample name for a file: its base name without extension.
pub fn sample_name<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read, filter and average one result file.
pub fn process_file<P: AsRef<Path>>(
    path: P,
    reader: &ReaderOptions,
    controls: &ControlDenylist,
) -> Result<SampleColumn> {
    let path = path.as_ref();
    let table = read_gpr_file(path, reader)?;
    let table = remove_control_spots(&table, controls);
    Ok(average_replicates(&table, &sample_name(path)))
}

/// Process every file of one group, in order.
///
/// Stops at the first failing file; the error names that file.
pub fn process_files<P: AsRef<Path>>(
    paths: &[P],
    reader: &ReaderOptions,
    controls: &ControlDenylist,
) -> Result<Vec<SampleColumn>> {
    paths
        .iter()
        .map(|p| {
            let path: &Path = p.as_ref();
            process_file(path, reader, controls).map_err(|e| e.in_file(path))
        })
        .collect()
}

/// Merge experimental and control columns into an imputed, labelled matrix.
///
/// Columns are joined experimental first, then control, each in input order.
/// An empty experimental group is allowed; an empty control group is not.
pub fn build_matrix(
    experimental: &[SampleColumn],
    control: &[SampleColumn],
) -> Result<(LabeledMatrix, ImputeResult)> {
    if control.is_empty() {
        return Err(GprError::EmptyControlGroup(
            "at least one control sample is required".to_string(),
        ));
    }

    let mut matrix = FeatureMatrix::from_columns(experimental.iter().chain(control));
    let imputation = fill_median(&mut matrix)?;
    let labeled = LabeledMatrix::new(matrix, experimental.len(), control.len())?;

    log::info!("Total proteins/features: {}", labeled.n_features());
    log::info!("Experimental samples (label=1): {}", labeled.n_experimental());
    log::info!("Control samples (label=2): {}", labeled.n_control());

    Ok((labeled, imputation))
}

/// Output of a preprocessing run.
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    /// The imputed, labelled matrix.
    pub matrix: LabeledMatrix,
    /// Per-column imputation record.
    pub imputation: ImputeResult,
    /// Experimental files, in column order.
    pub experimental_files: Vec<PathBuf>,
    /// Control files, in column order.
    pub control_files: Vec<PathBuf>,
}

impl PreprocessOutput {
    /// Summary of dimensions and imputation.
    pub fn summary(&self) -> MatrixSummary {
        MatrixSummary::new(&self.matrix, &self.imputation)
    }

    /// Write the labelled matrix to `path`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        log::info!("Saving to {}...", path.as_ref().display());
        self.matrix.to_path(path)
    }
}

/// Builder for configuring and running preprocessing.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    name: String,
    reader: ReaderOptions,
    controls: ControlDenylist,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    /// Create a preprocessor with default reader options and denylist.
    pub fn new() -> Self {
        Self::from_config(&PreprocessConfig::default())
    }

    /// Create from a config.
    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            name: config.name.clone(),
            reader: config.reader.clone(),
            controls: config.controls.clone(),
        }
    }

    /// Set the preprocessor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Replace the reader options.
    pub fn reader(mut self, reader: ReaderOptions) -> Self {
        self.reader = reader;
        self
    }

    /// Prefer a specific signal column over the other accepted ones.
    pub fn signal_column(mut self, name: &str) -> Self {
        self.reader = self.reader.prefer_signal_column(name);
        self
    }

    /// Replace the control-spot denylist.
    pub fn controls(mut self, controls: ControlDenylist) -> Self {
        self.controls = controls;
        self
    }

    /// Current reader options.
    pub fn reader_options(&self) -> &ReaderOptions {
        &self.reader
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PreprocessConfig {
        PreprocessConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            reader: self.reader.clone(),
            controls: self.controls.clone(),
        }
    }

    /// Process explicit file lists for both groups.
    pub fn run_files<P: AsRef<Path>>(
        &self,
        experimental: &[P],
        control: &[P],
    ) -> Result<PreprocessOutput> {
        if control.is_empty() {
            return Err(GprError::EmptyControlGroup("no control files given".to_string()));
        }

        if !experimental.is_empty() {
            log::info!("Processing {} experimental file(s)", experimental.len());
        }
        let experimental_columns = process_files(experimental, &self.reader, &self.controls)?;

        log::info!("Processing {} control file(s)", control.len());
        let control_columns = process_files(control, &self.reader, &self.controls)?;

        let (matrix, imputation) = build_matrix(&experimental_columns, &control_columns)?;

        Ok(PreprocessOutput {
            matrix,
            imputation,
            experimental_files: experimental.iter().map(|p| p.as_ref().to_path_buf()).collect(),
            control_files: control.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        })
    }

    /// Discover result files in both folders and process them.
    ///
    /// No files in the experimental folder is a valid empty group; no files in
    /// the control folder is an error.
    pub fn run_dirs<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        experimental_dir: P,
        control_dir: Q,
    ) -> Result<PreprocessOutput> {
        let experimental_dir = experimental_dir.as_ref();
        let control_dir = control_dir.as_ref();
        let ext = &self.reader.extension;

        let experimental = discover_files(experimental_dir, ext)?;
        if experimental.is_empty() {
            log::warn!(
                "No .{} files found in {}; creating empty experimental group",
                ext,
                experimental_dir.display()
            );
        }

        let control = discover_files(control_dir, ext)?;
        if control.is_empty() {
            return Err(GprError::EmptyControlGroup(format!(
                "no .{} files found in {}",
                ext,
                control_dir.display()
            )));
        }

        self.run_files(experimental.as_slice(), control.as_slice())
    }
}

/// Convenience function: discover, process, and write the matrix to `output`.
pub fn run_preprocessing<P, Q, R>(
    experimental_dir: P,
    control_dir: Q,
    output: R,
) -> Result<PreprocessOutput>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let result = Preprocessor::new().run_dirs(experimental_dir, control_dir)?;
    result.write(output)?;
    Ok(result)
}
