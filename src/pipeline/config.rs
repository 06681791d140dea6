//! YAML configuration for preprocessing runs.

use crate::error::{GprError, Result};
use crate::filter::ControlDenylist;
use crate::read::ReaderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the matrix written into the preprocessed folder.
pub const MATRIX_FILE_NAME: &str = "sam_input.csv";

/// Default log2 fold-change cutoff handed to the downstream test.
pub const DEFAULT_LOG2FC_CUTOFF: f64 = 0.5;
/// Default d-value cutoff handed to the downstream test.
pub const DEFAULT_D_VALUE_CUTOFF: f64 = 1.5;

/// How result files are read and cleaned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Name of the preprocessing setup.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Reader options (header offset, accepted columns, encodings).
    #[serde(default)]
    pub reader: ReaderOptions,
    /// Identifiers removed as control spots.
    #[serde(default)]
    pub controls: ControlDenylist,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            name: "gpr-default".to_string(),
            description: None,
            reader: ReaderOptions::default(),
            controls: ControlDenylist::default(),
        }
    }
}

impl PreprocessConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(GprError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(GprError::from)
    }

    /// Load from a YAML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

/// Input folders of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Folder with the experimental group's result files.
    pub experimental_folder: PathBuf,
    /// Folder with the control group's result files.
    pub control_folder: PathBuf,
    /// Folder the labelled matrix is written to.
    pub preprocessed_folder: PathBuf,
}

/// Output settings for the downstream analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder the downstream test writes its results to.
    pub results_folder: PathBuf,
    /// Whether the downstream test should write into a timestamped subfolder.
    #[serde(default)]
    pub timestamp_folders: bool,
}

/// Cutoffs for the downstream statistical test.
///
/// `delta` and `min_foldchange` are older spellings of the two cutoffs and
/// are used only when the newer keys are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log2fc_cutoff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_value_cutoff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_foldchange: Option<f64>,
}

impl AnalysisConfig {
    /// Effective log2 fold-change cutoff.
    pub fn log2fc(&self) -> f64 {
        self.log2fc_cutoff
            .or(self.delta)
            .unwrap_or(DEFAULT_LOG2FC_CUTOFF)
    }

    /// Effective d-value cutoff.
    pub fn d_value(&self) -> f64 {
        self.d_value_cutoff
            .or(self.min_foldchange)
            .unwrap_or(DEFAULT_D_VALUE_CUTOFF)
    }
}

/// A complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Reader and control-spot settings; defaults when absent.
    #[serde(default)]
    pub preprocess: Option<PreprocessConfig>,
}

impl RunConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(GprError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(GprError::from)
    }

    /// Load from a YAML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Path of the labelled matrix produced by preprocessing.
    pub fn matrix_path(&self) -> PathBuf {
        self.input.preprocessed_folder.join(MATRIX_FILE_NAME)
    }

    /// Preprocessing settings, falling back to defaults.
    pub fn preprocess_config(&self) -> PreprocessConfig {
        self.preprocess.clone().unwrap_or_default()
    }

    /// A configuration laid out like a typical project checkout.
    pub fn example() -> Self {
        Self {
            input: InputConfig {
                experimental_folder: PathBuf::from("data/experimental_group"),
                control_folder: PathBuf::from("data/control_group"),
                preprocessed_folder: PathBuf::from("preprocessed"),
            },
            output: OutputConfig {
                results_folder: PathBuf::from("results"),
                timestamp_folders: false,
            },
            analysis: AnalysisConfig {
                log2fc_cutoff: Some(DEFAULT_LOG2FC_CUTOFF),
                d_value_cutoff: Some(DEFAULT_D_VALUE_CUTOFF),
                ..AnalysisConfig::default()
            },
            preprocess: Some(PreprocessConfig::default()),
        }
    }
}
