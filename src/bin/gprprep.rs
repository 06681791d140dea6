//! gprprep - GenePix result preprocessing CLI
//!
//! Command-line interface for turning two groups of result files into a
//! labelled matrix for two-class analysis.

use clap::{Parser, Subcommand};
use gpr_prep::error::Result;
use gpr_prep::pipeline::{PreprocessConfig, PreprocessOutput, Preprocessor, RunConfig};
use std::path::{Path, PathBuf};

/// GenePix result preprocessing
#[derive(Parser)]
#[command(name = "gprprep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preprocess experimental and control folders into a labelled matrix
    Preprocess {
        /// Folder with experimental group result files
        #[arg(short, long)]
        experimental: PathBuf,

        /// Folder with control group result files
        #[arg(short, long)]
        control: PathBuf,

        /// Output matrix path (.csv for comma-separated, otherwise tab-separated)
        #[arg(short, long, default_value = "sam_input.csv")]
        output: PathBuf,

        /// Optional preprocessing configuration YAML
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preferred signal column (e.g., "F550 Median - B550")
        #[arg(long)]
        signal_column: Option<String>,

        /// Summary format: text, json, or yaml
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Preprocess as described by a run configuration file
    Run {
        /// Path to run configuration YAML
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,
    },

    /// Generate an example run configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Preprocess {
            experimental,
            control,
            output,
            config,
            signal_column,
            format,
        } => cmd_preprocess(
            &experimental,
            &control,
            &output,
            config.as_deref(),
            signal_column.as_deref(),
            &format,
        ),

        Commands::Run { config } => cmd_run(&config),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Preprocess two folders into a matrix
fn cmd_preprocess(
    experimental: &Path,
    control: &Path,
    output: &Path,
    config_path: Option<&Path>,
    signal_column: Option<&str>,
    format: &str,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading preprocessing configuration from {:?}...", path);
            PreprocessConfig::from_path(path)?
        }
        None => PreprocessConfig::default(),
    };

    let mut preprocessor = Preprocessor::from_config(&config);
    if let Some(name) = signal_column {
        preprocessor = preprocessor.signal_column(name);
    }

    eprintln!("Experimental group folder: {:?}", experimental);
    eprintln!("Control group folder: {:?}", control);
    eprintln!("Output file: {:?}", output);

    let result = preprocessor.run_dirs(experimental, control)?;
    result.write(output)?;
    print_summary(&result, format)?;

    eprintln!("Done! Matrix written to {:?}", output);
    Ok(())
}

/// Preprocess from a run configuration and print the analysis hand-off
fn cmd_run(config_path: &Path) -> Result<()> {
    eprintln!("Loading run configuration from {:?}...", config_path);
    let config = RunConfig::from_path(config_path)?;

    let preprocessor = Preprocessor::from_config(&config.preprocess_config());
    let result = preprocessor.run_dirs(
        &config.input.experimental_folder,
        &config.input.control_folder,
    )?;

    let matrix_path = config.matrix_path();
    result.write(&matrix_path)?;
    print_summary(&result, "text")?;

    eprintln!();
    eprintln!("Preprocessing complete. Next step: run the two-class test with");
    eprintln!("  input folder:   {:?}", config.input.preprocessed_folder);
    eprintln!("  output folder:  {:?}", config.output.results_folder);
    eprintln!("  log2FC cutoff:  {}", config.analysis.log2fc());
    eprintln!("  d-value cutoff: {}", config.analysis.d_value());
    if config.output.timestamp_folders {
        eprintln!("  (results go into a timestamped subfolder)");
    }

    Ok(())
}

/// Write an example run configuration
fn cmd_example(output_path: &Path) -> Result<()> {
    let yaml = RunConfig::example().to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example configuration to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}

fn print_summary(result: &PreprocessOutput, format: &str) -> Result<()> {
    let summary = result.summary();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "yaml" => println!("{}", serde_yaml::to_string(&summary)?),
        _ => println!("{}", summary),
    }
    Ok(())
}
