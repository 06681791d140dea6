//! Integration tests for the folder-to-matrix preprocessing pipeline.

use approx::assert_relative_eq;
use gpr_prep::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const SIGNAL: &str = "F650 Median - B650";

/// Write a GenePix-style result file with 31 metadata lines.
///
/// Identifiers are quoted the way the scanner software writes them.
fn write_gpr(
    dir: &Path,
    name: &str,
    id_column: &str,
    signal_column: &str,
    rows: &[(&str, &str)],
) -> PathBuf {
    let mut text = String::from("ATF\t1.0\n29\t45\n");
    for i in 0..29 {
        text.push_str(&format!("\"Header{}=value {}\"\n", i, i));
    }
    text.push_str(&format!(
        "\"Block\"\t\"Column\"\t\"{}\"\t\"F635 Median\"\t\"{}\"\n",
        id_column, signal_column
    ));
    for (i, (id, signal)) in rows.iter().enumerate() {
        text.push_str(&format!("1\t{}\t\"{}\"\t500\t{}\n", i + 1, id, signal));
    }
    let path = dir.join(format!("{}.gpr", name));
    fs::write(&path, text).unwrap();
    path
}

fn group_dirs() -> (TempDir, TempDir) {
    (tempdir().unwrap(), tempdir().unwrap())
}

fn read_output(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split(',').map(String::from).collect())
        .collect()
}

#[test]
fn test_two_experimental_one_control() {
    let (exp, ctrl) = group_dirs();
    write_gpr(exp.path(), "exp1", "ID", SIGNAL, &[("A", "1"), ("B", "2"), ("C", "3")]);
    write_gpr(exp.path(), "exp2", "ID", SIGNAL, &[("B", "20"), ("C", "30"), ("D", "40")]);
    write_gpr(ctrl.path(), "ctrl1", "ID", SIGNAL, &[("A", "100"), ("D", "400")]);

    let result = Preprocessor::new().run_dirs(exp.path(), ctrl.path()).unwrap();
    let m = result.matrix.matrix();

    assert_eq!(m.feature_ids().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
    assert_eq!(m.sample_ids(), &["exp1", "exp2", "ctrl1"]);
    assert_eq!(m.get("A", 0), Some(1.0));
    assert_relative_eq!(m.get("A", 1).unwrap(), 30.0);
    assert_eq!(m.get("A", 2), Some(100.0));
    assert!(m.is_complete());

    let out = tempdir().unwrap();
    let path = out.path().join("sam_input.csv");
    result.write(&path).unwrap();

    let rows = read_output(&path);
    assert_eq!(rows[0], vec!["", "", "1", "1", "2"]);
    assert_eq!(rows[1], vec!["A", "A", "1", "30", "100"]);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.len() == 5));
}

#[test]
fn test_replicates_controls_and_malformed_values() {
    let (exp, ctrl) = group_dirs();
    write_gpr(
        exp.path(),
        "array",
        "Name",
        "F550 Median - B550",
        &[
            ("P1", "10"),
            ("Blank", "999"),
            ("P1", "30"),
            ("P2", "N/A"),
            ("BSA", "5"),
            ("P3", "8"),
        ],
    );
    write_gpr(
        ctrl.path(),
        "c",
        "Name",
        "F550 Median - B550",
        &[("P1", "1"), ("P2", "2"), ("P3", "3")],
    );

    let result = Preprocessor::new().run_dirs(exp.path(), ctrl.path()).unwrap();
    let m = result.matrix.matrix();

    assert_eq!(m.feature_ids().collect::<Vec<_>>(), vec!["P1", "P2", "P3"]);
    assert_relative_eq!(m.get("P1", 0).unwrap(), 20.0);
    // P2 only had N/A: filled with the median of 20 and 8.
    assert_relative_eq!(m.get("P2", 0).unwrap(), 14.0);
    assert_eq!(result.imputation.columns[0].n_imputed, 1);
}

#[test]
fn test_control_file_with_only_blank() {
    let (exp, ctrl) = group_dirs();
    write_gpr(exp.path(), "e", "ID", SIGNAL, &[("A", "5"), ("B", "7")]);
    write_gpr(ctrl.path(), "c", "ID", SIGNAL, &[("Blank", "1")]);

    let result = Preprocessor::new().run_dirs(exp.path(), ctrl.path()).unwrap();
    let m = result.matrix.matrix();

    assert_eq!(m.n_features(), 2);
    assert_eq!(m.get("A", 1), Some(0.0));
    assert_eq!(m.get("B", 1), Some(0.0));
    assert!(result.imputation.columns[1].degenerate);
}

#[test]
fn test_empty_experimental_folder() {
    let (exp, ctrl) = group_dirs();
    write_gpr(ctrl.path(), "c1", "Row", SIGNAL, &[("A", "1"), ("B", "3")]);
    write_gpr(ctrl.path(), "c2", "Row", SIGNAL, &[("A", "2")]);

    let out = tempdir().unwrap();
    let path = out.path().join("matrix.tsv");
    let result = run_preprocessing(exp.path(), ctrl.path(), &path).unwrap();

    assert_eq!(result.matrix.n_experimental(), 0);
    assert_eq!(result.matrix.n_control(), 2);
    assert!(result.experimental_files.is_empty());

    let content = fs::read_to_string(&path).unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header, "\t\t2\t2");
    assert!(!header.contains('1'));
}

#[test]
fn test_empty_control_folder_is_fatal() {
    let (exp, ctrl) = group_dirs();
    write_gpr(exp.path(), "e", "ID", SIGNAL, &[("A", "5")]);

    let err = Preprocessor::new().run_dirs(exp.path(), ctrl.path()).unwrap_err();
    assert!(matches!(err, GprError::EmptyControlGroup(_)));
}

#[test]
fn test_unreadable_file_aborts_group() {
    let (exp, ctrl) = group_dirs();
    write_gpr(exp.path(), "a_good", "ID", SIGNAL, &[("A", "5")]);
    let bad = write_gpr(exp.path(), "b_bad", "ID", "F635 Mean", &[("A", "5")]);
    write_gpr(ctrl.path(), "c", "ID", SIGNAL, &[("A", "1")]);

    let err = Preprocessor::new().run_dirs(exp.path(), ctrl.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("b_bad.gpr"), "message: {}", message);
    match err {
        GprError::File { path, source } => {
            assert_eq!(path, bad);
            assert!(matches!(*source, GprError::MissingColumn { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_custom_config_denylist() {
    let (exp, ctrl) = group_dirs();
    write_gpr(exp.path(), "e", "ID", SIGNAL, &[("A", "5"), ("Ref", "9")]);
    write_gpr(ctrl.path(), "c", "ID", SIGNAL, &[("A", "1"), ("Ref", "2")]);

    let config = PreprocessConfig::from_yaml("name: refs\ncontrols: [Ref]\n").unwrap();
    let result = Preprocessor::from_config(&config)
        .run_dirs(exp.path(), ctrl.path())
        .unwrap();

    assert_eq!(result.matrix.matrix().feature_ids().collect::<Vec<_>>(), vec!["A"]);
}

#[test]
fn test_summary_serializes() {
    let (exp, ctrl) = group_dirs();
    write_gpr(exp.path(), "e", "ID", SIGNAL, &[("A", "5")]);
    write_gpr(ctrl.path(), "c", "ID", SIGNAL, &[("B", "1")]);

    let result = Preprocessor::new().run_dirs(exp.path(), ctrl.path()).unwrap();
    let summary = result.summary();

    assert_eq!(summary.n_features, 2);
    assert_eq!(summary.n_imputed, 2);
    assert_eq!(summary.samples[0].group, GroupLabel::Experimental);
    assert_eq!(summary.samples[1].n_observed, 1);

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"n_features\":2"));
    assert!(summary.to_string().contains("Control samples (label=2):      1"));
}
