//! GenePix result (`.gpr`) file reading.
//!
//! A result file starts with a fixed block of metadata lines, followed by a
//! tab-separated table whose header row names the measured columns. The
//! identifier and signal columns vary between scanner configurations, so
//! both are looked up from an ordered list of accepted names.

use super::encoding::{first_success, TextEncoding, DEFAULT_ENCODINGS};
use crate::data::{FeatureTable, RawRecord};
use crate::error::{GprError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of metadata lines preceding the column-header row.
pub const DEFAULT_SKIP_ROWS: usize = 31;

/// Accepted identifier column names, in order of preference.
pub const ID_COLUMNS: [&str; 3] = ["ID", "Row", "Name"];

/// Accepted background-subtracted signal column names, in order of preference.
pub const SIGNAL_COLUMNS: [&str; 3] = [
    "F650 Median - B650",
    "F550 Median - B550",
    "F60 Median - B60",
];

/// Default extension of result files.
pub const DEFAULT_EXTENSION: &str = "gpr";

/// Ordered list of accepted names for one logical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCandidates {
    field: String,
    names: Vec<String>,
}

impl ColumnCandidates {
    pub fn new<I, S>(field: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.to_string(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Logical field name used in error messages.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Accepted names in preference order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of the first accepted name present in `header`, with that name.
    pub fn resolve<'h>(&self, header: &'h [String]) -> Option<(usize, &'h str)> {
        self.names.iter().find_map(|name| {
            header
                .iter()
                .position(|h| h == name)
                .map(|idx| (idx, header[idx].as_str()))
        })
    }

    /// Like [`resolve`](Self::resolve), but reports the missing column for `path`.
    pub fn require<'h>(&self, header: &'h [String], path: &Path) -> Result<(usize, &'h str)> {
        self.resolve(header).ok_or_else(|| GprError::MissingColumn {
            path: path.to_path_buf(),
            field: self.field().to_string(),
            tried: self.names().to_vec(),
            found: header.to_vec(),
        })
    }
}

/// Options controlling how result files are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Metadata lines to skip before the column-header row.
    pub skip_rows: usize,
    /// Accepted identifier column names, in order of preference.
    pub id_columns: Vec<String>,
    /// Accepted signal column names, in order of preference.
    pub signal_columns: Vec<String>,
    /// Encodings to try, in order.
    pub encodings: Vec<TextEncoding>,
    /// File extension used when discovering files in a folder.
    pub extension: String,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            id_columns: ID_COLUMNS.iter().map(|s| s.to_string()).collect(),
            signal_columns: SIGNAL_COLUMNS.iter().map(|s| s.to_string()).collect(),
            encodings: DEFAULT_ENCODINGS.to_vec(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ReaderOptions {
    /// Prefer `name` over the other accepted signal columns.
    pub fn prefer_signal_column(mut self, name: &str) -> Self {
        self.signal_columns.retain(|c| c != name);
        self.signal_columns.insert(0, name.to_string());
        self
    }

    pub fn id_candidates(&self) -> ColumnCandidates {
        ColumnCandidates::new("row identifier", self.id_columns.iter().cloned())
    }

    pub fn signal_candidates(&self) -> ColumnCandidates {
        ColumnCandidates::new("signal", self.signal_columns.iter().cloned())
    }
}

/// The tabular body of a result file: header plus raw records.
#[derive(Debug, Clone)]
struct RawTable {
    header: Vec<String>,
    records: Vec<csv::StringRecord>,
}

/// Read a result file into a `Row`/`Signal` feature table.
///
/// Encodings are tried in the configured order; an attempt fails if the bytes
/// cannot be decoded or the decoded text cannot be parsed as a table.
pub fn read_gpr_file<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> Result<FeatureTable> {
    let path = path.as_ref();
    log::info!("Reading {}...", display_name(path));

    let bytes = std::fs::read(path)?;
    let (encoding, table) = first_success(&options.encodings, |encoding| {
        let text = encoding.decode(&bytes)?;
        parse_table(&text, options.skip_rows)
    })
    .map_err(|failures| GprError::Encoding {
        path: path.to_path_buf(),
        attempted: failures.iter().map(|f| f.encoding.label().to_string()).collect(),
        last_error: failures
            .last()
            .map(|f| f.message.clone())
            .unwrap_or_else(|| "no encodings configured".to_string()),
    })?;

    if options.encodings.first() != Some(&encoding) {
        log::debug!("  Decoded {} as {}", display_name(path), encoding);
    }

    select_columns(table, options, path)
}

/// Parse the text of a result file into a feature table.
///
/// `path` only labels errors.
pub fn parse_gpr_text(text: &str, options: &ReaderOptions, path: &Path) -> Result<FeatureTable> {
    let table = parse_table(text, options.skip_rows).map_err(|e| GprError::Encoding {
        path: path.to_path_buf(),
        attempted: vec!["decoded text".to_string()],
        last_error: e,
    })?;
    select_columns(table, options, path)
}

fn select_columns(table: RawTable, options: &ReaderOptions, path: &Path) -> Result<FeatureTable> {
    let (signal_idx, signal_name) = options.signal_candidates().require(&table.header, path)?;
    let (id_idx, id_name) = options.id_candidates().require(&table.header, path)?;
    log::debug!("  Using identifier column '{}'", id_name);

    let features: FeatureTable = table
        .records
        .iter()
        .map(|record| {
            RawRecord::new(
                record.get(id_idx).unwrap_or_default(),
                record.get(signal_idx).unwrap_or_default(),
            )
        })
        .collect();

    log::info!("  Found {} rows using column '{}'", features.len(), signal_name);
    Ok(features)
}

fn parse_table(text: &str, skip_rows: usize) -> std::result::Result<RawTable, String> {
    let body = skip_lines(text, skip_rows)
        .ok_or_else(|| format!("file ends before the {} header lines to skip", skip_rows))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(String::from)
        .collect();
    if header.iter().all(|h| h.is_empty()) {
        return Err("no columns to parse from file".to_string());
    }
    if header.iter().any(|h| spans_lines(h)) {
        return Err("unterminated quote in header row".to_string());
    }

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.iter().any(spans_lines) {
            return Err(format!("unterminated quote in data row {}", line + 1));
        }
        if record.len() > header.len() {
            return Err(format!(
                "expected {} fields in data row {}, saw {}",
                header.len(),
                line + 1,
                record.len()
            ));
        }
        records.push(record);
    }

    Ok(RawTable { header, records })
}

/// A field holding a line break was opened by a quote that never closed.
fn spans_lines(field: &str) -> bool {
    field.contains(|c: char| c == '\n' || c == '\r')
}

/// The remainder of `text` after its first `n` lines, or `None` if the text
/// has fewer than `n` complete lines.
///
/// `\n`, `\r\n` and a lone `\r` each end a line.
fn skip_lines(text: &str, n: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    for _ in 0..n {
        let end = bytes[pos..].iter().position(|&b| b == b'\n' || b == b'\r')? + pos;
        pos = if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
            end + 2
        } else {
            end + 1
        };
    }
    Some(&text[pos..])
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
