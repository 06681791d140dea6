//! Removal of calibration and blank control spots.

use crate::data::FeatureTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Control-spot labels printed on the arrays this tool was built for.
pub const DEFAULT_CONTROL_SPOTS: [&str; 24] = [
    "Cy3 3x and Cy5 2400x mixture",
    "Blank",
    "Poly-L-lysine",
    "BSA",
    "Lectin",
    "ProteinA",
    "empty",
    "blank",
    "a-His 1x",
    "streptavidin",
    "buffer",
    "0.96uM proteinG",
    "Cy3-Ab andCy5 mixtures x250",
    "6.6uM Poly-L-Lysine x50",
    "0.0182uM biotin",
    "105.48uml nagA",
    "13.19uml nagA",
    "1687.72uml nagA",
    "211uml nagA",
    "26.37uml nagA",
    "421.93uml nagA",
    "52.74uml nagA",
    "6.59uml nagA",
    "843.86uml nagA",
];

/// An immutable set of identifiers that are not biological features.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlDenylist {
    labels: BTreeSet<String>,
}

impl Default for ControlDenylist {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROL_SPOTS)
    }
}

impl ControlDenylist {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// A denylist that removes nothing.
    pub fn empty() -> Self {
        Self {
            labels: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.labels.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }
}

/// Result of control-spot filtering with statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Number of rows before filtering.
    pub n_before: usize,
    /// Number of rows after filtering.
    pub n_after: usize,
    /// Number of rows removed.
    pub n_removed: usize,
}

impl std::fmt::Display for FilterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Control Filter Result")?;
        writeln!(f, "  Before:    {} rows", self.n_before)?;
        writeln!(f, "  After:     {} rows", self.n_after)?;
        writeln!(f, "  Removed:   {} rows", self.n_removed)?;
        Ok(())
    }
}

/// Drop rows whose identifier is on the denylist.
///
/// Row order is preserved. Applying the filter twice is the same as once.
pub fn remove_control_spots(table: &FeatureTable, denylist: &ControlDenylist) -> FeatureTable {
    remove_control_spots_with_stats(table, denylist).0
}

/// Filter with statistics about what was removed.
pub fn remove_control_spots_with_stats(
    table: &FeatureTable,
    denylist: &ControlDenylist,
) -> (FeatureTable, FilterResult) {
    let n_before = table.len();
    let mut filtered = table.clone();
    filtered.retain(|r| !denylist.contains(&r.row));
    let n_after = filtered.len();

    let result = FilterResult {
        n_before,
        n_after,
        n_removed: n_before - n_after,
    };
    log::info!("  Removed {} control rows", result.n_removed);
    log::info!("  Remaining: {} data rows", result.n_after);

    (filtered, result)
}
