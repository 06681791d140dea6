//! Reading result files into feature tables.

pub mod encoding;
pub mod gpr;

pub use encoding::{first_success, AttemptFailure, TextEncoding, DEFAULT_ENCODINGS};
pub use gpr::{
    parse_gpr_text, read_gpr_file, ColumnCandidates, ReaderOptions, DEFAULT_EXTENSION,
    DEFAULT_SKIP_ROWS, ID_COLUMNS, SIGNAL_COLUMNS,
};
