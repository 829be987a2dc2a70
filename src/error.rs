use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that abort a run before any output is written.
///
/// Fit overflow is deliberately not represented here: a text region that
/// does not fit at the minimum font size is still rendered (best effort)
/// and only surfaced as a warning.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A column pool has too few usable entries to fill five cells
    /// without repeats. `column` is 1-based for display.
    #[error("column {column} has {count} usable entries (need at least {})", crate::pools::MIN_POOL_SIZE)]
    PoolTooSmall { column: usize, count: usize },

    #[error("failed to read {path}: {message}")]
    InputParse { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
