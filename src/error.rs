//! Error type shared by the boundary loader, grid tiler and point store.

use std::path::PathBuf;

/// Errors returned by the library.
///
/// The registry never fails; duplicate points are reported through a flag.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The boundary document does not match the expected schema or holds no
    /// usable polygon ring.
    #[error("malformed boundary: {0}")]
    MalformedBoundary(String),

    /// A grid parameter (cell size, cell limit) cannot be used.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A stored point row could not be parsed.
    #[error("invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
