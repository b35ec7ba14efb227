use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading point data or writing rendered artifacts.
#[derive(Error, Debug)]
pub enum Error {
    /// A point file contained no usable XYZ rows.
    #[error("no valid XYZ data found in {}", .0.display())]
    NoPoints(PathBuf),

    /// Edge point lists were empty.
    #[error("edge point lists must not be empty")]
    EmptyEdges,

    /// Leading and trailing edges must pair up section by section.
    #[error("leading edge has {le} points but trailing edge has {te}")]
    EdgeMismatch {
        /// Number of leading-edge points.
        le: usize,
        /// Number of trailing-edge points.
        te: usize,
    },

    /// I/O failure reading points or writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
