//! Error type for the orchestrator binary.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::placement::InstanceRole;

/// Errors surfaced to `main` and mapped to the process exit code.
#[derive(Error, Debug)]
pub enum Error {
    /// No AVL executable at any known location and none was specified.
    #[error("could not locate the AVL executable; pass --avl-exe")]
    AvlExecutableNotFound,

    /// A user-specified input path does not exist.
    #[error("path does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    /// Neither a geometry file nor a pair of edge point files was given.
    #[error("--le and --te point files are required when --avl is not given")]
    MissingPoints,

    /// Spawning one of the AVL instances failed.
    #[error("failed to launch {role} AVL instance: {source}")]
    Spawn {
        /// Which instance failed to start.
        role: InstanceRole,
        /// The underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// An instance exited during startup, before the interactive phase.
    #[error("{role} AVL instance exited during startup ({status})")]
    EarlyExit {
        /// Which instance died.
        role: InstanceRole,
        /// Its exit status.
        status: ExitStatus,
    },

    /// An instance ran to completion but reported failure.
    #[error("{role} AVL instance exited with status {code}")]
    InstanceFailed {
        /// Which instance failed.
        role: InstanceRole,
        /// Its non-zero exit code.
        code: i32,
    },

    /// The run was interrupted by Ctrl-C.
    #[error("interrupted")]
    Interrupted,

    /// Geometry or run-file preparation failed.
    #[error(transparent)]
    Files(#[from] avl_files::Error),

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error: 130 for an interrupt (the shell
    /// convention for SIGINT), 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

/// Result alias for the binary.
pub type Result<T> = std::result::Result<T, Error>;
