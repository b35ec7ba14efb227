use thiserror::Error;

use crate::window::WindowHandle;

/// Errors that can occur during window operations.
///
/// Enumeration never errors: a process with no visible windows and a process
/// that has already exited both yield an empty list, and liveness is the
/// supervisor's concern.
#[derive(Error, Debug)]
pub enum Error {
    /// The platform refused to move the window (e.g. minimized, or owned by
    /// a higher privilege level).
    #[error("window move refused by platform (handle={handle}, code={code})")]
    MoveRefused {
        /// Handle of the window the move was attempted against.
        handle: WindowHandle,
        /// Platform error code, 0 when none was reported.
        code: i32,
    },

    /// Window management is not available on this platform.
    #[error("window operations are not supported on this platform")]
    Unsupported,
}

/// Result alias for window operations.
pub type Result<T> = std::result::Result<T, Error>;
