#![warn(missing_docs)]

//! Window discovery and placement capability for AVL viewer orchestration.
//!
//! The external AVL process opens its plot windows without any notification
//! mechanism, so callers can only enumerate top-level windows by process id
//! and move the ones they find. This crate exposes that capability behind the
//! [`WinOps`] trait:
//! - [`platform`] returns the real implementation on Windows and a no-op
//!   elsewhere (window management is cosmetic; an unsupported host skips it).
//! - [`MockWinOps`] scripts window lists and records moves for tests.
//!
//! Pure geometry lives in [`geom`] and the target-rectangle planner in
//! [`layout`].

pub mod error;
pub mod geom;
pub mod layout;
mod ops;
mod window;

pub use error::{Error, Result};
pub use geom::Rect;
pub use layout::{SplitPolicy, plan_targets};
pub use ops::{MockWinOps, NoopWinOps, WinOps, platform};
pub use window::{WindowHandle, WindowInfo};
