#![warn(missing_docs)]

//! Deterministic text artifacts consumed by the AVL executable.
//!
//! AVL has no API; everything it reads is a text file or a line of keystrokes
//! on stdin. This crate renders all three inputs the orchestrator needs:
//! - a geometry file built from leading/trailing-edge point data
//!   ([`geometry`], [`points`]),
//! - a run-case file for one operating point or a flight-envelope sweep
//!   ([`runcase`]),
//! - the command scripts piped to each viewer instance ([`script`]).
//!
//! Rendering is pure; the only I/O here is reading point CSVs and the
//! convenience writers that put rendered text on disk.

pub mod error;
pub mod geometry;
pub mod points;
pub mod runcase;
pub mod script;

pub use error::{Error, Result};
pub use geometry::WingGeometry;
pub use points::Point3;
pub use runcase::{EnvelopeSweep, RunCase};
pub use script::CommandScript;
