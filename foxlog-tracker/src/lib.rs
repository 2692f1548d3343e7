//! # foxlog-tracker — Live Map Event Tracker
//!
//! Ties the war service client to the diff engine and the event sink, and
//! drives them on a fixed poll interval until the tracked war reaches its
//! resistance phase.
//!
//! ## Modules
//!
//! - `tracker` — tracker context, startup, per-cycle logic, run loop
//! - `clock` — injectable time source (`SystemClock`, `ManualClock`)
//! - `error` — errors that end a run

pub mod clock;
pub mod error;
pub mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TrackerError;
pub use tracker::{CycleOutcome, CycleReport, Halt, SkipReason, StartOutcome, Tracker};
