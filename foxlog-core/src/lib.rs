//! # foxlog core library
//!
//! Network-free domain model for tracking ownership changes on the Foxhole
//! world-conquest map.
//!
//! The war service exposes no persistent ids for map icons, so an entity is
//! identified by its icon type and its position rounded to five decimals
//! ([`EntityIdentity`]). Each poll produces a snapshot per map; the
//! [`DiffEngine`] compares it to the previous snapshot of the same map and
//! yields one [`Transition`] per entity whose owning team changed.
//!
//! ```text
//! WarInfo ──► lifecycle::assess ──► Halt / Continue / NewWar
//!                                         │
//! MapItem[] ──► DiffEngine::observe ──► Transition[] ──► TransitionEvent ──► EventSink
//! ```
//!
//! Nothing in this crate performs I/O except the [`sink`] module.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod icons;
pub mod lifecycle;
pub mod sink;
pub mod types;
pub mod war_clock;

pub use config::FoxlogConfig;
pub use diff::{DiffEngine, Transition};
pub use error::FoxlogError;
pub use event::TransitionEvent;
pub use icons::IconCategory;
pub use lifecycle::LifecycleDecision;
pub use sink::{CsvEventSink, EventSink, MemorySink};
pub use types::*;
