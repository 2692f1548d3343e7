//! # foxlog-api — War Service Client
//!
//! Read-only access to the three world-conquest endpoints the tracker needs:
//!
//! ```text
//! GET /worldconquest/war                         → WarInfo
//! GET /worldconquest/maps                        → [mapName]
//! GET /worldconquest/maps/{mapName}/dynamic/public → { mapItems: [...] }
//! ```
//!
//! Every call carries a per-request timeout and never retries; the caller
//! decides what a failure means for its cycle. The [`WarApi`] trait is the
//! seam tests use to script upstream behaviour.

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpWarApi, WarApi};
pub use error::ApiError;
