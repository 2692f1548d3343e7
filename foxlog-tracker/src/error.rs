//! Tracker error types.

use foxlog_api::ApiError;
use foxlog_core::FoxlogError;
use thiserror::Error;

/// Errors that end a tracking run.
///
/// Upstream failures during a running session are not errors at this level;
/// they skip a cycle or a map and are reported through the cycle outcome.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The war service could not be reached before tracking began.
    #[error("could not start tracking: {0}")]
    Startup(#[source] ApiError),

    /// An event could not be written. Retained state has already advanced,
    /// so continuing would silently lose the event.
    #[error("event persistence failed: {0}")]
    Persistence(#[from] FoxlogError),
}
