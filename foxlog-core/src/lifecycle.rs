//! War lifecycle decisions.
//!
//! Each cycle the freshly fetched [`WarInfo`] is compared with the war the
//! tracker is following. Resistance is terminal; a different war number
//! means a new war has started and every retained snapshot is stale.

use crate::types::WarInfo;

/// What the tracker should do with the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleDecision {
    /// Resistance phase: stop tracking for good.
    Halt,
    /// Same war, keep diffing.
    Continue,
    /// A new war started; reset state and retarget the sink.
    NewWar {
        /// War number that was being tracked.
        previous: u32,
        /// War number now reported.
        current: u32,
    },
}

/// Decide how to proceed given the tracked war number and fresh war info.
///
/// Resistance takes priority over a war-number change.
#[must_use]
pub fn assess(tracked_war_number: u32, info: &WarInfo) -> LifecycleDecision {
    if info.is_resistance_phase() {
        LifecycleDecision::Halt
    } else if info.war_number != tracked_war_number {
        LifecycleDecision::NewWar {
            previous: tracked_war_number,
            current: info.war_number,
        }
    } else {
        LifecycleDecision::Continue
    }
}
