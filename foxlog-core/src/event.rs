//! Transition events as they are written to the per-war CSV file.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diff::Transition;
use crate::icons::IconCategory;
use crate::types::{EntityIdentity, Team, WarId, WarInfo};
use crate::war_clock::WarClock;

/// Column header of every event file, in row order.
pub const CSV_HEADER: [&str; 10] = [
    "Timestamp",
    "War Time",
    "Minutes Since War Start",
    "War ID",
    "War Number",
    "Map",
    "Icon Type",
    "Icon Category",
    "Previous Team",
    "Current Team",
];

/// One recorded ownership change. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionEvent {
    /// When the change was observed.
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Elapsed war time, `"Xd HHh MMm"`.
    #[serde(rename = "War Time")]
    pub war_time: String,
    /// Whole minutes since conquest start.
    #[serde(rename = "Minutes Since War Start")]
    pub minutes_since_war_start: i64,
    /// Upstream war id.
    #[serde(rename = "War ID")]
    pub war_id: WarId,
    /// War number; also selects the output file.
    #[serde(rename = "War Number")]
    pub war_number: u32,
    /// Map the entity is on.
    #[serde(rename = "Map")]
    pub map_name: String,
    /// Raw icon code.
    #[serde(rename = "Icon Type")]
    pub icon_type: u32,
    /// Category name for the icon code.
    #[serde(rename = "Icon Category")]
    pub icon_category: &'static str,
    /// Owner at the previous poll.
    #[serde(rename = "Previous Team")]
    pub previous_team: Team,
    /// Owner now.
    #[serde(rename = "Current Team")]
    pub current_team: Team,
    /// Entity that changed hands. Not persisted.
    #[serde(skip)]
    pub identity: EntityIdentity,
}

impl TransitionEvent {
    /// Stamp a diff [`Transition`] with war context at `now`.
    #[must_use]
    pub fn new(transition: Transition, war: &WarInfo, now: DateTime<Utc>) -> Self {
        let clock = WarClock::since(war.conquest_start_time, now);
        let icon_type = transition.identity.icon_type();
        Self {
            timestamp: now,
            war_time: clock.war_time(),
            minutes_since_war_start: clock.minutes_since_start(),
            war_id: war.war_id.clone(),
            war_number: war.war_number,
            map_name: transition.map_name,
            icon_type,
            icon_category: IconCategory::of(icon_type).as_str(),
            previous_team: transition.previous,
            current_team: transition.current,
            identity: transition.identity,
        }
    }
}
