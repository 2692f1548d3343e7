//! Elapsed war time since the start of the conquest phase.

use chrono::{DateTime, TimeDelta, Utc};

/// Time elapsed since conquest start, at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarClock {
    elapsed: TimeDelta,
}

impl WarClock {
    /// Elapsed time between `conquest_start_ms` (epoch millis) and `now`.
    ///
    /// A start time in the future (clock skew) yields zero.
    #[must_use]
    pub fn since(conquest_start_ms: i64, now: DateTime<Utc>) -> Self {
        let elapsed = DateTime::<Utc>::from_timestamp_millis(conquest_start_ms)
            .map_or(TimeDelta::zero(), |start| now - start);
        Self {
            elapsed: elapsed.max(TimeDelta::zero()),
        }
    }

    /// Whole minutes elapsed.
    #[must_use]
    pub fn minutes_since_start(&self) -> i64 {
        self.elapsed.num_minutes()
    }

    /// Rendered as `"{d}d {hh}h {mm}m"`, e.g. `"3d 04h 07m"`.
    #[must_use]
    pub fn war_time(&self) -> String {
        let days = self.elapsed.num_days();
        let hours = self.elapsed.num_hours() % 24;
        let minutes = self.elapsed.num_minutes() % 60;
        format!("{days}d {hours:02}h {minutes:02}m")
    }
}
