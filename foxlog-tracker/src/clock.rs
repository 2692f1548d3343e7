//! Injectable time source for the polling loop.
//!
//! The tracker never calls `Utc::now` or `tokio::time::sleep` directly, so a
//! [`ManualClock`] can drive any number of cycles without real delay.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Wall clock plus the sleep between cycles.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant, used to stamp events.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Simulated time: `sleep` returns immediately and advances `now`.
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualClockState>,
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Utc>,
    sleeps: u32,
}

impl ManualClock {
    /// Clock starting at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ManualClockState {
                now: start,
                sleeps: 0,
            }),
        }
    }

    /// Move time forward without counting a sleep.
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.inner.lock();
        inner.now += to_delta(duration);
    }

    /// How many times `sleep` has been called.
    #[must_use]
    pub fn sleeps(&self) -> u32 {
        self.inner.lock().sleeps
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.inner.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock();
        inner.now += to_delta(duration);
        inner.sleeps += 1;
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or_else(|_| TimeDelta::zero())
}
