//! The tracking session and its polling loop.
//!
//! ```text
//! start ──► [resistance?] ──► Halt::ResistanceAtStart
//!   │
//!   ▼
//! cycle: war info ──► assess ──► Halt / NewWar (reset, retarget) / Continue
//!          │ error: skip cycle, state untouched
//!          ▼
//!        for map in tracked maps (fixed order):
//!          fetch items ──► diff ──► append events
//!          │ error: log, next map
//!          ▼
//!        sleep(poll interval) ──► cycle
//! ```
//!
//! All mutable state lives in [`Tracker`]; several trackers can run side by
//! side in one process.

use std::time::Duration;

use tracing::{debug, info, warn};

use foxlog_api::{ApiError, WarApi};
use foxlog_core::diff::DiffEngine;
use foxlog_core::event::TransitionEvent;
use foxlog_core::lifecycle::{self, LifecycleDecision};
use foxlog_core::sink::EventSink;
use foxlog_core::types::WarInfo;

use crate::clock::Clock;
use crate::error::TrackerError;

/// State of the war currently being followed.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    /// War info as of the last successful refresh.
    pub war: WarInfo,
    /// Retained per-map ownership.
    pub engine: DiffEngine,
}

/// Result of [`Tracker::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Session established.
    Tracking {
        /// War being tracked.
        war_number: u32,
        /// Number of maps in the tracked set.
        maps: usize,
    },
    /// The war was already in resistance; nothing was fetched beyond war info.
    ResistanceAtStart,
}

/// Why [`Tracker::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The war was in resistance before tracking began.
    ResistanceAtStart,
    /// The tracked war entered resistance.
    ResistancePhase,
}

/// Why a cycle did nothing.
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// [`Tracker::start`] has not established a session.
    NotStarted,
    /// War info could not be refreshed.
    WarInfoUnavailable(ApiError),
    /// A new war was seen but its map list could not be fetched; the war
    /// change is retried next cycle.
    MapListUnavailable(ApiError),
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// War number the cycle ran against.
    pub war_number: u32,
    /// War number replaced by this cycle, if a new war was adopted.
    pub replaced_war: Option<u32>,
    /// Maps whose snapshot was diffed.
    pub maps_polled: usize,
    /// Maps whose fetch failed, in poll order.
    pub failed_maps: Vec<String>,
    /// Events appended to the sink.
    pub events_written: usize,
}

/// Result of [`Tracker::run_cycle`].
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Resistance phase reached; tracking is over.
    Halted,
    /// Nothing was diffed this cycle.
    Skipped(SkipReason),
    /// Maps were polled.
    Completed(CycleReport),
}

/// Tracker context: upstream client, event sink, clock and session state.
pub struct Tracker<A, S, C> {
    api: A,
    sink: S,
    clock: C,
    poll_interval: Duration,
    session: Option<TrackingSession>,
}

impl<A, S, C> Tracker<A, S, C>
where
    A: WarApi,
    S: EventSink,
    C: Clock,
{
    /// Create an idle tracker.
    #[must_use]
    pub fn new(api: A, sink: S, clock: C, poll_interval: Duration) -> Self {
        Self {
            api,
            sink,
            clock,
            poll_interval,
            session: None,
        }
    }

    /// Upstream client.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Event sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Sleep between cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Current session, once started.
    #[must_use]
    pub fn session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    /// Establish the tracking session.
    ///
    /// Fetches war info; if the war is already in resistance nothing else
    /// happens. Otherwise the war's event file is prepared and the tracked
    /// map set is snapshotted from the active map list.
    ///
    /// # Errors
    /// [`TrackerError::Startup`] if war info or the map list cannot be
    /// fetched; [`TrackerError::Persistence`] if the event file cannot be
    /// created.
    pub async fn start(&mut self) -> Result<StartOutcome, TrackerError> {
        let war = self
            .api
            .fetch_war_info()
            .await
            .map_err(TrackerError::Startup)?;

        if war.is_resistance_phase() {
            info!(war_number = war.war_number, "War is in resistance phase; not tracking");
            return Ok(StartOutcome::ResistanceAtStart);
        }

        self.sink.ensure_file_for_war(war.war_number)?;
        let maps = self
            .api
            .list_active_maps()
            .await
            .map_err(TrackerError::Startup)?;

        let outcome = StartOutcome::Tracking {
            war_number: war.war_number,
            maps: maps.len(),
        };
        info!(
            war_number = war.war_number,
            war_id = %war.war_id,
            maps = maps.len(),
            "Tracking maps"
        );
        self.session = Some(TrackingSession {
            war,
            engine: DiffEngine::new(maps),
        });
        Ok(outcome)
    }

    /// Run one polling cycle.
    ///
    /// # Errors
    /// Only [`TrackerError::Persistence`]; upstream failures are reported in
    /// the returned [`CycleOutcome`].
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, TrackerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(CycleOutcome::Skipped(SkipReason::NotStarted));
        };

        let war = match self.api.fetch_war_info().await {
            Ok(war) => war,
            Err(e) => {
                warn!(error = %e, "Could not refresh war info; skipping cycle");
                return Ok(CycleOutcome::Skipped(SkipReason::WarInfoUnavailable(e)));
            }
        };

        let mut replaced_war = None;
        match lifecycle::assess(session.war.war_number, &war) {
            LifecycleDecision::Halt => {
                info!(war_number = war.war_number, "War entered resistance phase; tracking stopped");
                return Ok(CycleOutcome::Halted);
            }
            LifecycleDecision::NewWar { previous, current } => {
                warn!(previous, current, "New war detected");
                let maps = match self.api.list_active_maps().await {
                    Ok(maps) => maps,
                    Err(e) => {
                        warn!(error = %e, war_number = current, "Could not list maps for new war; retrying next cycle");
                        return Ok(CycleOutcome::Skipped(SkipReason::MapListUnavailable(e)));
                    }
                };
                self.sink.ensure_file_for_war(current)?;
                info!(war_number = current, maps = maps.len(), "Tracking maps");
                session.engine.retarget(maps);
                replaced_war = Some(previous);
            }
            LifecycleDecision::Continue => {}
        }
        session.war = war;

        let mut report = CycleReport {
            war_number: session.war.war_number,
            replaced_war,
            ..CycleReport::default()
        };

        let maps = session.engine.maps().to_vec();
        for map_name in &maps {
            let items = match self.api.fetch_map_items(map_name).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(map = %map_name, error = %e, "Map fetch failed");
                    report.failed_maps.push(map_name.clone());
                    continue;
                }
            };
            report.maps_polled += 1;

            for transition in session.engine.observe(map_name, &items) {
                let event = TransitionEvent::new(transition, &session.war, self.clock.now());
                info!(
                    map = %event.map_name,
                    icon_type = event.icon_type,
                    category = event.icon_category,
                    x = event.identity.x(),
                    y = event.identity.y(),
                    previous = %event.previous_team,
                    current = %event.current_team,
                    "Ownership changed"
                );
                self.sink.append(&event)?;
                report.events_written += 1;
            }
        }

        debug!(
            war_number = report.war_number,
            polled = report.maps_polled,
            failed = report.failed_maps.len(),
            events = report.events_written,
            "Cycle complete"
        );
        Ok(CycleOutcome::Completed(report))
    }

    /// Start, then poll until resistance is reached.
    ///
    /// # Errors
    /// Startup failures and persistence failures; see [`TrackerError`].
    pub async fn run(&mut self) -> Result<Halt, TrackerError> {
        if self.start().await? == StartOutcome::ResistanceAtStart {
            return Ok(Halt::ResistanceAtStart);
        }

        loop {
            if let CycleOutcome::Halted = self.run_cycle().await? {
                return Ok(Halt::ResistancePhase);
            }
            self.clock.sleep(self.poll_interval).await;
        }
    }
}
