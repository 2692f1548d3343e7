//! Tracker scenarios driven by a scripted war service and a manual clock.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use foxlog_api::{ApiError, WarApi};
use foxlog_core::error::{FoxlogError, Result as CoreResult};
use foxlog_core::event::TransitionEvent;
use foxlog_core::sink::{CsvEventSink, EventSink, MemorySink};
use foxlog_core::types::{MapItem, Team, WarId, WarInfo};
use foxlog_tracker::{
    CycleOutcome, Halt, ManualClock, SkipReason, StartOutcome, Tracker, TrackerError,
};

// ---------------------------------------------------------------------------
// Scripted war service
// ---------------------------------------------------------------------------

/// Replays queued responses; once a queue is drained the last successful
/// response repeats.
#[derive(Default)]
struct ScriptedApi {
    inner: Mutex<Script>,
}

#[derive(Default)]
struct Script {
    wars: VecDeque<Result<WarInfo, ApiError>>,
    last_war: Option<WarInfo>,
    map_lists: VecDeque<Result<Vec<String>, ApiError>>,
    last_maps: Vec<String>,
    snapshots: HashMap<String, VecDeque<Result<Vec<MapItem>, ApiError>>>,
    last_snapshot: HashMap<String, Vec<MapItem>>,
    map_fetches: usize,
}

impl ScriptedApi {
    fn new(maps: &[&str]) -> Self {
        let api = Self::default();
        api.inner.lock().last_maps = maps.iter().map(|m| (*m).to_string()).collect();
        api
    }

    fn war(&self, war: Result<WarInfo, ApiError>) -> &Self {
        self.inner.lock().wars.push_back(war);
        self
    }

    fn maps(&self, maps: Result<Vec<String>, ApiError>) -> &Self {
        self.inner.lock().map_lists.push_back(maps);
        self
    }

    fn snapshot(&self, map: &str, items: Result<Vec<MapItem>, ApiError>) -> &Self {
        self.inner
            .lock()
            .snapshots
            .entry(map.to_string())
            .or_default()
            .push_back(items);
        self
    }

    fn map_fetches(&self) -> usize {
        self.inner.lock().map_fetches
    }
}

#[async_trait]
impl WarApi for ScriptedApi {
    async fn fetch_war_info(&self) -> Result<WarInfo, ApiError> {
        let mut script = self.inner.lock();
        match script.wars.pop_front() {
            Some(Ok(war)) => {
                script.last_war = Some(war.clone());
                Ok(war)
            }
            Some(Err(e)) => Err(e),
            None => script.last_war.clone().ok_or_else(|| timeout("war")),
        }
    }

    async fn list_active_maps(&self) -> Result<Vec<String>, ApiError> {
        let mut script = self.inner.lock();
        match script.map_lists.pop_front() {
            Some(Ok(maps)) => {
                script.last_maps = maps.clone();
                Ok(maps)
            }
            Some(Err(e)) => Err(e),
            None => Ok(script.last_maps.clone()),
        }
    }

    async fn fetch_map_items(&self, map_name: &str) -> Result<Vec<MapItem>, ApiError> {
        let mut script = self.inner.lock();
        script.map_fetches += 1;
        let next = script
            .snapshots
            .get_mut(map_name)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(items)) => {
                script
                    .last_snapshot
                    .insert(map_name.to_string(), items.clone());
                Ok(items)
            }
            Some(Err(e)) => Err(e),
            None => Ok(script
                .last_snapshot
                .get(map_name)
                .cloned()
                .unwrap_or_default()),
        }
    }
}

/// Sink whose appends always fail.
struct BrokenSink;

impl EventSink for BrokenSink {
    fn ensure_file_for_war(&mut self, _war_number: u32) -> CoreResult<bool> {
        Ok(false)
    }

    fn append(&mut self, _event: &TransitionEvent) -> CoreResult<()> {
        Err(FoxlogError::Io(std::io::Error::other("disk full")))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn war(number: u32) -> WarInfo {
    WarInfo {
        war_id: WarId(format!("war-{number}")),
        war_number: number,
        conquest_start_time: 1_700_000_000_000,
        resistance_start_time: None,
        conquest_end_time: None,
    }
}

fn resistance(number: u32) -> WarInfo {
    WarInfo {
        resistance_start_time: Some(1_700_500_000_000),
        conquest_end_time: Some(1_700_500_000_000),
        ..war(number)
    }
}

fn timeout(what: &str) -> ApiError {
    ApiError::Timeout {
        url: format!("http://test/{what}"),
    }
}

fn town(x: f64, team: &str) -> MapItem {
    MapItem {
        icon_type: 56,
        x,
        y: 0.5,
        team_id: Team::from(team),
    }
}

fn clock() -> ManualClock {
    ManualClock::new(
        Utc.timestamp_opt(1_700_003_600, 0)
            .single()
            .expect("valid timestamp"),
    )
}

fn tracker(api: ScriptedApi) -> Tracker<ScriptedApi, MemorySink, ManualClock> {
    Tracker::new(api, MemorySink::new(), clock(), Duration::from_secs(20))
}

fn completed(outcome: CycleOutcome) -> foxlog_tracker::CycleReport {
    match outcome {
        CycleOutcome::Completed(report) => report,
        other => panic!("expected completed cycle, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resistance_at_start_fetches_no_maps() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(resistance(100)));
    let mut tracker = tracker(api);

    assert_eq!(tracker.run().await.expect("run"), Halt::ResistanceAtStart);
    assert_eq!(tracker.api().map_fetches(), 0);
    assert!(tracker.sink().wars.is_empty());
    assert!(tracker.session().is_none());
}

#[tokio::test]
async fn capture_emits_single_event() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(war(100)))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "WARDENS"), town(0.2, "NONE")]))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "COLONIALS"), town(0.2, "NONE")]));
    let mut tracker = tracker(api);

    assert_eq!(
        tracker.start().await.expect("start"),
        StartOutcome::Tracking {
            war_number: 100,
            maps: 1
        }
    );
    assert_eq!(completed(tracker.run_cycle().await.expect("cycle")).events_written, 0);
    let report = completed(tracker.run_cycle().await.expect("cycle"));
    assert_eq!(report.events_written, 1);

    let events = &tracker.sink().events;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].map_name, "DeadLandsHex");
    assert_eq!(events[0].previous_team, Team::Wardens);
    assert_eq!(events[0].current_team, Team::Colonials);
    assert_eq!(events[0].icon_category, "Town Base 1");
    assert_eq!(events[0].war_time, "0d 01h 00m");
    assert_eq!(tracker.sink().wars, [100]);
}

#[tokio::test]
async fn new_war_resets_state_and_retargets_sink() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(war(100)))
        .war(Ok(war(100)))
        .war(Ok(war(101)))
        .war(Ok(war(101)))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "WARDENS")]))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "COLONIALS")]))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "WARDENS")]));
    let mut tracker = tracker(api);
    tracker.start().await.expect("start");

    completed(tracker.run_cycle().await.expect("baseline"));

    // Owner changed, but the war changed too: fresh baseline, no event.
    let report = completed(tracker.run_cycle().await.expect("new war"));
    assert_eq!(report.replaced_war, Some(100));
    assert_eq!(report.war_number, 101);
    assert_eq!(report.events_written, 0);
    assert_eq!(tracker.sink().wars, [100, 101]);

    let report = completed(tracker.run_cycle().await.expect("after reset"));
    assert_eq!(report.events_written, 1);
    assert_eq!(tracker.sink().events[0].war_number, 101);
    assert_eq!(tracker.sink().events[0].war_id, WarId("war-101".into()));
}

#[tokio::test]
async fn failing_map_does_not_block_others() {
    let api = ScriptedApi::new(&["AHex", "BHex", "CHex"]);
    api.war(Ok(war(100)));
    for map in ["AHex", "BHex", "CHex"] {
        api.snapshot(map, Ok(vec![town(0.1, "WARDENS")]));
    }
    api.snapshot("AHex", Ok(vec![town(0.1, "COLONIALS")]))
        .snapshot("BHex", Err(timeout("BHex")))
        .snapshot("CHex", Ok(vec![town(0.1, "COLONIALS")]))
        .snapshot("BHex", Ok(vec![town(0.1, "COLONIALS")]));
    let mut tracker = tracker(api);
    tracker.start().await.expect("start");
    completed(tracker.run_cycle().await.expect("baseline"));

    let report = completed(tracker.run_cycle().await.expect("cycle"));
    assert_eq!(report.failed_maps, ["BHex"]);
    assert_eq!(report.maps_polled, 2);
    assert_eq!(report.events_written, 2);
    let maps: Vec<&str> = tracker.sink().events.iter().map(|e| e.map_name.as_str()).collect();
    assert_eq!(maps, ["AHex", "CHex"]);

    // B kept its retained state through the failure.
    let report = completed(tracker.run_cycle().await.expect("recovery"));
    assert_eq!(report.events_written, 1);
    assert_eq!(tracker.sink().events[2].map_name, "BHex");
    assert_eq!(tracker.sink().events[2].previous_team, Team::Wardens);
}

#[tokio::test]
async fn war_info_failure_skips_without_reset() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(war(100)))
        .war(Ok(war(100)))
        .war(Err(timeout("war")))
        .war(Err(ApiError::MalformedResponse {
            url: "http://test/war".into(),
            reason: "missing warNumber".into(),
        }))
        .war(Ok(war(100)))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "WARDENS")]))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "COLONIALS")]));
    let mut tracker = tracker(api);
    tracker.start().await.expect("start");
    completed(tracker.run_cycle().await.expect("baseline"));

    for _ in 0..2 {
        let outcome = tracker.run_cycle().await.expect("cycle");
        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::WarInfoUnavailable(_))
        ));
    }
    assert_eq!(tracker.api().map_fetches(), 1);

    let report = completed(tracker.run_cycle().await.expect("cycle"));
    assert_eq!(report.replaced_war, None);
    assert_eq!(report.events_written, 1);
}

#[tokio::test]
async fn new_war_waits_for_its_map_list() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(war(100)))
        .war(Ok(war(101)))
        .war(Ok(war(101)))
        .maps(Ok(vec!["DeadLandsHex".into()]))
        .maps(Err(timeout("maps")))
        .maps(Ok(vec!["DeadLandsHex".into(), "TheFingersHex".into()]));
    let mut tracker = tracker(api);
    tracker.start().await.expect("start");

    let outcome = tracker.run_cycle().await.expect("cycle");
    assert!(matches!(
        outcome,
        CycleOutcome::Skipped(SkipReason::MapListUnavailable(_))
    ));
    assert_eq!(tracker.session().map(|s| s.war.war_number), Some(100));

    let report = completed(tracker.run_cycle().await.expect("cycle"));
    assert_eq!(report.replaced_war, Some(100));
    assert_eq!(report.maps_polled, 2);
    assert_eq!(
        tracker.session().map(|s| s.engine.maps().to_vec()),
        Some(vec!["DeadLandsHex".to_string(), "TheFingersHex".to_string()])
    );
}

#[tokio::test]
async fn run_polls_until_resistance() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(war(100)))
        .war(Ok(war(100)))
        .war(Ok(war(100)))
        .war(Err(timeout("war")))
        .war(Ok(resistance(100)))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "WARDENS")]))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "COLONIALS")]));
    let mut tracker = tracker(api);

    assert_eq!(tracker.run().await.expect("run"), Halt::ResistancePhase);
    assert_eq!(tracker.clock().sleeps(), 3);
    assert_eq!(tracker.api().map_fetches(), 2);
    assert_eq!(tracker.sink().events.len(), 1);
    // Events are stamped with simulated time.
    assert_eq!(tracker.sink().events[0].war_time, "0d 01h 00m");
}

#[tokio::test]
async fn startup_failure_is_fatal() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Err(timeout("war")));
    let mut tracker = tracker(api);

    let err = tracker.run().await.expect_err("should fail");
    assert!(matches!(err, TrackerError::Startup(ApiError::Timeout { .. })));
}

#[tokio::test]
async fn persistence_failure_is_fatal() {
    let api = ScriptedApi::new(&["DeadLandsHex"]);
    api.war(Ok(war(100)))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "WARDENS")]))
        .snapshot("DeadLandsHex", Ok(vec![town(0.1, "COLONIALS")]));
    let mut tracker = Tracker::new(api, BrokenSink, clock(), Duration::from_secs(20));

    let err = tracker.run().await.expect_err("should fail");
    assert!(matches!(err, TrackerError::Persistence(_)));
}

#[tokio::test]
async fn cycle_before_start_is_skipped() {
    let mut tracker = tracker(ScriptedApi::new(&["DeadLandsHex"]));
    let outcome = tracker.run_cycle().await.expect("cycle");
    assert!(matches!(outcome, CycleOutcome::Skipped(SkipReason::NotStarted)));
}

#[tokio::test]
async fn events_land_in_per_war_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let api = ScriptedApi::new(&["TheFingersHex"]);
    let unknown = |team: &str| MapItem {
        icon_type: 999,
        x: 0.3,
        y: 0.7,
        team_id: Team::from(team),
    };
    api.war(Ok(war(117)))
        .snapshot("TheFingersHex", Ok(vec![unknown("NONE")]))
        .snapshot("TheFingersHex", Ok(vec![unknown("WARDENS")]));
    let sink = CsvEventSink::new(dir.path());
    let path = sink.path_for(117);
    let mut tracker = Tracker::new(api, sink, clock(), Duration::from_secs(20));

    tracker.start().await.expect("start");
    assert!(path.exists());
    completed(tracker.run_cycle().await.expect("baseline"));
    completed(tracker.run_cycle().await.expect("capture"));

    let mut reader = csv::Reader::from_path(&path).expect("open");
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][4], "117");
    assert_eq!(&rows[0][6], "999");
    assert_eq!(&rows[0][7], "Unknown");
    assert_eq!(&rows[0][8], "NONE");
    assert_eq!(&rows[0][9], "WARDENS");
}
