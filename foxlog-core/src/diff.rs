//! Ownership diffing between consecutive map snapshots.
//!
//! For every tracked map the engine retains the owner of each
//! [`EntityIdentity`] seen in the previous snapshot. Observing a new snapshot:
//!
//! 1. builds `identity → team` from the items (last item wins on collision),
//! 2. emits a [`Transition`] for every identity present in both snapshots
//!    whose team differs,
//! 3. replaces the retained mapping with the new one.
//!
//! First sightings establish a baseline and disappearances are dropped
//! silently; neither produces a transition.

use std::collections::HashMap;

use crate::types::{EntityIdentity, MapItem, Team};

/// A change of owner for one entity between two observed polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Map the entity lives on.
    pub map_name: String,
    /// Which entity changed hands.
    pub identity: EntityIdentity,
    /// Owner at the previous poll.
    pub previous: Team,
    /// Owner now.
    pub current: Team,
}

/// Retained `identity → team` mapping for a single map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerMapState {
    owners: HashMap<EntityIdentity, Team>,
}

impl PerMapState {
    /// Number of entities retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Last observed owner of `identity`.
    #[must_use]
    pub fn owner_of(&self, identity: &EntityIdentity) -> Option<&Team> {
        self.owners.get(identity)
    }
}

/// Tracking state of one map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MapState {
    /// No snapshot retained yet.
    #[default]
    Uninitialized,
    /// A snapshot has been observed.
    Tracking(PerMapState),
}

impl MapState {
    /// Retained mapping, if any.
    #[must_use]
    pub fn retained(&self) -> Option<&PerMapState> {
        match self {
            Self::Uninitialized => None,
            Self::Tracking(state) => Some(state),
        }
    }
}

/// Per-map retained ownership for a tracking session.
///
/// The engine is the sole owner of this state; nothing else mutates it.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    order: Vec<String>,
    maps: HashMap<String, MapState>,
}

impl DiffEngine {
    /// Start tracking `maps`, all uninitialised. Order is preserved.
    #[must_use]
    pub fn new<I, S>(maps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut engine = Self::default();
        engine.retarget(maps);
        engine
    }

    /// Tracked map names in the order they were registered.
    #[must_use]
    pub fn maps(&self) -> &[String] {
        &self.order
    }

    /// State of `map_name`, if tracked.
    #[must_use]
    pub fn state(&self, map_name: &str) -> Option<&MapState> {
        self.maps.get(map_name)
    }

    /// Forget every retained snapshot, keeping the tracked map list.
    pub fn reset(&mut self) {
        for state in self.maps.values_mut() {
            *state = MapState::Uninitialized;
        }
    }

    /// Replace the tracked map list. All retained state is dropped.
    pub fn retarget<I, S>(&mut self, maps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order.clear();
        self.maps.clear();
        for name in maps {
            let name = name.into();
            if self.maps.insert(name.clone(), MapState::Uninitialized).is_none() {
                self.order.push(name);
            }
        }
    }

    /// Compare a fresh snapshot of `map_name` with the retained one and
    /// return the ownership changes, in snapshot order.
    ///
    /// An untracked map is added to the end of the tracked list and its
    /// snapshot becomes the baseline.
    pub fn observe(&mut self, map_name: &str, items: &[MapItem]) -> Vec<Transition> {
        let mut current: HashMap<EntityIdentity, Team> = HashMap::with_capacity(items.len());
        let mut seen_order: Vec<EntityIdentity> = Vec::with_capacity(items.len());
        for item in items {
            let identity = item.identity();
            if current.insert(identity, item.team_id.clone()).is_none() {
                seen_order.push(identity);
            }
        }

        if !self.maps.contains_key(map_name) {
            self.order.push(map_name.to_string());
        }
        let state = self.maps.entry(map_name.to_string()).or_default();

        let transitions = match state.retained() {
            None => Vec::new(),
            Some(previous) => seen_order
                .iter()
                .filter_map(|identity| {
                    let before = previous.owner_of(identity)?;
                    let now = &current[identity];
                    (before != now).then(|| Transition {
                        map_name: map_name.to_string(),
                        identity: *identity,
                        previous: before.clone(),
                        current: now.clone(),
                    })
                })
                .collect(),
        };

        *state = MapState::Tracking(PerMapState { owners: current });
        transitions
    }
}
