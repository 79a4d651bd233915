//! Type definitions for `rail_core`.
//!
//! All public types used by the simulation: content (network + constants),
//! run configuration, train state, and events.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::RunId;

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A point on the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

/// One of the three fixed train slots a run can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainSlot {
    #[serde(rename = "Train 1")]
    One,
    #[serde(rename = "Train 2")]
    Two,
    #[serde(rename = "Train 3")]
    Three,
}

impl TrainSlot {
    /// Build order. Trains are constructed and reported in this order.
    pub const ALL: [TrainSlot; 3] = [TrainSlot::One, TrainSlot::Two, TrainSlot::Three];

    pub fn name(self) -> &'static str {
        match self {
            TrainSlot::One => "Train 1",
            TrainSlot::Two => "Train 2",
            TrainSlot::Three => "Train 3",
        }
    }

    /// Map colour tag used by the front end.
    pub fn color(self) -> &'static str {
        match self {
            TrainSlot::One => "#ef4444",
            TrainSlot::Two => "#22c55e",
            TrainSlot::Three => "#3b82f6",
        }
    }
}

impl std::fmt::Display for TrainSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the operator optimises for. Drives the base train speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilityMode {
    #[default]
    Time,
    Distance,
    Cost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskMode {
    #[default]
    Safety,
    Comfort,
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    #[serde(flatten)]
    pub coord: Coord,
}

/// The fixed station map: ordered stations plus the hazard redirect table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub network_version: String,
    /// Reference point for the nearest-safe-station fallback. Only used to
    /// give the fallback a deterministic ordering.
    pub anchor: Coord,
    /// Order matters: ties in the nearest-safe search keep the earlier station.
    pub stations: Vec<Station>,
    /// Preferred alternate for a hazarded destination.
    #[serde(default)]
    pub redirects: BTreeMap<String, String>,
}

impl Network {
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.name == name)
    }

    pub fn coord(&self, name: &str) -> Option<Coord> {
        self.station(name).map(|station| station.coord)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.station(name).is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    /// Base progress fraction per second for `UtilityMode::Time`.
    pub speed_time: f64,
    pub speed_distance: f64,
    pub speed_cost: f64,
    /// Relative jitter applied to the base speed, uniform in `[-j, +j]`.
    pub speed_jitter: f64,
    pub fuel_litres_per_km: f64,
    /// PKR per litre.
    pub diesel_price_per_litre: f64,
    /// Upper bound on a single simulation step, in seconds.
    pub max_step_seconds: f64,
    pub path_history_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimContent {
    pub network: Network,
    pub constants: Constants,
}

// ---------------------------------------------------------------------------
// Hazards
// ---------------------------------------------------------------------------

/// Stations currently under a fire alarm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HazardSet(BTreeSet<String>);

impl HazardSet {
    pub fn contains(&self, station: &str) -> bool {
        self.0.contains(station)
    }

    pub fn insert(&mut self, station: impl Into<String>) -> bool {
        self.0.insert(station.into())
    }

    pub fn remove(&mut self, station: &str) -> bool {
        self.0.remove(station)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted station names.
    pub fn names(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for HazardSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Requested route for one slot. A missing (or `"None"`) destination disables the slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub dest: Option<String>,
}

impl TrainRequest {
    pub fn new(start: &str, dest: &str) -> Self {
        Self {
            start: Some(start.to_string()),
            dest: Some(dest.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConfig {
    #[serde(default)]
    pub train1: TrainRequest,
    #[serde(default)]
    pub train2: TrainRequest,
    #[serde(default)]
    pub train3: TrainRequest,
    #[serde(default)]
    pub utility_mode: UtilityMode,
    #[serde(default)]
    pub risk_mode: RiskMode,
}

impl StartConfig {
    pub fn request(&self, slot: TrainSlot) -> &TrainRequest {
        match slot {
            TrainSlot::One => &self.train1,
            TrainSlot::Two => &self.train2,
            TrainSlot::Three => &self.train3,
        }
    }
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub slot: TrainSlot,
    pub start_station: String,
    /// Resolved destination, after any hazard redirect.
    pub dest_station: String,
    pub position: Coord,
    pub start: Coord,
    pub dest: Coord,
    /// Fraction of the route covered, in `[0, 1]`.
    pub progress: f64,
    /// Progress fraction per second. Fixed for the whole run.
    pub speed: f64,
    pub color: String,
    pub completed: bool,
    /// Most recent positions, oldest first. Bounded by `Constants::path_history_len`.
    pub path: VecDeque<Coord>,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    RunStarted {
        run_id: RunId,
        trains: Vec<TrainSlot>,
    },
    TrainArrived {
        slot: TrainSlot,
        station: String,
    },
    RunCompleted {
        run_id: Option<RunId>,
        total_distance_km: f64,
    },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RunStarted { run_id, trains } => {
                write!(f, "run {run_id} started with {} train(s)", trains.len())
            }
            Self::TrainArrived { slot, station } => write!(f, "{slot} arrived at {station}"),
            Self::RunCompleted {
                run_id: Some(run_id),
                total_distance_km,
            } => write!(f, "run {run_id} completed after {total_distance_km:.1} km"),
            Self::RunCompleted {
                run_id: None,
                total_distance_km,
            } => write!(f, "run completed after {total_distance_km:.1} km"),
        }
    }
}
