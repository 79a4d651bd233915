//! The single simulation session: run lifecycle, hazards, and the pull-based clock.
//!
//! `Session` holds no content and no RNG; callers pass both in, the same way
//! they would for any other core operation. Time is injected as an `Instant`
//! so tests never touch the wall clock.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::advance;
use crate::factory::init_trains_from_config;
use crate::id::generate_run_id;
use crate::metrics::efficiency_score;
use crate::{
    Constants, Event, HazardSet, Network, RiskMode, RunId, RunMetrics, SimContent, StartConfig,
    Train, TrainSlot, UtilityMode,
};

/// Point-in-time summary of the session, as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub running: bool,
    pub active_trains: usize,
    pub total_distance: f64,
    pub ai_efficiency: f64,
    pub train_distances: BTreeMap<TrainSlot, f64>,
    pub train_times: BTreeMap<TrainSlot, f64>,
    pub train_costs: BTreeMap<TrainSlot, f64>,
    pub fire_alarms: Vec<String>,
    pub utility_mode: UtilityMode,
    pub risk_mode: RiskMode,
}

#[derive(Debug, Clone)]
pub struct Session {
    running: bool,
    last_update: Instant,
    trains: Vec<Train>,
    metrics: RunMetrics,
    hazards: HazardSet,
    utility_mode: UtilityMode,
    risk_mode: RiskMode,
    run_id: Option<RunId>,
    runs_started: u64,
}

impl Session {
    /// An idle session with no trains and no hazards.
    pub fn new(now: Instant) -> Self {
        Self {
            running: false,
            last_update: now,
            trains: Vec::new(),
            metrics: RunMetrics::default(),
            hazards: HazardSet::default(),
            utility_mode: UtilityMode::default(),
            risk_mode: RiskMode::default(),
            run_id: None,
            runs_started: 0,
        }
    }

    /// Replace the current run with a fresh one built from `config`.
    ///
    /// Slots that cannot be built are dropped; with no trains at all the
    /// session stays idle.
    pub fn start(
        &mut self,
        config: &StartConfig,
        content: &SimContent,
        rng: &mut impl Rng,
        now: Instant,
    ) -> Vec<Event> {
        self.utility_mode = config.utility_mode;
        self.risk_mode = config.risk_mode;
        self.trains = init_trains_from_config(config, &self.hazards, content, rng);
        self.running = !self.trains.is_empty();
        self.metrics = RunMetrics {
            efficiency: efficiency_score(self.utility_mode, self.risk_mode),
            ..RunMetrics::default()
        };
        self.last_update = now;

        let run_id = generate_run_id(rng);
        self.run_id = Some(run_id);
        self.runs_started += 1;

        vec![Event::RunStarted {
            run_id,
            trains: self.trains.iter().map(|train| train.slot).collect(),
        }]
    }

    /// Drop the current run. Hazards and policy modes are kept.
    pub fn reset(&mut self, now: Instant) {
        self.running = false;
        self.last_update = now;
        self.trains.clear();
        self.metrics = RunMetrics::default();
    }

    /// Raise or clear the alarm at `station`. Returns `false` for unknown
    /// stations, which are ignored.
    ///
    /// Trains already under way keep their destination.
    pub fn set_hazard(&mut self, station: &str, active: bool, network: &Network) -> bool {
        if !network.contains(station) {
            return false;
        }
        if active {
            self.hazards.insert(station);
        } else {
            self.hazards.remove(station);
        }
        true
    }

    /// Catch the simulation up to `now`.
    ///
    /// The elapsed time is clamped to `[0, max_step_seconds]`, so a long gap
    /// between queries yields one bounded step rather than a jump.
    pub fn advance_to(&mut self, now: Instant, constants: &Constants) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;
        self.step(elapsed, constants)
    }

    /// Advance by an explicit delta, clamped like `advance_to`. No-op when idle.
    pub fn step(&mut self, dt: f64, constants: &Constants) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        let dt = dt.clamp(0.0, constants.max_step_seconds.max(0.0));
        let mut events = advance(&mut self.trains, &mut self.metrics, constants, dt);

        if self.trains.iter().all(|train| train.completed) {
            self.running = false;
            events.push(Event::RunCompleted {
                run_id: self.run_id,
                total_distance_km: self.metrics.total_distance_km,
            });
        }
        events
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            running: self.running,
            active_trains: self.active_trains(),
            total_distance: self.metrics.total_distance_km,
            ai_efficiency: self.metrics.efficiency,
            train_distances: self.metrics.by_slot(|m| m.distance_km),
            train_times: self.metrics.by_slot(|m| m.time_s),
            train_costs: self.metrics.by_slot(|m| m.cost),
            fire_alarms: self.hazards.names(),
            utility_mode: self.utility_mode,
            risk_mode: self.risk_mode,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_trains(&self) -> usize {
        self.trains.iter().filter(|train| !train.completed).count()
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub fn hazards(&self) -> &HazardSet {
        &self.hazards
    }

    pub fn utility_mode(&self) -> UtilityMode {
        self.utility_mode
    }

    pub fn risk_mode(&self) -> RiskMode {
        self.risk_mode
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.run_id
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }
}
