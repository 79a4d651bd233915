//! Per-run accumulated metrics and the derived efficiency score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{RiskMode, TrainSlot, UtilityMode};

const EFFICIENCY_BASE: f64 = 0.80;
const EFFICIENCY_CAP: f64 = 0.99;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainMetrics {
    pub distance_km: f64,
    /// Seconds the train has been moving.
    pub time_s: f64,
    /// PKR.
    pub cost: f64,
}

/// Cumulative figures for the current run. Every slot always has an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub per_train: BTreeMap<TrainSlot, TrainMetrics>,
    pub total_distance_km: f64,
    pub efficiency: f64,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self {
            per_train: TrainSlot::ALL
                .into_iter()
                .map(|slot| (slot, TrainMetrics::default()))
                .collect(),
            total_distance_km: 0.0,
            efficiency: 0.0,
        }
    }
}

impl RunMetrics {
    pub fn train(&self, slot: TrainSlot) -> TrainMetrics {
        self.per_train.get(&slot).copied().unwrap_or_default()
    }

    pub fn train_mut(&mut self, slot: TrainSlot) -> &mut TrainMetrics {
        self.per_train.entry(slot).or_default()
    }

    /// Project one field of every slot into a `slot → value` map.
    pub fn by_slot(&self, field: impl Fn(&TrainMetrics) -> f64) -> BTreeMap<TrainSlot, f64> {
        self.per_train
            .iter()
            .map(|(slot, metrics)| (*slot, field(metrics)))
            .collect()
    }
}

/// Derived "AI efficiency" for a policy pair, clamped to `[0, 0.99]`.
pub fn efficiency_score(utility: UtilityMode, risk: RiskMode) -> f64 {
    let risk_bonus = match risk {
        RiskMode::Safety => 0.10,
        RiskMode::Comfort => 0.05,
    };
    let utility_bonus = match utility {
        UtilityMode::Time => 0.03,
        UtilityMode::Distance => 0.0,
        UtilityMode::Cost => -0.02,
    };
    (EFFICIENCY_BASE + risk_bonus + utility_bonus).clamp(0.0, EFFICIENCY_CAP)
}
