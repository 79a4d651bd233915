//! Train construction from a run configuration.

use std::collections::VecDeque;

use rand::Rng;

use crate::redirect::resolve_destination;
use crate::{Constants, HazardSet, SimContent, StartConfig, Train, TrainSlot, UtilityMode};

/// Front ends send the literal string `"None"` for an unselected station.
const DISABLED: &str = "None";

fn selected(name: Option<&str>) -> Option<&str> {
    name.filter(|name| !name.is_empty() && *name != DISABLED)
}

/// Base speed for `mode` with uniform relative jitter applied.
pub fn speed_for_utility(mode: UtilityMode, constants: &Constants, rng: &mut impl Rng) -> f64 {
    let base = match mode {
        UtilityMode::Time => constants.speed_time,
        UtilityMode::Distance => constants.speed_distance,
        UtilityMode::Cost => constants.speed_cost,
    };
    let j = constants.speed_jitter.abs();
    let jitter = rng.gen_range(-j..=j);
    base * (1.0 + jitter)
}

/// Build one train, or `None` if the slot is disabled or cannot be routed.
///
/// The destination goes through hazard redirection; the start station does not.
pub fn build_train(
    slot: TrainSlot,
    start: Option<&str>,
    dest: Option<&str>,
    mode: UtilityMode,
    hazards: &HazardSet,
    content: &SimContent,
    rng: &mut impl Rng,
) -> Option<Train> {
    let network = &content.network;
    let start_station = selected(start).filter(|name| network.contains(name))?;
    let requested = selected(dest)?;
    let dest_station = resolve_destination(Some(requested), start_station, hazards, network)?;

    let start = network.coord(start_station)?;
    let dest = network.coord(&dest_station)?;

    Some(Train {
        slot,
        start_station: start_station.to_string(),
        dest_station,
        position: start,
        start,
        dest,
        progress: 0.0,
        speed: speed_for_utility(mode, &content.constants, rng),
        color: slot.color().to_string(),
        completed: false,
        path: VecDeque::from([start]),
    })
}

/// Build every slot in `TrainSlot::ALL` order, skipping slots that fail.
pub fn init_trains_from_config(
    config: &StartConfig,
    hazards: &HazardSet,
    content: &SimContent,
    rng: &mut impl Rng,
) -> Vec<Train> {
    TrainSlot::ALL
        .into_iter()
        .filter_map(|slot| {
            let request = config.request(slot);
            build_train(
                slot,
                request.start.as_deref(),
                request.dest.as_deref(),
                config.utility_mode,
                hazards,
                content,
                rng,
            )
        })
        .collect()
}
