use crate::geo::{haversine_km, interpolate};
use crate::{Constants, Event, RunMetrics, Train};

/// Advance every moving train by `dt` seconds.
///
/// For each non-completed train:
/// 1. Move progress forward by `speed * dt`, clamping to 1.0 (arrival).
/// 2. Place the train on the straight line between start and destination.
/// 3. Charge the covered fraction of the full route length to distance,
///    time, and fuel cost.
/// 4. Record the new position in the bounded path history.
///
/// Completed trains are skipped entirely. Returns one `TrainArrived` per
/// train that reached its destination during this step.
pub fn advance(
    trains: &mut [Train],
    metrics: &mut RunMetrics,
    constants: &Constants,
    dt: f64,
) -> Vec<Event> {
    let mut events = Vec::new();
    let mut total_step_km = 0.0;

    for train in trains.iter_mut().filter(|train| !train.completed) {
        let fraction = train.speed * dt;

        train.progress += fraction;
        if train.progress >= 1.0 {
            train.progress = 1.0;
            train.completed = true;
        }
        train.position = interpolate(train.start, train.dest, train.progress);

        // Charged on the nominal fraction, so the arrival tick may overshoot
        // the route length slightly.
        let step_km = haversine_km(train.start, train.dest) * fraction;
        total_step_km += step_km;

        let train_metrics = metrics.train_mut(train.slot);
        train_metrics.distance_km += step_km;
        train_metrics.time_s += dt;
        train_metrics.cost +=
            step_km * constants.fuel_litres_per_km * constants.diesel_price_per_litre;

        push_bounded(train, constants.path_history_len);

        if train.completed {
            events.push(Event::TrainArrived {
                slot: train.slot,
                station: train.dest_station.clone(),
            });
        }
    }

    metrics.total_distance_km += total_step_km;
    events
}

fn push_bounded(train: &mut Train, limit: usize) {
    train.path.push_back(train.position);
    while train.path.len() > limit.max(1) {
        train.path.pop_front();
    }
}
