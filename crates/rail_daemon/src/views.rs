//! JSON shapes served to the map front end.

use rail_core::{Coord, Session, SimContent, Train, TrainSlot};
use serde::{Serialize, Serializer};

fn pair(coord: Coord) -> (f64, f64) {
    (coord.lat, coord.lng)
}

#[derive(Debug, Serialize)]
pub struct TrainView {
    pub name: TrainSlot,
    pub start_city: String,
    pub dest_city: String,
    pub lat: f64,
    pub lng: f64,
    pub start_lat: f64,
    pub start_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
    pub progress: f64,
    pub speed: f64,
    pub color: String,
    pub completed: bool,
    pub latlng: (f64, f64),
    pub path: Vec<(f64, f64)>,
    pub elapsed_time: f64,
    pub cost: f64,
}

impl TrainView {
    fn new(train: &Train, session: &Session) -> Self {
        let metrics = session.metrics().train(train.slot);
        Self {
            name: train.slot,
            start_city: train.start_station.clone(),
            dest_city: train.dest_station.clone(),
            lat: train.position.lat,
            lng: train.position.lng,
            start_lat: train.start.lat,
            start_lng: train.start.lng,
            dest_lat: train.dest.lat,
            dest_lng: train.dest.lng,
            progress: train.progress,
            speed: train.speed,
            color: train.color.clone(),
            completed: train.completed,
            latlng: pair(train.position),
            path: train.path.iter().copied().map(pair).collect(),
            elapsed_time: metrics.time_s,
            cost: metrics.cost,
        }
    }
}

/// Writes `(name, coord)` pairs as a JSON object, keeping network order.
fn ordered_map<S: Serializer>(
    pairs: &[(String, (f64, f64))],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(name, coord)| (name, coord)))
}

#[derive(Debug, Serialize)]
pub struct TrainsView {
    #[serde(serialize_with = "ordered_map")]
    pub cities: Vec<(String, (f64, f64))>,
    pub trains: Vec<TrainView>,
    pub fire_alarms: Vec<String>,
}

impl TrainsView {
    pub fn new(session: &Session, content: &SimContent) -> Self {
        Self {
            cities: content
                .network
                .stations
                .iter()
                .map(|station| (station.name.clone(), pair(station.coord)))
                .collect(),
            trains: session
                .trains()
                .iter()
                .map(|train| TrainView::new(train, session))
                .collect(),
            fire_alarms: session.hazards().names(),
        }
    }
}
