//! Shared test fixtures for rail_core and downstream crates.
//!
//! `pakistan_network()` mirrors the shipped `content/network.json`;
//! `base_constants()` mirrors `content/constants.json`.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{Constants, Coord, Network, SimContent, Station};

fn station(name: &str, lat: f64, lng: f64) -> Station {
    Station {
        name: name.to_string(),
        coord: Coord::new(lat, lng),
    }
}

/// Seven stations, with paired redirects (Islamabad/Rawalpindi, KPK/Peer Swaha,
/// Lahore/Gujranwala) and Sindh → Gujranwala.
pub fn pakistan_network() -> Network {
    Network {
        network_version: "test".to_string(),
        anchor: Coord::new(30.65, 70.68),
        stations: vec![
            station("KPK station", 34.015, 71.524),
            station("Peer Swaha", 33.600, 72.900),
            station("Islamabad Station", 33.738, 73.084),
            station("Rawalpindi", 33.626_057, 73.071_442),
            station("Lahore", 31.514, 74.354),
            station("Gujranwala", 32.187, 74.194),
            station("Sindh", 24.860, 67.001),
        ],
        redirects: BTreeMap::from(
            [
                ("Islamabad Station", "Rawalpindi"),
                ("Rawalpindi", "Islamabad Station"),
                ("KPK station", "Peer Swaha"),
                ("Peer Swaha", "KPK station"),
                ("Lahore", "Gujranwala"),
                ("Gujranwala", "Lahore"),
                ("Sindh", "Gujranwala"),
            ]
            .map(|(from, to)| (from.to_string(), to.to_string())),
        ),
    }
}

pub fn base_constants() -> Constants {
    Constants {
        speed_time: 0.08,
        speed_distance: 0.055,
        speed_cost: 0.035,
        speed_jitter: 0.15,
        fuel_litres_per_km: 3.0,
        diesel_price_per_litre: 10.0,
        max_step_seconds: 0.5,
        path_history_len: 200,
    }
}

pub fn base_content() -> SimContent {
    SimContent {
        network: pakistan_network(),
        constants: base_constants(),
    }
}

/// Deterministic RNG seeded with 42.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
