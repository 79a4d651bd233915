//! Great-circle helpers. Pure functions, no state.

use crate::Coord;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(a: Coord, b: Coord) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();
    let x = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * x.sqrt().asin()
}

/// Straight-line interpolation in lat/lng space. `t = 0` is `from`, `t = 1` is `to`.
pub fn interpolate(from: Coord, to: Coord, t: f64) -> Coord {
    Coord {
        lat: from.lat + (to.lat - from.lat) * t,
        lng: from.lng + (to.lng - from.lng) * t,
    }
}
