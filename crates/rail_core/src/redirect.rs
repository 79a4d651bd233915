//! Hazard-aware destination resolution.

use crate::geo::haversine_km;
use crate::{HazardSet, Network};

/// Resolve the destination a train will actually head for.
///
/// A known, non-hazarded destination that differs from `start` is returned
/// unchanged. Anything else is redirected: first to the redirect-table
/// alternate, then to the nearest safe station. `None` when no station is left.
pub fn resolve_destination(
    requested: Option<&str>,
    start: &str,
    hazards: &HazardSet,
    network: &Network,
) -> Option<String> {
    if let Some(dest) = requested {
        if network.contains(dest) && dest != start && !hazards.contains(dest) {
            return Some(dest.to_string());
        }
    }

    if let Some(alternate) = requested.and_then(|dest| network.redirects.get(dest)) {
        if network.contains(alternate) && !hazards.contains(alternate) && alternate != start {
            return Some(alternate.clone());
        }
    }

    let mut exclude = vec![start];
    exclude.extend(requested);
    nearest_safe_station(&exclude, hazards, network)
}

/// The non-hazarded station closest to the network anchor, skipping `exclude`.
///
/// Ties keep the first station in network order.
pub fn nearest_safe_station(
    exclude: &[&str],
    hazards: &HazardSet,
    network: &Network,
) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for station in &network.stations {
        if exclude.contains(&station.name.as_str()) || hazards.contains(&station.name) {
            continue;
        }
        let d = haversine_km(station.coord, network.anchor);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((station.name.as_str(), d));
        }
    }
    best.map(|(name, _)| name.to_string())
}
