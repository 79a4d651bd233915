//! Content loading and validation shared between rail_cli and rail_daemon.

use anyhow::{bail, ensure, Context, Result};
use rail_core::{Constants, Coord, Network, SimContent, StartConfig};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn validate_coord(what: &str, coord: Coord) -> Result<()> {
    ensure!(
        coord.lat.is_finite() && (-90.0..=90.0).contains(&coord.lat),
        "{what} latitude {} is out of range",
        coord.lat,
    );
    ensure!(
        coord.lng.is_finite() && (-180.0..=180.0).contains(&coord.lng),
        "{what} longitude {} is out of range",
        coord.lng,
    );
    Ok(())
}

/// Checks the station map for authoring errors.
///
/// Catches mistakes like: duplicate station names, coordinates off the globe,
/// or a redirect that points at (or from) a station that doesn't exist.
pub fn validate_network(network: &Network) -> Result<()> {
    ensure!(!network.stations.is_empty(), "network has no stations");
    validate_coord("anchor", network.anchor)?;

    let mut names: HashSet<&str> = HashSet::new();
    for station in &network.stations {
        ensure!(!station.name.trim().is_empty(), "station has an empty name");
        ensure!(
            names.insert(station.name.as_str()),
            "duplicate station '{}'",
            station.name,
        );
        validate_coord(&format!("station '{}'", station.name), station.coord)?;
    }

    for (from, to) in &network.redirects {
        ensure!(
            names.contains(from.as_str()),
            "redirect from unknown station '{from}'",
        );
        ensure!(
            names.contains(to.as_str()),
            "redirect from '{from}' targets unknown station '{to}'",
        );
        if from == to {
            bail!("station '{from}' redirects to itself");
        }
    }
    Ok(())
}

/// Range checks for simulation constants.
pub fn validate_constants(constants: &Constants) -> Result<()> {
    for (name, speed) in [
        ("speed_time", constants.speed_time),
        ("speed_distance", constants.speed_distance),
        ("speed_cost", constants.speed_cost),
    ] {
        ensure!(
            speed.is_finite() && speed > 0.0,
            "{name} must be positive, got {speed}"
        );
    }
    ensure!(
        (0.0..1.0).contains(&constants.speed_jitter),
        "speed_jitter must be in [0, 1), got {}",
        constants.speed_jitter,
    );
    ensure!(
        constants.fuel_litres_per_km >= 0.0 && constants.diesel_price_per_litre >= 0.0,
        "fuel and price constants must be non-negative",
    );
    ensure!(
        constants.max_step_seconds > 0.0,
        "max_step_seconds must be positive, got {}",
        constants.max_step_seconds,
    );
    ensure!(
        constants.path_history_len > 0,
        "path_history_len must be at least 1",
    );
    Ok(())
}

/// Loads `network.json` and `constants.json` from `content_dir` and validates both.
pub fn load_content(content_dir: &str) -> Result<SimContent> {
    let dir = Path::new(content_dir);
    let network: Network = read_json(&dir.join("network.json"))?;
    let constants: Constants = read_json(&dir.join("constants.json"))?;
    validate_network(&network).context("validating network.json")?;
    validate_constants(&constants).context("validating constants.json")?;
    Ok(SimContent { network, constants })
}

/// Loads a run configuration (the `/start` request body) from a JSON file.
pub fn load_start_config(path: &Path) -> Result<StartConfig> {
    read_json(path)
}
