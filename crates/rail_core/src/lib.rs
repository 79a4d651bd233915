//! Train movement, hazard redirection, and run metrics for the rail simulation.
//!
//! No IO, no network. All randomness via the passed-in Rng; all time via the
//! passed-in `Instant` or delta.

mod engine;
pub mod factory;
pub mod geo;
mod id;
pub mod metrics;
pub mod redirect;
mod session;
mod types;

pub use engine::advance;
pub use factory::{build_train, init_trains_from_config, speed_for_utility};
pub use geo::haversine_km;
pub use id::{generate_run_id, RunId};
pub use metrics::{efficiency_score, RunMetrics, TrainMetrics};
pub use redirect::{nearest_safe_station, resolve_destination};
pub use session::{Session, StatusReport};
pub use types::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

#[cfg(test)]
mod tests;
