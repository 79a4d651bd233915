use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single run, assigned at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Generate a deterministic v4-format run id from a seeded RNG.
pub fn generate_run_id(rng: &mut impl Rng) -> RunId {
    let bytes: [u8; 16] = rng.gen();
    RunId(uuid::Builder::from_random_bytes(bytes).into_uuid())
}
