use parking_lot::Mutex;
use rail_core::{Event, Session, SimContent};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;

pub struct SimState {
    pub session: Session,
    pub content: SimContent,
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl SimState {
    pub fn new(content: SimContent, rng: ChaCha8Rng, seed: u64) -> Self {
        Self {
            session: Session::new(Instant::now()),
            content,
            rng,
            seed,
        }
    }

    /// Catch the session up to the wall clock, logging whatever happened.
    pub fn advance_now(&mut self) {
        let events = self
            .session
            .advance_to(Instant::now(), &self.content.constants);
        log_events(&events);
    }
}

pub fn log_events(events: &[Event]) {
    for event in events {
        tracing::info!("{event}");
    }
}

pub type SharedSim = Arc<Mutex<SimState>>;

#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSim,
}
