use super::*;
use crate::test_fixtures::{base_content, make_rng};
use std::time::{Duration, Instant};

mod properties;

// --- Shared test helpers ------------------------------------------------

fn lahore_to_gujranwala() -> StartConfig {
    StartConfig {
        train1: TrainRequest::new("Lahore", "Gujranwala"),
        ..StartConfig::default()
    }
}

fn three_train_config() -> StartConfig {
    StartConfig {
        train1: TrainRequest::new("Lahore", "Gujranwala"),
        train2: TrainRequest::new("KPK station", "Islamabad Station"),
        train3: TrainRequest::new("Sindh", "Lahore"),
        ..StartConfig::default()
    }
}

/// Start `config` at `t0` and return the session.
fn started(config: &StartConfig, t0: Instant) -> Session {
    let content = base_content();
    let mut session = Session::new(t0);
    session.start(config, &content, &mut make_rng(), t0);
    session
}

/// Poll `advance_to` every `interval` until the run goes idle, up to `max_polls`.
fn run_to_completion(
    session: &mut Session,
    constants: &Constants,
    t0: Instant,
    interval: Duration,
    max_polls: u32,
) -> Instant {
    let mut now = t0;
    for _ in 0..max_polls {
        if !session.is_running() {
            break;
        }
        now += interval;
        session.advance_to(now, constants);
    }
    now
}
