use super::*;
use rand::Rng;

#[test]
fn progress_stays_in_unit_interval_and_never_decreases() {
    let content = base_content();
    let t0 = Instant::now();
    let mut session = started(&three_train_config(), t0);
    let mut jitter = make_rng();
    let mut previous: Vec<f64> = session.trains().iter().map(|t| t.progress).collect();
    let mut now = t0;

    for _ in 0..400 {
        now += Duration::from_millis(jitter.gen_range(0..900));
        session.advance_to(now, &content.constants);
        for (train, prev) in session.trains().iter().zip(previous.iter_mut()) {
            assert!((0.0..=1.0).contains(&train.progress));
            assert!(train.progress >= *prev);
            *prev = train.progress;
        }
    }
}

#[test]
fn history_never_exceeds_limit_and_ends_at_position() {
    let mut content = base_content();
    content.constants.path_history_len = 5;
    let t0 = Instant::now();
    let mut session = Session::new(t0);
    session.start(&three_train_config(), &content, &mut make_rng(), t0);
    let mut now = t0;

    for _ in 0..50 {
        now += Duration::from_millis(100);
        session.advance_to(now, &content.constants);
        for train in session.trains() {
            assert!(train.path.len() <= 5);
            assert_eq!(train.path.back(), Some(&train.position));
        }
    }
}

#[test]
fn distance_converges_to_route_length() {
    let content = base_content();
    let t0 = Instant::now();
    let mut session = started(&lahore_to_gujranwala(), t0);
    let train = session.trains()[0].clone();
    let route_km = haversine_km(train.start, train.dest);

    run_to_completion(
        &mut session,
        &content.constants,
        t0,
        Duration::from_millis(100),
        10_000,
    );

    let travelled = session.metrics().train(TrainSlot::One).distance_km;
    // The arrival tick charges the full nominal step, so the overshoot is at
    // most one step's worth of route.
    let max_overshoot = route_km * train.speed * content.constants.max_step_seconds;
    assert!(travelled >= route_km - 1e-9, "{travelled} < {route_km}");
    assert!(travelled <= route_km + max_overshoot, "{travelled} overshoots {route_km}");
    assert!((session.metrics().total_distance_km - travelled).abs() < 1e-9);
}

#[test]
fn metrics_never_decrease_while_running() {
    let content = base_content();
    let t0 = Instant::now();
    let mut session = started(&three_train_config(), t0);
    let mut last = session.metrics().clone();
    let mut now = t0;

    while session.is_running() {
        now += Duration::from_millis(300);
        session.advance_to(now, &content.constants);
        let current = session.metrics();
        assert!(current.total_distance_km >= last.total_distance_km);
        for slot in TrainSlot::ALL {
            let (a, b) = (last.train(slot), current.train(slot));
            assert!(b.distance_km >= a.distance_km);
            assert!(b.time_s >= a.time_s);
            assert!(b.cost >= a.cost);
        }
        last = current.clone();
    }
}

#[test]
fn same_seed_same_run() {
    let t0 = Instant::now();
    let a = started(&three_train_config(), t0);
    let b = started(&three_train_config(), t0);
    let speeds_a: Vec<f64> = a.trains().iter().map(|t| t.speed).collect();
    let speeds_b: Vec<f64> = b.trains().iter().map(|t| t.speed).collect();
    assert_eq!(speeds_a, speeds_b);
    assert_eq!(a.run_id(), b.run_id());
    assert_eq!(a.trains().len(), 3);
}
