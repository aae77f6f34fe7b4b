use std::time::{Duration, Instant};
use surge_common::MAX_DURATION_SECS;
use surge_gen::engine::clock;

#[test]
fn test_deadline_is_start_plus_duration() {
    let start = Instant::now();
    let deadline = clock::deadline_after(start, Duration::from_secs(30));
    assert_eq!(deadline - start, Duration::from_secs(30));
}

#[test]
fn test_future_deadline_is_not_reached() {
    let deadline = clock::deadline_after(Instant::now(), Duration::from_secs(3600));
    assert!(!clock::reached(deadline));
}

#[test]
fn test_elapsed_deadline_is_reached() {
    // A zero-length run is over the moment it starts.
    let deadline = clock::deadline_after(Instant::now(), Duration::ZERO);
    assert!(clock::reached(deadline));
}

#[test]
fn test_deadline_for_the_longest_allowed_run_is_computable() {
    let deadline = clock::deadline_after(Instant::now(), Duration::from_secs(MAX_DURATION_SECS));
    assert!(!clock::reached(deadline));
}
