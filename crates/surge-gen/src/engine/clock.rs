use std::time::{Duration, Instant};

/// Computes the absolute instant at which a run starting at `start` must stop.
pub fn deadline_after(start: Instant, duration: Duration) -> Instant {
    start + duration
}

/// True once `deadline` has passed; the loop-continuation check for workers.
pub fn reached(deadline: Instant) -> bool {
    Instant::now() >= deadline
}
