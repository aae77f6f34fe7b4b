//! SurgeGen: a time-bounded UDP/TCP traffic generator.
//!
//! For a configured duration, one worker per protocol slot pushes fixed-size
//! buffers at the target as fast as the socket accepts them. Every worker
//! accounts the bytes it managed to send and prints a per-worker summary
//! with the metered tariff. An optional helper script runs alongside the
//! workers and has its output captured and reported.

pub mod cli;
pub mod engine;
pub mod expiry;
pub mod script;

pub use engine::pool::{run, RunReport};
pub use engine::transport::Protocol;
pub use engine::worker::{WorkerOutcome, WorkerResult};
