//! Orchestrator: spawns the worker pool, holds the join barrier and produces
//! the run report.

use crate::engine::clock;
use crate::engine::tariff;
use crate::engine::transport::{self, Protocol};
use crate::engine::worker::{run_worker, WorkerContext, WorkerOutcome, WorkerResult};
use crate::script::{HelperOutput, HelperScript};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use surge_common::RunConfig;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Everything a finished run produced: one outcome per joined worker, the
/// helper-script resolution if one was launched, and the wall-clock elapsed
/// time. Per-worker reporting already happened by the time this exists; the
/// aggregate accessors serve logging and tests.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<WorkerOutcome>,
    pub helper: Option<io::Result<HelperOutput>>,
    pub elapsed: Duration,
}

impl RunReport {
    /// Results from workers that reached their send loop, partial ones
    /// included.
    pub fn results(&self) -> impl Iterator<Item = &WorkerResult> {
        self.outcomes.iter().filter_map(|outcome| outcome.result())
    }

    pub fn completed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, WorkerOutcome::Completed(_)))
            .count()
    }

    pub fn connect_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, WorkerOutcome::ConnectFailed { .. }))
            .count()
    }

    pub fn send_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, WorkerOutcome::SendFailed { .. }))
            .count()
    }

    pub fn total_bytes_sent(&self) -> u64 {
        self.results().map(|result| result.bytes_sent).sum()
    }

    pub fn total_tariff(&self) -> f64 {
        self.results().map(|result| result.tariff).sum()
    }
}

/// Runs one traffic generation pass to completion.
///
/// Computes the deadline once, spawns `workers` UDP workers and `workers` TCP
/// workers, launches the optional helper script alongside them, then blocks
/// on the join barrier: every spawned worker is awaited before anything is
/// reported as finished. The helper is resolved after the barrier so the
/// final completion line is printed last. Worker and helper failures are
/// contained in the report and never abort the run.
pub async fn run(
    config: RunConfig,
    script: Option<HelperScript>,
    cancel: CancellationToken,
) -> RunReport {
    let started = Instant::now();
    let deadline = clock::deadline_after(started, config.duration());
    info!(
        host = %config.host,
        port = config.port,
        duration_secs = config.duration_secs,
        workers = config.workers,
        "traffic run starting"
    );

    let ctx = WorkerContext {
        config: Arc::new(config),
        deadline,
        cancel,
        payload: transport::filler(),
    };

    let workers = ctx.config.workers;
    let mut handles = Vec::with_capacity(workers as usize * 2);
    for protocol in [Protocol::Udp, Protocol::Tcp] {
        for worker_id in 0..workers {
            handles.push(tokio::spawn(run_worker(ctx.clone(), worker_id, protocol)));
        }
    }

    // Launched after the workers, never part of their barrier.
    let helper_handle =
        script.map(|script| tokio::spawn(async move { script.execute_and_report().await }));

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(join_error) => {
                error!(error = %join_error, "worker task did not run to completion");
            }
        }
    }

    let helper = match helper_handle {
        Some(handle) => match handle.await {
            Ok(resolution) => Some(resolution),
            Err(join_error) => {
                error!(error = %join_error, "helper task did not run to completion");
                Some(Err(io::Error::new(io::ErrorKind::Other, join_error)))
            }
        },
        None => None,
    };

    let report = RunReport {
        outcomes,
        helper,
        elapsed: started.elapsed(),
    };
    info!(
        completed = report.completed(),
        connect_failures = report.connect_failures(),
        send_failures = report.send_failures(),
        total_kb = tariff::kilobytes(report.total_bytes_sent()),
        total_tariff = report.total_tariff(),
        "all workers joined"
    );
    println!("Traffic generation completed.");
    report
}
