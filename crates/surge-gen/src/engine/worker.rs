//! Per-worker send loop: one connection, one local byte counter, one summary
//! line on completion.

use crate::engine::clock;
use crate::engine::tariff;
use crate::engine::transport::{Protocol, SendConn};
use bytes::Bytes;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use surge_common::RunConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Read-only inputs shared by every worker of a run. Cloning shares the
/// config, payload and cancellation token; nothing here is mutated after the
/// run starts.
#[derive(Clone)]
pub struct WorkerContext {
    pub config: Arc<RunConfig>,
    pub deadline: Instant,
    pub cancel: CancellationToken,
    pub payload: Bytes,
}

/// Accounting produced by a worker that reached its send loop. Owned by that
/// worker; read-only once emitted.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub worker_id: u32,
    pub protocol: Protocol,
    pub bytes_sent: u64,
    pub tariff: f64,
}

impl WorkerResult {
    pub fn new(worker_id: u32, protocol: Protocol, bytes_sent: u64) -> Self {
        Self {
            worker_id,
            protocol,
            bytes_sent,
            tariff: tariff::for_bytes(bytes_sent),
        }
    }

    pub fn kilobytes(&self) -> u64 {
        tariff::kilobytes(self.bytes_sent)
    }

    /// The per-worker console line: id, protocol, KB total, tariff to two
    /// decimal places.
    pub fn summary(&self) -> String {
        format!(
            "Worker {} [{}] - total data sent: {} KB, tariff: ${:.2}",
            self.worker_id,
            self.protocol,
            self.kilobytes(),
            self.tariff
        )
    }
}

#[derive(Debug)]
pub enum WorkerOutcome {
    /// Deadline or cancellation ended the loop normally.
    Completed(WorkerResult),
    /// A mid-loop write failed; the partial accounting is still reported.
    SendFailed {
        result: WorkerResult,
        error: io::Error,
    },
    /// The connection could not be established; no summary line is emitted.
    ConnectFailed {
        worker_id: u32,
        protocol: Protocol,
        error: io::Error,
    },
}

impl WorkerOutcome {
    pub fn result(&self) -> Option<&WorkerResult> {
        match self {
            WorkerOutcome::Completed(result) => Some(result),
            WorkerOutcome::SendFailed { result, .. } => Some(result),
            WorkerOutcome::ConnectFailed { .. } => None,
        }
    }
}

/// Runs one worker to completion: connect, then write the filler buffer in a
/// tight loop until the deadline passes or cancellation is observed. Every
/// failure is contained in the returned outcome; nothing propagates to
/// sibling workers.
pub async fn run_worker(ctx: WorkerContext, worker_id: u32, protocol: Protocol) -> WorkerOutcome {
    let mut conn = match SendConn::open(protocol, &ctx.config.host, ctx.config.port).await {
        Ok(conn) => conn,
        Err(error) => {
            error!(worker_id, protocol = %protocol, error = %error, "connection failed");
            return WorkerOutcome::ConnectFailed {
                worker_id,
                protocol,
                error,
            };
        }
    };
    debug!(worker_id, protocol = %protocol, "connected, entering send loop");

    let mut bytes_sent: u64 = 0;
    while !clock::reached(ctx.deadline) && !ctx.cancel.is_cancelled() {
        match conn.write(&ctx.payload).await {
            Ok(n) => bytes_sent += n as u64,
            Err(error) => {
                error!(worker_id, protocol = %protocol, error = %error, "send failed");
                let result = WorkerResult::new(worker_id, protocol, bytes_sent);
                println!("{}", result.summary());
                return WorkerOutcome::SendFailed { result, error };
            }
        }
    }
    conn.close().await;

    let result = WorkerResult::new(worker_id, protocol, bytes_sent);
    println!("{}", result.summary());
    WorkerOutcome::Completed(result)
}
