use chrono::Utc;
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use surge_gen::cli::Cli;
use surge_gen::engine::pool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Diagnostics go to stderr; stdout carries only the worker summary lines.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Resolves when a shutdown signal arrives: Ctrl-C everywhere, SIGTERM too
/// on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Cannot install SIGTERM handler, listening for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        cancel.cancel();
    });
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests are not failures.
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
            let _ = e.print();
            return code;
        }
    };

    let launch = match cli.resolve() {
        Ok(launch) => launch,
        Err(e) => {
            error!(error = %e, "Invalid run parameters");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = launch.gate.check(Utc::now()) {
        error!(error = %e, "Expiration gate refused the run");
        return ExitCode::from(1);
    }

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    pool::run(launch.config, launch.script, cancel).await;

    ExitCode::SUCCESS
}
