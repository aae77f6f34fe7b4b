//! Invocation of the operator-supplied helper process. The helper runs
//! alongside the workers; its failure is reported, never escalated.

use std::io;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{info, warn};

/// External helper process: the given path is executed directly as the
/// program with `args` forwarded verbatim. Interpreters are the operator's
/// concern (shebang, or pass the interpreter as the path).
#[derive(Debug, Clone)]
pub struct HelperScript {
    pub path: String,
    pub args: Vec<String>,
}

/// Captured output of a helper process that was launched successfully,
/// whatever its exit status.
#[derive(Debug)]
pub struct HelperOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl HelperOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl HelperScript {
    pub fn new(path: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            path: path.into(),
            args,
        }
    }

    /// Runs the helper to completion, capturing stdout and stderr.
    pub async fn execute(&self) -> io::Result<HelperOutput> {
        let output = Command::new(&self.path).args(&self.args).output().await?;
        Ok(HelperOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Runs the helper and surfaces its outcome to the operator the moment
    /// it finishes. Launch failures and non-zero exits are warnings only.
    pub async fn execute_and_report(&self) -> io::Result<HelperOutput> {
        info!(script = %self.path, "launching helper script");
        match self.execute().await {
            Ok(output) => {
                if output.success() {
                    info!(
                        script = %self.path,
                        output = %output.stdout.trim_end(),
                        "helper script finished"
                    );
                } else {
                    warn!(
                        script = %self.path,
                        status = %output.status,
                        stderr = %output.stderr.trim_end(),
                        "helper script exited with failure"
                    );
                }
                Ok(output)
            }
            Err(error) => {
                warn!(script = %self.path, error = %error, "helper script failed to launch");
                Err(error)
            }
        }
    }
}
