//! Command-line surface and resolution into validated run inputs.

use crate::expiry::ExpiryGate;
use crate::script::HelperScript;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use surge_common::{BoxError, RunConfig, RunProfile};

/// Time-bounded UDP/TCP traffic generator with per-worker tariff accounting.
///
/// Flags for surge-gen itself must precede the helper script path; every
/// argument after it is forwarded to the helper verbatim.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target host name or address
    #[arg(value_name = "HOST", required_unless_present = "profile")]
    pub host: Option<String>,

    /// Target port (1-65535)
    #[arg(value_name = "PORT", required_unless_present = "profile")]
    pub port: Option<u16>,

    /// Run duration in seconds
    #[arg(value_name = "DURATION_SECS", required_unless_present = "profile")]
    pub duration: Option<u64>,

    /// Concurrent workers per protocol
    #[arg(value_name = "WORKERS", required_unless_present = "profile")]
    pub workers: Option<u32>,

    /// Optional helper script followed by its arguments, forwarded verbatim
    #[arg(
        value_name = "HELPER",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub helper: Vec<String>,

    /// Load run parameters from a YAML profile instead of positionals
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["host", "port", "duration", "workers"]
    )]
    pub profile: Option<PathBuf>,

    /// Override the expiration cutoff (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "WHEN")]
    pub expires: Option<String>,
}

/// Fully resolved startup inputs: a validated config, the optional helper
/// invocation, and the expiration gate to check before running.
pub struct Launch {
    pub config: RunConfig,
    pub script: Option<HelperScript>,
    pub gate: ExpiryGate,
}

impl Cli {
    /// Resolves the argument surface into run inputs, validating everything
    /// up front. No socket is opened here. A CLI `--expires` wins over a
    /// profile value.
    pub fn resolve(self) -> Result<Launch, BoxError> {
        let (config, profile_helper, profile_expires) = match self.profile {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read profile {}: {e}", path.display()))?;
                let profile: RunProfile = serde_yaml::from_str(&raw)
                    .map_err(|e| format!("invalid profile {}: {e}", path.display()))?;
                let config = profile.to_config()?;
                let helper = profile
                    .helper
                    .map(|section| HelperScript::new(section.script, section.args));
                (config, helper, profile.expires)
            }
            None => {
                let (Some(host), Some(port), Some(duration), Some(workers)) =
                    (self.host, self.port, self.duration, self.workers)
                else {
                    return Err("host, port, duration and workers are required".into());
                };
                let config = RunConfig::new(host, port, duration, workers);
                config.validate()?;
                (config, None, None)
            }
        };

        let mut cli_helper = self.helper.into_iter();
        let script = match cli_helper.next() {
            Some(path) => Some(HelperScript::new(path, cli_helper.collect())),
            None => profile_helper,
        };

        let gate = match self.expires.or(profile_expires) {
            Some(cutoff) => ExpiryGate::parse(&cutoff)?,
            None => ExpiryGate::default(),
        };

        Ok(Launch {
            config,
            script,
            gate,
        })
    }
}
