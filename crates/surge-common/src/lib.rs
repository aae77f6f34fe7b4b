use serde::Deserialize;
use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Longest accepted run, one year. Deadline arithmetic on a validated
/// duration must stay within `Instant` range.
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Validated parameters for one traffic run. Immutable once constructed;
/// `validate` must pass before any worker is spawned.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    pub duration_secs: u64,
    pub workers: u32,
}

impl RunConfig {
    pub fn new(host: impl Into<String>, port: u16, duration_secs: u64, workers: u32) -> Self {
        Self {
            host: host.into(),
            port,
            duration_secs,
            workers,
        }
    }

    /// Rejects parameters outside the tool's domain. Runs for both the
    /// positional CLI form and YAML profiles, so it is the single source of
    /// truth for startup validation.
    pub fn validate(&self) -> Result<(), BoxError> {
        if self.host.trim().is_empty() {
            return Err("target host must not be empty".into());
        }
        if self.port == 0 {
            return Err("target port must be between 1 and 65535".into());
        }
        if self.duration_secs == 0 {
            return Err("duration must be at least 1 second".into());
        }
        if self.duration_secs > MAX_DURATION_SECS {
            return Err(format!("duration must be at most {MAX_DURATION_SECS} seconds").into());
        }
        if self.workers == 0 {
            return Err("worker count must be at least 1 per protocol".into());
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// YAML run profile loaded via `--profile`. Carries the same parameters as
/// the positional CLI form plus the optional helper script and expiration
/// override.
#[derive(Debug, Deserialize, Clone)]
pub struct RunProfile {
    pub target: TargetSection,
    pub run: RunSection,
    #[serde(default)]
    pub helper: Option<HelperSection>,
    #[serde(default)]
    pub expires: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TargetSection {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunSection {
    pub duration_secs: u64,
    pub workers: u32,
}

/// External helper process launched alongside the workers; `args` are
/// forwarded verbatim.
#[derive(Debug, Deserialize, Clone)]
pub struct HelperSection {
    pub script: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl RunProfile {
    pub fn to_config(&self) -> Result<RunConfig, BoxError> {
        let config = RunConfig::new(
            self.target.host.clone(),
            self.target.port,
            self.run.duration_secs,
            self.run.workers,
        );
        config.validate()?;
        Ok(config)
    }
}
