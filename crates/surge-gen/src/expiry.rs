//! Expiration gate: the tool refuses to run past its cutoff date. The cutoff
//! is injected so the gate is testable without touching the system clock.

use chrono::{DateTime, NaiveDate, Utc};
use surge_common::BoxError;

/// Built-in cutoff used when no override is supplied.
pub const DEFAULT_CUTOFF: &str = "2027-12-31";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryGate {
    cutoff: DateTime<Utc>,
}

impl ExpiryGate {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self { cutoff }
    }

    /// Accepts an RFC 3339 datetime or a plain `YYYY-MM-DD` date (taken as
    /// UTC midnight).
    pub fn parse(cutoff: &str) -> Result<Self, BoxError> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(cutoff) {
            return Ok(Self::new(instant.with_timezone(&Utc)));
        }
        let date = NaiveDate::parse_from_str(cutoff, "%Y-%m-%d").map_err(|_| {
            format!("invalid expiration cutoff {cutoff:?}: expected RFC 3339 or YYYY-MM-DD")
        })?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("invalid expiration cutoff {cutoff:?}"))?;
        Ok(Self::new(DateTime::from_naive_utc_and_offset(midnight, Utc)))
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Fails once `now` is strictly past the cutoff; the cutoff instant
    /// itself still passes.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), BoxError> {
        if now > self.cutoff {
            return Err(format!(
                "this tool expired on {}; refusing to run",
                self.cutoff.format("%Y-%m-%d")
            )
            .into());
        }
        Ok(())
    }
}

impl Default for ExpiryGate {
    fn default() -> Self {
        Self::parse(DEFAULT_CUTOFF).expect("built-in cutoff date is valid")
    }
}
