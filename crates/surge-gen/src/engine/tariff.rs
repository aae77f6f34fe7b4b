//! Cost accounting for transmitted traffic, applied per worker at completion.

/// Billed rate per kilobyte sent.
pub const TARIFF_RATE: f64 = 0.05;

/// Truncating byte-to-KB conversion; applied once to a worker's final total.
pub fn kilobytes(bytes: u64) -> u64 {
    bytes / 1024
}

pub fn tariff(kilobytes: u64) -> f64 {
    kilobytes as f64 * TARIFF_RATE
}

pub fn for_bytes(bytes: u64) -> f64 {
    tariff(kilobytes(bytes))
}
