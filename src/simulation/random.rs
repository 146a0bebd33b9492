//! Random process generators
//!
//! Every draw takes the generator explicitly so that each trial can own an
//! independent, reproducible stream.

use rand::Rng;
use std::f64::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

/// Uniform sample in `[0, 1)`.
pub fn uniform01<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Standard normal sample using the Box-Muller transform.
///
/// `u` is redrawn while it is exactly zero, since `ln(0)` would turn the
/// sample into an infinity.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let mut u = uniform01(rng);
    while u == 0.0 {
        u = uniform01(rng);
    }
    let v = uniform01(rng);
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

/// Normal sample with mean `mu` and standard deviation `sigma`
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> f64 {
    mu + sigma * standard_normal(rng)
}

/// Exponential sample with the given rate (mean `1 / rate`).
///
/// Models the gap between arrivals of a Poisson process.
pub fn exponential<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
    let mut p = uniform01(rng);
    while p >= 1.0 {
        p = uniform01(rng);
    }
    -(1.0 - p).ln() / rate
}

/// Seed derived from the wall clock, for runs that don't ask for a fixed seed
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()).rotate_left(32))
        .unwrap_or(0)
}
