//! Parameter sweep over express lane counts and express item limits
//!
//! Each sweep point runs many independent trials. Trials are spread over
//! scoped worker threads; each trial owns its own seeded generator, so the
//! results don't depend on how many threads are used.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::simulation::{run_trial, CustomerProfile, SimError, TrialParams};
use crate::stats::Summary;

/// Which combinations to simulate and how many trials each gets
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub lane_count: usize,
    pub express_lane_counts: RangeInclusive<usize>,
    pub express_limits: RangeInclusive<u32>,
    pub trials_per_point: usize,
    pub time_horizon: f64,
    pub arrival_rate: f64,
    /// Worker threads per point
    pub threads: usize,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let params = TrialParams::default();
        Self {
            lane_count: params.lane_count,
            express_lane_counts: params.express_lane_count..=params.express_lane_count,
            express_limits: 0..=49,
            trials_per_point: 5000,
            time_horizon: params.time_horizon,
            arrival_rate: params.arrival_rate,
            threads: thread::available_parallelism().map_or(1, |n| n.get()),
            seed: 0,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials_per_point == 0 {
            anyhow::bail!("At least one trial per point is required");
        }
        if self.threads == 0 {
            anyhow::bail!("At least one worker thread is required");
        }
        if self.express_lane_counts.is_empty() {
            anyhow::bail!("Express lane count range is empty");
        }
        if self.express_limits.is_empty() {
            anyhow::bail!("Express limit range is empty");
        }
        for express_lanes in [
            *self.express_lane_counts.start(),
            *self.express_lane_counts.end(),
        ] {
            self.trial_params(express_lanes, *self.express_limits.start())
                .validate()
                .context("Invalid sweep configuration")?;
        }
        Ok(())
    }

    fn trial_params(&self, express_lanes: usize, express_limit: u32) -> TrialParams {
        TrialParams::new(
            self.lane_count,
            express_lanes,
            express_limit,
            self.time_horizon,
            self.arrival_rate,
        )
    }

    /// Number of (express lanes, limit) combinations
    pub fn point_count(&self) -> usize {
        self.express_lane_counts.clone().count() * self.express_limits.clone().count()
    }
}

/// Result of all trials at one combination
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub express_lanes: usize,
    pub express_limit: u32,
    /// `None` when every trial finished without serving anyone
    pub summary: Option<Summary>,
    /// Trials in which no customer completed service
    pub empty_trials: usize,
}

/// Run every point of the sweep.
///
/// `cancel` is checked before each trial. A point interrupted by cancellation
/// is discarded; the points finished before it are returned.
pub fn run_sweep(
    config: &SweepConfig,
    profile: &CustomerProfile,
    cancel: &AtomicBool,
) -> Result<Vec<SweepPoint>> {
    run_sweep_with(config, profile, cancel, |_| {})
}

/// Like [`run_sweep`], calling `on_point` as soon as each point is complete.
///
/// Setting `cancel` from inside `on_point` stops the sweep before the next
/// point starts.
pub fn run_sweep_with<F>(
    config: &SweepConfig,
    profile: &CustomerProfile,
    cancel: &AtomicBool,
    mut on_point: F,
) -> Result<Vec<SweepPoint>>
where
    F: FnMut(&SweepPoint),
{
    config.validate()?;
    profile.validate().context("Invalid customer profile")?;

    info!(
        "Sweeping {} points, {} trials each, on {} threads (seed {})",
        config.point_count(),
        config.trials_per_point,
        config.threads,
        config.seed
    );

    let mut points = Vec::with_capacity(config.point_count());
    let combinations = config
        .express_lane_counts
        .clone()
        .flat_map(|lanes| config.express_limits.clone().map(move |limit| (lanes, limit)));

    // Per-point seeds come from one stream, so nearby sweep seeds don't share points
    let mut point_seeds = StdRng::seed_from_u64(config.seed);

    for (express_lanes, express_limit) in combinations {
        let params = config.trial_params(express_lanes, express_limit);
        let seeds = trial_seeds(point_seeds.random::<u64>(), config.trials_per_point);

        let Some(results) = run_point(&params, profile, &seeds, config.threads, cancel) else {
            warn!(
                "Sweep cancelled at express_lanes={}, limit={}; {} points complete",
                express_lanes,
                express_limit,
                points.len()
            );
            break;
        };

        let mut samples = Vec::with_capacity(results.len());
        let mut empty_trials = 0;
        for result in results {
            match result {
                Ok(average) => samples.push(average),
                Err(SimError::NoCustomersProcessed) => empty_trials += 1,
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!(
                            "Trial failed at express_lanes={}, limit={}",
                            express_lanes, express_limit
                        )
                    })
                }
            }
        }

        let summary = Summary::from_samples(&samples);
        match &summary {
            Some(summary) => info!(
                "express_lanes={} limit={}: mean wait {:.4} (sd {:.4}, {} trials)",
                express_lanes, express_limit, summary.mean, summary.std_dev, summary.count
            ),
            None => warn!(
                "express_lanes={} limit={}: no trial served any customer",
                express_lanes, express_limit
            ),
        }
        if empty_trials > 0 {
            debug!("{} empty trials at limit {}", empty_trials, express_limit);
        }

        let point = SweepPoint {
            express_lanes,
            express_limit,
            summary,
            empty_trials,
        };
        on_point(&point);
        points.push(point);
    }

    Ok(points)
}

/// One seed per trial, derived from the point's seed
fn trial_seeds(point_seed: u64, trials: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(point_seed);
    (0..trials).map(|_| rng.random::<u64>()).collect()
}

/// Run the trials of one point, in seed order. `None` if cancelled.
fn run_point(
    params: &TrialParams,
    profile: &CustomerProfile,
    seeds: &[u64],
    threads: usize,
    cancel: &AtomicBool,
) -> Option<Vec<Result<f64, SimError>>> {
    let chunk_size = seeds.len().div_ceil(threads).max(1);

    let chunks: Vec<Option<Vec<Result<f64, SimError>>>> = thread::scope(|scope| {
        let handles: Vec<_> = seeds
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    let mut results = Vec::with_capacity(chunk.len());
                    for &seed in chunk {
                        if cancel.load(Ordering::Relaxed) {
                            return None;
                        }
                        let mut rng = StdRng::seed_from_u64(seed);
                        results.push(run_trial(params, profile, &mut rng));
                    }
                    Some(results)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    let mut results = Vec::with_capacity(seeds.len());
    for chunk in chunks {
        results.extend(chunk?);
    }
    Some(results)
}
