//! Simulation driver
//!
//! Runs one trial: customers arrive as a Poisson stream until the simulated
//! clock passes the horizon, and each arrival joins the least-loaded lane it
//! is allowed into.

use log::{debug, trace};
use rand::Rng;

use super::customer::{Customer, CustomerProfile};
use super::error::SimError;
use super::lane::{Lane, WaitStats};
use super::random::exponential;
use super::selection::select_lane;
use super::types::TrialParams;

/// Where a trial is in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    /// The clock is still below the horizon
    Running,
    /// The horizon has been reached; no more arrivals
    Done,
}

/// What a finished trial produced
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub average_wait_time: f64,
    pub total_wait_time: f64,
    pub customers_processed: u64,
    pub customers_arrived: u64,
    /// Customers still queued when the trial stopped. Their waits are not counted.
    pub customers_unfinished: usize,
    /// Simulated time at the last arrival (may exceed the horizon)
    pub elapsed: f64,
}

/// One trial of the checkout simulation
#[derive(Debug, Clone)]
pub struct Trial {
    params: TrialParams,
    profile: CustomerProfile,
    lanes: Vec<Lane>,
    stats: WaitStats,
    time: f64,
    state: TrialState,
    customers_arrived: u64,
}

impl Trial {
    /// Validate the configuration and set up empty lanes
    pub fn new(params: TrialParams, profile: CustomerProfile) -> Result<Self, SimError> {
        params.validate()?;
        profile.validate()?;

        let lanes = (0..params.lane_count)
            .map(|index| Lane::new(params.lane_kind(index)))
            .collect();

        Ok(Self {
            params,
            profile,
            lanes,
            stats: WaitStats::new(),
            time: 0.0,
            state: TrialState::Running,
            customers_arrived: 0,
        })
    }

    pub fn params(&self) -> &TrialParams {
        &self.params
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn stats(&self) -> &WaitStats {
        &self.stats
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    pub fn customers_arrived(&self) -> u64 {
        self.customers_arrived
    }

    /// Process the next arrival.
    ///
    /// Returns `Ok(false)` without drawing anything once the trial is done.
    /// If the arrival can't be placed in any lane the error is returned and
    /// the trial is done, with the clock covering the time the lanes consumed.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<bool, SimError> {
        if self.state == TrialState::Done {
            return Ok(false);
        }

        let gap = exponential(rng, self.params.arrival_rate);
        let customer = Customer::random(rng, &self.profile);

        // Lanes are independent, so the order they are advanced in doesn't matter
        for lane in &mut self.lanes {
            lane.advance(gap, &mut self.stats);
        }

        self.time += gap;

        let index = match select_lane(&self.lanes, &customer) {
            Ok(index) => index,
            Err(err) => {
                // A failed arrival ends the trial
                self.state = TrialState::Done;
                return Err(err);
            }
        };
        trace!(
            "t={:.3}: customer with {} items ({:.3} min) joins lane {}",
            self.time,
            customer.item_count(),
            customer.total_service_time(),
            index
        );
        self.lanes[index].enqueue(customer);
        self.customers_arrived += 1;

        if self.time >= self.params.time_horizon {
            self.state = TrialState::Done;
        }
        Ok(true)
    }

    /// Step until the horizon is reached, then summarize
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<TrialOutcome, SimError> {
        while self.step(rng)? {}
        self.finish()
    }

    /// Summarize the trial as it stands.
    ///
    /// Customers still in a queue are dropped without finishing service.
    pub fn finish(self) -> Result<TrialOutcome, SimError> {
        let customers_unfinished = self.lanes.iter().map(Lane::len).sum();
        let average_wait_time = self
            .stats
            .average_wait_time()
            .ok_or(SimError::NoCustomersProcessed)?;

        debug!(
            "Trial done at t={:.2}: {} arrived, {} processed, {} unfinished, avg wait {:.4}",
            self.time,
            self.customers_arrived,
            self.stats.customers_processed,
            customers_unfinished,
            average_wait_time
        );

        Ok(TrialOutcome {
            average_wait_time,
            total_wait_time: self.stats.total_wait_time,
            customers_processed: self.stats.customers_processed,
            customers_arrived: self.customers_arrived,
            customers_unfinished,
            elapsed: self.time,
        })
    }
}

/// Run one trial and return its average wait time
pub fn run_trial<R: Rng + ?Sized>(
    params: &TrialParams,
    profile: &CustomerProfile,
    rng: &mut R,
) -> Result<f64, SimError> {
    Trial::new(params.clone(), *profile)?
        .run(rng)
        .map(|outcome| outcome.average_wait_time)
}
