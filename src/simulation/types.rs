//! Core types for the checkout simulation
//!
//! Trial parameters and the defaults used by the command line.

use super::error::SimError;

/// Whether a lane serves everyone or only small baskets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    /// Admits every customer
    Regular,
    /// Admits customers with at most `limit` items
    Express { limit: u32 },
}

/// Parameters of a single trial
#[derive(Debug, Clone, PartialEq)]
pub struct TrialParams {
    /// Total number of lanes
    pub lane_count: usize,
    /// How many of the lanes (the first ones) are express lanes
    pub express_lane_count: usize,
    /// Item-count threshold shared by every express lane
    pub express_item_limit: u32,
    /// Simulated time after which no further arrivals are generated
    pub time_horizon: f64,
    /// Mean customers per unit of simulated time
    pub arrival_rate: f64,
}

impl Default for TrialParams {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            express_lane_count: DEFAULT_EXPRESS_LANE_COUNT,
            express_item_limit: DEFAULT_EXPRESS_ITEM_LIMIT,
            time_horizon: DEFAULT_TIME_HORIZON,
            arrival_rate: DEFAULT_ARRIVAL_RATE,
        }
    }
}

impl TrialParams {
    pub fn new(
        lane_count: usize,
        express_lane_count: usize,
        express_item_limit: u32,
        time_horizon: f64,
        arrival_rate: f64,
    ) -> Self {
        Self {
            lane_count,
            express_lane_count,
            express_item_limit,
            time_horizon,
            arrival_rate,
        }
    }

    /// Check every value before a trial starts
    pub fn validate(&self) -> Result<(), SimError> {
        if self.lane_count == 0 {
            return Err(SimError::invalid("lane_count", "at least one lane is required"));
        }
        if self.express_lane_count > self.lane_count {
            return Err(SimError::invalid(
                "express_lane_count",
                format!(
                    "{} express lanes requested but only {} lanes exist",
                    self.express_lane_count, self.lane_count
                ),
            ));
        }
        if !(self.time_horizon.is_finite() && self.time_horizon > 0.0) {
            return Err(SimError::invalid(
                "time_horizon",
                format!("must be positive and finite, got {}", self.time_horizon),
            ));
        }
        if !(self.arrival_rate.is_finite() && self.arrival_rate > 0.0) {
            return Err(SimError::invalid(
                "arrival_rate",
                format!("must be positive and finite, got {}", self.arrival_rate),
            ));
        }
        Ok(())
    }

    /// Kind of the lane at `index`; the first `express_lane_count` lanes are express
    pub fn lane_kind(&self, index: usize) -> LaneKind {
        if index < self.express_lane_count {
            LaneKind::Express {
                limit: self.express_item_limit,
            }
        } else {
            LaneKind::Regular
        }
    }
}

/// Lanes in the modelled store
pub const DEFAULT_LANE_COUNT: usize = 10;

/// Express lanes among them
pub const DEFAULT_EXPRESS_LANE_COUNT: usize = 1;

/// Express item limit used when a single trial is run
pub const DEFAULT_EXPRESS_ITEM_LIMIT: u32 = 25;

/// Eight hours, in minutes
pub const DEFAULT_TIME_HORIZON: f64 = 8.0 * 60.0;

/// Customers per minute
pub const DEFAULT_ARRIVAL_RATE: f64 = 4.15;
