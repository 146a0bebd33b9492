//! Checkout lane simulation core
//!
//! This module contains the queueing model itself: random draws, customers,
//! lanes, the lane-selection policy and the driver that runs one trial. It has
//! no knowledge of sweeps or reporting.

mod customer;
mod error;
mod lane;
pub mod random;
mod selection;
mod trial;
mod types;

pub use customer::{
    Customer, CustomerProfile, DEFAULT_MEAN_ITEM_COUNT, DEFAULT_MEAN_TIME_PER_ITEM,
    DEFAULT_STDEV_ITEM_COUNT, DEFAULT_STDEV_TIME_PER_ITEM,
};
pub use error::SimError;
pub use lane::{Lane, WaitStats};
pub use selection::select_lane;
pub use trial::{run_trial, Trial, TrialOutcome, TrialState};
pub use types::{
    LaneKind, TrialParams, DEFAULT_ARRIVAL_RATE, DEFAULT_EXPRESS_ITEM_LIMIT,
    DEFAULT_EXPRESS_LANE_COUNT, DEFAULT_LANE_COUNT, DEFAULT_TIME_HORIZON,
};
