//! Checkout Lane Simulation Library
//!
//! A Monte Carlo simulation of supermarket checkout lanes, used to estimate
//! how the number of express lanes and their item limit affect average
//! customer wait time.

pub mod simulation;
pub mod stats;
pub mod sweep;
