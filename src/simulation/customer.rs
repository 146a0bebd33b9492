//! Customer model for the checkout simulation
//!
//! A customer carries an item count and the time the cashier needs for them.

use rand::Rng;

use super::error::SimError;
use super::random::normal;

/// Shape of the customer population.
///
/// The service time of a customer is the sum of `item_count` independent
/// per-item times, so it is drawn as a single normal sample with mean
/// `n * mean_time_per_item` and standard deviation
/// `sqrt(n) * stdev_time_per_item`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomerProfile {
    pub mean_item_count: f64,
    pub stdev_item_count: f64,
    /// Minutes per item
    pub mean_time_per_item: f64,
    pub stdev_time_per_item: f64,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            mean_item_count: DEFAULT_MEAN_ITEM_COUNT,
            stdev_item_count: DEFAULT_STDEV_ITEM_COUNT,
            mean_time_per_item: DEFAULT_MEAN_TIME_PER_ITEM,
            stdev_time_per_item: DEFAULT_STDEV_TIME_PER_ITEM,
        }
    }
}

impl CustomerProfile {
    /// Reject shapes the redraw loops could never get a positive sample from
    pub fn validate(&self) -> Result<(), SimError> {
        let fields = [
            ("mean_item_count", self.mean_item_count),
            ("stdev_item_count", self.stdev_item_count),
            ("mean_time_per_item", self.mean_time_per_item),
            ("stdev_time_per_item", self.stdev_time_per_item),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SimError::invalid(name, format!("must be finite, got {}", value)));
            }
        }
        if self.mean_item_count < 1.0 {
            return Err(SimError::invalid(
                "mean_item_count",
                format!("must be at least 1, got {}", self.mean_item_count),
            ));
        }
        if self.stdev_item_count < 0.0 {
            return Err(SimError::invalid("stdev_item_count", "must not be negative"));
        }
        if self.mean_time_per_item <= 0.0 {
            return Err(SimError::invalid(
                "mean_time_per_item",
                format!("must be positive, got {}", self.mean_time_per_item),
            ));
        }
        if self.stdev_time_per_item < 0.0 {
            return Err(SimError::invalid("stdev_time_per_item", "must not be negative"));
        }
        Ok(())
    }

    /// Expected service time of an average customer
    pub fn mean_service_time(&self) -> f64 {
        self.mean_item_count * self.mean_time_per_item
    }
}

/// A shopper waiting in (or being served at) a lane
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    item_count: u32,
    total_service_time: f64,
    remaining_service_time: f64,
}

impl Customer {
    /// Create a customer with an explicit basket and service time.
    ///
    /// The service time must be finite and not negative.
    pub fn new(item_count: u32, service_time: f64) -> Result<Self, SimError> {
        if !(service_time.is_finite() && service_time >= 0.0) {
            return Err(SimError::invalid(
                "service_time",
                format!("must be finite and not negative, got {}", service_time),
            ));
        }
        Ok(Self::with_service_time(item_count, service_time))
    }

    fn with_service_time(item_count: u32, service_time: f64) -> Self {
        Self {
            item_count,
            total_service_time: service_time,
            remaining_service_time: service_time,
        }
    }

    /// Draw a customer from the profile.
    ///
    /// Non-positive item counts and service times are redrawn rather than
    /// clamped, so the tails of the distributions are not distorted.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, profile: &CustomerProfile) -> Self {
        let item_count = loop {
            // Truncates toward zero
            let items = normal(rng, profile.mean_item_count, profile.stdev_item_count) as i64;
            if items > 0 {
                break u32::try_from(items).unwrap_or(u32::MAX);
            }
        };

        let n = f64::from(item_count);
        let mean = profile.mean_time_per_item * n;
        let stdev = profile.stdev_time_per_item * n.sqrt();
        let service_time = loop {
            let time = normal(rng, mean, stdev);
            if time > 0.0 {
                break time;
            }
        };

        Self::with_service_time(item_count, service_time)
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    pub fn total_service_time(&self) -> f64 {
        self.total_service_time
    }

    pub fn remaining_service_time(&self) -> f64 {
        self.remaining_service_time
    }

    /// Consume `time` of this customer's service, never going below zero
    pub(crate) fn serve(&mut self, time: f64) {
        self.remaining_service_time = (self.remaining_service_time - time).max(0.0);
    }
}

/// Items in an average basket
pub const DEFAULT_MEAN_ITEM_COUNT: f64 = 25.0;

pub const DEFAULT_STDEV_ITEM_COUNT: f64 = 10.0;

/// Minutes the cashier spends per item
pub const DEFAULT_MEAN_TIME_PER_ITEM: f64 = 0.1;

pub const DEFAULT_STDEV_TIME_PER_ITEM: f64 = 0.01;
