//! Errors surfaced by the checkout simulation core

use thiserror::Error;

/// Something that stopped a trial from producing an average wait time.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SimError {
    /// A configuration value is out of range.
    ///
    /// Raised before any simulated time passes.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// No lane admits the customer.
    ///
    /// Only possible when every lane is an express lane.
    #[error("No lane admits a customer with {item_count} items")]
    NoEligibleLane { item_count: u32 },

    /// The trial reached its horizon before any customer finished service,
    /// so the average wait time is undefined.
    #[error("No customers completed service before the horizon")]
    NoCustomersProcessed,
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
