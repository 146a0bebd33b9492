//! Lane-selection policy

use ordered_float::OrderedFloat;

use super::customer::Customer;
use super::error::SimError;
use super::lane::Lane;

/// Pick the lane a new customer joins.
///
/// Among the lanes the customer may enter, returns the index of the one with
/// the least total remaining service time. Ties go to the lowest index.
pub fn select_lane(lanes: &[Lane], customer: &Customer) -> Result<usize, SimError> {
    lanes
        .iter()
        .enumerate()
        .filter(|(_, lane)| lane.can_enter(customer))
        // min_by_key keeps the first of equal minima
        .min_by_key(|(_, lane)| OrderedFloat(lane.total_time_left()))
        .map(|(index, _)| index)
        .ok_or(SimError::NoEligibleLane {
            item_count: customer.item_count(),
        })
}
