//! Checkout lane logic for the simulation
//!
//! A lane is a FIFO queue of customers. Only the customer at the front is
//! being served; everyone in the queue accrues wait time while they are there.

use std::collections::VecDeque;

use super::customer::Customer;
use super::types::LaneKind;

/// Wait-time totals for one trial.
///
/// Every lane of a trial adds into the same value, so the totals are scoped
/// to the trial rather than to a lane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaitStats {
    /// Sum over service segments of queue length times segment duration
    pub total_wait_time: f64,
    /// Customers whose service finished
    pub customers_processed: u64,
}

impl WaitStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean wait per finished customer, `None` until someone has finished
    pub fn average_wait_time(&self) -> Option<f64> {
        if self.customers_processed == 0 {
            None
        } else {
            Some(self.total_wait_time / self.customers_processed as f64)
        }
    }

    /// `waiting` customers all spent `duration` in the queue
    fn record_segment(&mut self, waiting: usize, duration: f64) {
        self.total_wait_time += waiting as f64 * duration;
    }
}

/// A checkout lane
#[derive(Debug, Clone)]
pub struct Lane {
    kind: LaneKind,
    customers: VecDeque<Customer>,
    /// Sum of remaining service time over `customers`
    time_left: f64,
}

impl Lane {
    pub fn new(kind: LaneKind) -> Self {
        Self {
            kind,
            customers: VecDeque::new(),
            time_left: 0.0,
        }
    }

    pub fn regular() -> Self {
        Self::new(LaneKind::Regular)
    }

    pub fn express(limit: u32) -> Self {
        Self::new(LaneKind::Express { limit })
    }

    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    pub fn is_express(&self) -> bool {
        matches!(self.kind, LaneKind::Express { .. })
    }

    pub fn express_limit(&self) -> Option<u32> {
        match self.kind {
            LaneKind::Express { limit } => Some(limit),
            LaneKind::Regular => None,
        }
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// The customer currently being served
    pub fn front(&self) -> Option<&Customer> {
        self.customers.front()
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    /// Check if the customer is allowed to join this lane
    pub fn can_enter(&self, customer: &Customer) -> bool {
        match self.kind {
            LaneKind::Regular => true,
            LaneKind::Express { limit } => customer.item_count() <= limit,
        }
    }

    /// Put a customer at the back of the queue
    pub fn enqueue(&mut self, customer: Customer) {
        self.time_left += customer.remaining_service_time();
        self.customers.push_back(customer);
    }

    /// Total remaining service time of everyone queued, in O(1)
    pub fn total_time_left(&self) -> f64 {
        self.time_left
    }

    /// Total remaining service time computed by walking the queue
    pub fn recomputed_time_left(&self) -> f64 {
        self.customers
            .iter()
            .map(Customer::remaining_service_time)
            .sum()
    }

    /// Let `duration` of simulated time pass at this lane.
    ///
    /// Customers whose service finishes within the window leave the queue and
    /// are counted in `stats`. Every customer present during a segment waits
    /// for the whole segment. Each pass of the loop either removes the front
    /// customer or ends the window, so it runs at most `len() + 1` times.
    pub fn advance(&mut self, duration: f64, stats: &mut WaitStats) {
        if duration.is_nan() || duration < 0.0 {
            return;
        }

        let mut remaining = duration;
        loop {
            let waiting = self.customers.len();
            let Some(front) = self.customers.front_mut() else {
                break;
            };

            let front_left = front.remaining_service_time();
            if front_left <= remaining {
                stats.record_segment(waiting, front_left);
                self.customers.pop_front();
                stats.customers_processed += 1;
                self.time_left -= front_left;
                remaining -= front_left;
            } else {
                stats.record_segment(waiting, remaining);
                front.serve(remaining);
                self.time_left -= remaining;
                break;
            }
        }

        if self.customers.is_empty() {
            // Drop rounding residue once nobody is left
            self.time_left = 0.0;
        }
    }
}
