use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tour_core::TourSupplier;
use tour_shared::{AvailabilityResult, TourOption};
use tracing::{debug, warn};

use crate::availability::{AvailabilityBoard, AvailabilityState};
use crate::context::TourContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A check was already in flight or resolved for this option
    Skipped,
    Resolved(AvailabilityState),
    Cancelled,
    /// The option list was refetched while the request was out
    Stale,
}

/// Queries live availability for one option at a time
#[derive(Clone)]
pub struct AvailabilityChecker {
    supplier: Arc<dyn TourSupplier>,
    board: Arc<AvailabilityBoard>,
}

impl AvailabilityChecker {
    pub fn new(supplier: Arc<dyn TourSupplier>, board: Arc<AvailabilityBoard>) -> Self {
        Self { supplier, board }
    }

    /// Check `option` unless it is already checking or checked in `generation`.
    ///
    /// Transport failures resolve to an unavailable result. Nothing is written
    /// once `token` is cancelled.
    pub async fn check(
        &self,
        option: &TourOption,
        context: &TourContext,
        generation: u64,
        token: &CancellationToken,
    ) -> CheckOutcome {
        let tour_option_id = option.tour_option_id;
        if token.is_cancelled() {
            return CheckOutcome::Cancelled;
        }
        if !self.board.try_begin(tour_option_id, generation).await {
            debug!(tour_option_id, "Availability already known or in flight");
            return CheckOutcome::Skipped;
        }

        let query = context.availability_query(option);
        let result = tokio::select! {
            _ = token.cancelled() => {
                debug!(tour_option_id, "Availability check cancelled");
                return CheckOutcome::Cancelled;
            }
            response = self.supplier.check_availability(&query) => match response {
                Ok(envelope) => envelope.into_result(tour_option_id),
                Err(e) => {
                    warn!(tour_option_id, error = %e, "Availability check failed");
                    AvailabilityResult::check_failed(tour_option_id)
                }
            },
        };

        if token.is_cancelled() {
            return CheckOutcome::Cancelled;
        }
        if !self.board.commit(generation, &result).await {
            debug!(tour_option_id, generation, "Dropping availability for a refetched list");
            return CheckOutcome::Stale;
        }
        CheckOutcome::Resolved(AvailabilityState::from_result(&result))
    }
}
