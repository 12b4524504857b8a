use std::sync::Arc;

use tour_core::{CoreResult, TourSupplier};
use tour_shared::TourOption;
use tracing::{info, warn};

use crate::context::TourContext;

/// Loads the bookable options for a tour context
#[derive(Clone)]
pub struct TourOptionFetcher {
    supplier: Arc<dyn TourSupplier>,
}

impl TourOptionFetcher {
    pub fn new(supplier: Arc<dyn TourSupplier>) -> Self {
        Self { supplier }
    }

    /// Single attempt. Transport failures and non-zero status codes read as
    /// "no options"; only an invalid context is an error.
    pub async fn fetch(&self, context: &TourContext) -> CoreResult<Vec<TourOption>> {
        let query = context.options_query()?;

        match self.supplier.fetch_tour_options(&query).await {
            Ok(envelope) if envelope.is_success() => {
                let options = envelope.into_options();
                info!(tour_id = query.tour_id, count = options.len(), "Fetched tour options");
                Ok(options)
            }
            Ok(envelope) => {
                warn!(
                    tour_id = query.tour_id,
                    statuscode = envelope.statuscode,
                    "Tour options query rejected, showing no options"
                );
                Ok(Vec::new())
            }
            Err(e) => {
                warn!(tour_id = query.tour_id, error = %e, "Tour options query failed, showing no options");
                Ok(Vec::new())
            }
        }
    }
}
