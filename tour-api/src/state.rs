use std::sync::Arc;
use tour_core::TourSupplier;
use tour_store::app_config::BookingConfig;

use crate::session_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub supplier: Arc<dyn TourSupplier>,
    pub sessions: Arc<SessionStore>,
    pub booking: BookingConfig,
}
