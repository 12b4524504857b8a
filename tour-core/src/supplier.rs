use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tour_shared::TourOption;

use crate::query::{AvailabilityEnvelope, AvailabilityQuery, TourOptionsEnvelope, TourOptionsQuery};

#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Supplier responded with HTTP {0}")]
    Status(u16),
    #[error("Malformed supplier response: {0}")]
    Decode(String),
}

/// Backend that lists tour options and answers live availability
#[async_trait]
pub trait TourSupplier: Send + Sync {
    async fn fetch_tour_options(
        &self,
        query: &TourOptionsQuery,
    ) -> Result<TourOptionsEnvelope, SupplierError>;

    async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityEnvelope, SupplierError>;
}

/// In-memory supplier serving a fixed option list.
///
/// Options without a configured status answer `status: 1`. Availability
/// answers can be held back with [`StaticTourSupplier::hold_availability`]
/// to keep checks in flight.
pub struct StaticTourSupplier {
    options: Vec<TourOption>,
    statuscode: i64,
    fail_options: bool,
    availability: HashMap<i64, AvailabilityEnvelope>,
    fail_availability: HashSet<i64>,
    gate: Option<Arc<Semaphore>>,
    option_calls: AtomicUsize,
    availability_calls: AtomicUsize,
}

impl StaticTourSupplier {
    pub fn new(options: Vec<TourOption>) -> Self {
        Self {
            options,
            statuscode: 0,
            fail_options: false,
            availability: HashMap::new(),
            fail_availability: HashSet::new(),
            gate: None,
            option_calls: AtomicUsize::new(0),
            availability_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_status(mut self, tour_option_id: i64, status: i64, message: Option<&str>) -> Self {
        self.availability.insert(
            tour_option_id,
            AvailabilityEnvelope::with_status(status, message.map(str::to_string)),
        );
        self
    }

    pub fn with_statuscode(mut self, statuscode: i64) -> Self {
        self.statuscode = statuscode;
        self
    }

    pub fn failing_options(mut self) -> Self {
        self.fail_options = true;
        self
    }

    pub fn failing_availability(mut self, tour_option_id: i64) -> Self {
        self.fail_availability.insert(tour_option_id);
        self
    }

    /// Availability answers wait for a permit on the returned semaphore
    pub fn hold_availability(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn option_calls(&self) -> usize {
        self.option_calls.load(Ordering::SeqCst)
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TourSupplier for StaticTourSupplier {
    async fn fetch_tour_options(
        &self,
        query: &TourOptionsQuery,
    ) -> Result<TourOptionsEnvelope, SupplierError> {
        self.option_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_options {
            return Err(SupplierError::Transport("connection refused".to_string()));
        }

        let result = self
            .options
            .iter()
            .filter(|o| o.tour_id == query.tour_id)
            .cloned()
            .collect();
        Ok(TourOptionsEnvelope {
            statuscode: self.statuscode,
            result: Some(result),
        })
    }

    async fn check_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityEnvelope, SupplierError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| SupplierError::Transport(e.to_string()))?
                .forget();
        }

        if self.fail_availability.contains(&query.tour_option_id) {
            return Err(SupplierError::Transport("connection reset".to_string()));
        }

        Ok(self
            .availability
            .get(&query.tour_option_id)
            .cloned()
            .unwrap_or_else(|| AvailabilityEnvelope::with_status(1, None)))
    }
}
