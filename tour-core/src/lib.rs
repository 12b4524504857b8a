pub mod query;
pub mod slots;
pub mod supplier;

pub use query::{AvailabilityEnvelope, AvailabilityQuery, TourOptionsEnvelope, TourOptionsQuery};
pub use slots::{format_slot_time, group_time_slots, TimeSlot};
pub use supplier::{StaticTourSupplier, SupplierError, TourSupplier};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
