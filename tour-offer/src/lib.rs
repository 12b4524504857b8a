pub mod aggregator;
pub mod availability;
pub mod checker;
pub mod context;
pub mod fetcher;

pub use aggregator::{AggregatorView, BookingError, OptionView, SelectionError, SlotView, TourOptionAggregator};
pub use availability::{AvailabilityBoard, AvailabilityState};
pub use checker::{AvailabilityChecker, CheckOutcome};
pub use context::TourContext;
pub use fetcher::TourOptionFetcher;
