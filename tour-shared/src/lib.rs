pub mod models;

pub use models::availability::{AvailabilityResult, AVAILABLE_STATUS, CHECK_FAILED_MESSAGE};
pub use models::booking::BookingIntent;
pub use models::participants::Participants;
pub use models::tour_option::{TourOption, TransferType};
