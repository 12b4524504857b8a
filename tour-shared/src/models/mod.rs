pub mod availability;
pub mod booking;
pub mod participants;
pub mod tour_option;
