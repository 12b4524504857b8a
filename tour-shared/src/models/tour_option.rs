use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category of transport bundled with a tour option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferType {
    Sharing,
    Private,
    Luxury,
    Other(String),
}

impl TransferType {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Sharing Transfers" => Self::Sharing,
            "Private Transfers" => Self::Private,
            "Luxury Transfers" => Self::Luxury,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One bookable configuration of a tour (start time, transfer, pricing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourOption {
    pub tour_id: i64,
    pub tour_option_id: i64,
    #[serde(default)]
    pub transfer_id: i64,
    #[serde(default)]
    pub transfer_name: String,
    /// Zero-padded "HH:MM"
    pub start_time: String,
    #[serde(default)]
    pub adult_price: Decimal,
    #[serde(default)]
    pub child_price: Decimal,
    #[serde(default)]
    pub minimum_pax: i32,
    /// Hours before the start time after which the option can no longer be booked
    #[serde(default)]
    pub cut_off: i32,
    #[serde(default)]
    pub allow_todays_booking: bool,
    /// Free-text schedule description
    #[serde(default)]
    pub departure_time: Option<String>,
}

impl TourOption {
    pub fn transfer_type(&self) -> TransferType {
        TransferType::from_name(&self.transfer_name)
    }

    /// Whether the booking window for `travel_date` has already closed at `now`.
    ///
    /// Informational only: the booking gate is driven by live availability.
    pub fn cutoff_passed(&self, travel_date: NaiveDate, now: NaiveDateTime) -> bool {
        let today = now.date();
        if travel_date < today {
            return true;
        }
        if travel_date == today && !self.allow_todays_booking {
            return true;
        }

        let Ok(start) = NaiveTime::parse_from_str(&self.start_time, "%H:%M") else {
            return false;
        };
        let starts_at = travel_date.and_time(start);
        now > starts_at - Duration::hours(i64::from(self.cut_off))
    }
}
