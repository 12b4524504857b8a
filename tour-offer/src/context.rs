use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tour_core::query::{AvailabilityQuery, TourOptionsQuery};
use tour_core::CoreResult;
use tour_shared::{Participants, TourOption};

/// The tour being browsed, set once when the availability page is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourContext {
    pub tour_id: i64,
    pub contract_id: String,
    pub travel_date: String,
    #[serde(default)]
    pub participants: Participants,
}

impl TourContext {
    pub fn new(tour_id: i64, contract_id: impl Into<String>, travel_date: impl Into<String>) -> Self {
        Self {
            tour_id,
            contract_id: contract_id.into(),
            travel_date: travel_date.into(),
            participants: Participants::default(),
        }
    }

    pub fn with_participants(mut self, participants: Participants) -> Self {
        self.participants = participants;
        self
    }

    /// Validates the context on the way
    pub fn options_query(&self) -> CoreResult<TourOptionsQuery> {
        TourOptionsQuery::new(self.tour_id, &self.contract_id, &self.travel_date, self.participants)
    }

    pub fn availability_query(&self, option: &TourOption) -> AvailabilityQuery {
        AvailabilityQuery::for_option(option, &self.travel_date, &self.contract_id, self.participants)
    }

    pub fn travel_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.travel_date, "%Y-%m-%d").ok()
    }
}
