use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::participants::Participants;
use super::tour_option::TourOption;

/// Parameters handed to the booking form once an option is confirmed available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingIntent {
    pub tour_id: i64,
    pub option_id: i64,
    pub tour_date: String,
    pub start_time: String,
    pub transfer_id: i64,
    pub adult_price: Decimal,
    pub child_price: Decimal,
}

impl BookingIntent {
    pub fn for_option(option: &TourOption, tour_date: &str) -> Self {
        Self {
            tour_id: option.tour_id,
            option_id: option.tour_option_id,
            tour_date: tour_date.to_string(),
            start_time: option.start_time.clone(),
            transfer_id: option.transfer_id,
            adult_price: option.adult_price,
            child_price: option.child_price,
        }
    }

    /// Form-urlencoded query carrying the intent
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("tourId", &self.tour_id.to_string())
            .append_pair("optionId", &self.option_id.to_string())
            .append_pair("tourDate", &self.tour_date)
            .append_pair("startTime", &self.start_time)
            .append_pair("transferId", &self.transfer_id.to_string())
            .append_pair("adultPrice", &self.adult_price.to_string())
            .append_pair("childPrice", &self.child_price.to_string())
            .finish()
    }

    /// Location of the booking form with the intent attached
    pub fn handoff_location(&self, form_path: &str) -> String {
        let separator = if form_path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", form_path, separator, self.query_string())
    }

    /// Infants travel free
    pub fn estimated_total(&self, participants: &Participants) -> Decimal {
        self.adult_price * Decimal::from(participants.adults)
            + self.child_price * Decimal::from(participants.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn intent() -> BookingIntent {
        BookingIntent {
            tour_id: 120,
            option_id: 1,
            tour_date: "2025-03-10".to_string(),
            start_time: "09:00".to_string(),
            transfer_id: 41865,
            adult_price: dec!(150.00),
            child_price: dec!(75.50),
        }
    }

    #[test]
    fn test_query_string_encodes_every_field() {
        assert_eq!(
            intent().query_string(),
            "tourId=120&optionId=1&tourDate=2025-03-10&startTime=09%3A00&transferId=41865&adultPrice=150.00&childPrice=75.50"
        );
    }

    #[test]
    fn test_handoff_location_appends_to_existing_query() {
        assert!(intent().handoff_location("/booking-form").starts_with("/booking-form?tourId=120&"));
        assert!(intent().handoff_location("/booking-form?lang=en").starts_with("/booking-form?lang=en&tourId=120&"));
    }

    #[test]
    fn test_estimated_total() {
        let participants = Participants { adults: 2, children: 1, infants: 1 };
        assert_eq!(intent().estimated_total(&participants), dec!(375.50));
        assert_eq!(intent().estimated_total(&Participants::default()), dec!(150.00));
    }
}
