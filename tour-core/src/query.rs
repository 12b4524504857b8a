use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tour_shared::{AvailabilityResult, Participants, TourOption};

use crate::{CoreError, CoreResult};

/// Body of the tour options query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourOptionsQuery {
    pub tour_id: i64,
    pub contract_id: String,
    pub travel_date: String,
    pub no_of_adult: u32,
    pub no_of_child: u32,
    pub no_of_infant: u32,
}

impl TourOptionsQuery {
    pub fn new(
        tour_id: i64,
        contract_id: &str,
        travel_date: &str,
        participants: Participants,
    ) -> CoreResult<Self> {
        let query = Self {
            tour_id,
            contract_id: contract_id.trim().to_string(),
            travel_date: travel_date.trim().to_string(),
            no_of_adult: participants.adults,
            no_of_child: participants.children,
            no_of_infant: participants.infants,
        };
        query.validate()?;
        Ok(query)
    }

    /// Tour, contract and date must all be present before anything is sent
    pub fn validate(&self) -> CoreResult<()> {
        if self.tour_id <= 0 {
            return Err(CoreError::ValidationError("tour id is required".to_string()));
        }
        if self.contract_id.trim().is_empty() {
            return Err(CoreError::ValidationError("contract id is required".to_string()));
        }
        if self.travel_date.trim().is_empty() {
            return Err(CoreError::ValidationError("travel date is required".to_string()));
        }
        NaiveDate::parse_from_str(&self.travel_date, "%Y-%m-%d").map_err(|_| {
            CoreError::ValidationError(format!(
                "travel date '{}' is not a YYYY-MM-DD date",
                self.travel_date
            ))
        })?;
        Ok(())
    }
}

/// Response of the tour options query; `statuscode` 0 means success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourOptionsEnvelope {
    pub statuscode: i64,
    #[serde(default)]
    pub result: Option<Vec<TourOption>>,
}

impl TourOptionsEnvelope {
    pub fn success(options: Vec<TourOption>) -> Self {
        Self {
            statuscode: 0,
            result: Some(options),
        }
    }

    pub fn is_success(&self) -> bool {
        self.statuscode == 0
    }

    pub fn into_options(self) -> Vec<TourOption> {
        self.result.unwrap_or_default()
    }
}

/// Body of the per-option availability query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub tour_id: i64,
    pub tour_option_id: i64,
    pub transfer_id: i64,
    pub travel_date: String,
    pub contract_id: String,
    pub adult: u32,
    pub child: u32,
    pub infant: u32,
}

impl AvailabilityQuery {
    pub fn for_option(
        option: &TourOption,
        travel_date: &str,
        contract_id: &str,
        participants: Participants,
    ) -> Self {
        Self {
            tour_id: option.tour_id,
            tour_option_id: option.tour_option_id,
            transfer_id: option.transfer_id,
            travel_date: travel_date.to_string(),
            contract_id: contract_id.to_string(),
            adult: participants.adults,
            child: participants.children,
            infant: participants.infants,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityStatus {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the availability query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityEnvelope {
    #[serde(default)]
    pub result: Option<AvailabilityStatus>,
}

impl AvailabilityEnvelope {
    pub fn with_status(status: i64, message: Option<String>) -> Self {
        Self {
            result: Some(AvailabilityStatus {
                status: Some(status),
                message,
            }),
        }
    }

    pub fn into_result(self, tour_option_id: i64) -> AvailabilityResult {
        let status = self.result.unwrap_or_default();
        AvailabilityResult::from_status(tour_option_id, status.status, status.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_options_query_wire_names() {
        let query = TourOptionsQuery::new(120, "300", "2025-03-10", Participants::default())
            .expect("valid query");
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "tourId": 120,
                "contractId": "300",
                "travelDate": "2025-03-10",
                "noOfAdult": 1,
                "noOfChild": 0,
                "noOfInfant": 0
            })
        );
    }

    #[test]
    fn test_options_query_rejects_missing_fields() {
        let p = Participants::default();
        assert!(matches!(
            TourOptionsQuery::new(0, "300", "2025-03-10", p),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            TourOptionsQuery::new(120, "  ", "2025-03-10", p),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            TourOptionsQuery::new(120, "300", "", p),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            TourOptionsQuery::new(120, "300", "10/03/2025", p),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn test_options_envelope() {
        let json = r#"{ "statuscode": 0, "result": [ { "tourId": 1, "tourOptionId": 9, "startTime": "09:00" } ] }"#;
        let envelope: TourOptionsEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.into_options().len(), 1);

        let failed: TourOptionsEnvelope =
            serde_json::from_str(r#"{ "statuscode": 1, "result": null }"#).unwrap();
        assert!(!failed.is_success());
        assert!(failed.into_options().is_empty());
    }

    #[test]
    fn test_availability_query_forwards_option_fields() {
        let option = TourOption {
            tour_id: 120,
            tour_option_id: 663,
            transfer_id: 41865,
            transfer_name: "Sharing Transfers".to_string(),
            start_time: "09:00".to_string(),
            adult_price: dec!(100),
            child_price: dec!(50),
            minimum_pax: 1,
            cut_off: 0,
            allow_todays_booking: true,
            departure_time: None,
        };
        let query = AvailabilityQuery::for_option(
            &option,
            "2025-03-10",
            "300",
            Participants { adults: 2, children: 1, infants: 0 },
        );
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["tourOptionId"], 663);
        assert_eq!(body["transferId"], 41865);
        assert_eq!(body["contractId"], "300");
        assert_eq!(body["adult"], 2);
        assert_eq!(body["child"], 1);
    }

    #[test]
    fn test_availability_envelope_into_result() {
        let ok: AvailabilityEnvelope = serde_json::from_str(r#"{ "result": { "status": 1 } }"#).unwrap();
        assert!(ok.into_result(1).is_available());

        let sold: AvailabilityEnvelope =
            serde_json::from_str(r#"{ "result": { "status": 0, "message": "No seats" } }"#).unwrap();
        let sold = sold.into_result(2);
        assert!(!sold.is_available());
        assert_eq!(sold.message.as_deref(), Some("No seats"));

        let empty: AvailabilityEnvelope = serde_json::from_str("{}").unwrap();
        assert!(!empty.into_result(3).is_available());
    }
}
