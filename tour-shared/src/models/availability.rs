use serde::{Deserialize, Serialize};

/// Status code the supplier returns for a bookable option
pub const AVAILABLE_STATUS: i64 = 1;

/// Message attached to the synthetic result recorded when the check itself fails
pub const CHECK_FAILED_MESSAGE: &str = "Failed to check availability";

/// Live availability of one tour option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub tour_option_id: i64,
    pub status: i64,
    pub message: Option<String>,
}

impl AvailabilityResult {
    /// A missing status is treated the same as any non-success code
    pub fn from_status(tour_option_id: i64, status: Option<i64>, message: Option<String>) -> Self {
        Self {
            tour_option_id,
            status: status.unwrap_or(0),
            message,
        }
    }

    pub fn check_failed(tour_option_id: i64) -> Self {
        Self {
            tour_option_id,
            status: 0,
            message: Some(CHECK_FAILED_MESSAGE.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == AVAILABLE_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_status_one_is_available() {
        assert!(AvailabilityResult::from_status(1, Some(1), None).is_available());
        assert!(!AvailabilityResult::from_status(1, Some(0), None).is_available());
        assert!(!AvailabilityResult::from_status(1, Some(2), None).is_available());
        assert!(!AvailabilityResult::from_status(1, None, None).is_available());
    }

    #[test]
    fn test_check_failed_carries_message() {
        let result = AvailabilityResult::check_failed(7);
        assert_eq!(result.status, 0);
        assert_eq!(result.message.as_deref(), Some(CHECK_FAILED_MESSAGE));
    }
}
