use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tour_shared::TourOption;

/// Options sharing the same start time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: String,
    pub formatted_time: String,
    pub available_options: Vec<TourOption>,
}

impl TimeSlot {
    pub fn option_ids(&self) -> Vec<i64> {
        self.available_options.iter().map(|o| o.tour_option_id).collect()
    }
}

/// Partition options into slots keyed by raw start time.
///
/// Zero-padded "HH:MM" strings sort in time order, so slots come out in
/// ascending lexicographic order. Options keep their relative order within
/// a slot.
pub fn group_time_slots(options: &[TourOption]) -> Vec<TimeSlot> {
    let mut by_time: BTreeMap<&str, Vec<TourOption>> = BTreeMap::new();
    for option in options {
        by_time
            .entry(option.start_time.as_str())
            .or_default()
            .push(option.clone());
    }

    by_time
        .into_iter()
        .map(|(time, available_options)| TimeSlot {
            time: time.to_string(),
            formatted_time: format_slot_time(time),
            available_options,
        })
        .collect()
}

/// "14:30" -> "2:30 PM"; anything unparsable is shown as-is
pub fn format_slot_time(time: &str) -> String {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(t) => t.format("%-I:%M %p").to_string(),
        Err(_) => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn option(id: i64, start_time: &str) -> TourOption {
        serde_json::from_value(serde_json::json!({
            "tourId": 120,
            "tourOptionId": id,
            "startTime": start_time,
        }))
        .unwrap()
    }

    #[test]
    fn test_groups_by_start_time() {
        let options = vec![option(1, "09:00"), option(2, "09:00"), option(3, "14:30")];
        let slots = group_time_slots(&options);

        let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, vec!["09:00", "14:30"]);
        assert_eq!(slots[0].option_ids(), vec![1, 2]);
        assert_eq!(slots[1].option_ids(), vec![3]);
        assert_eq!(slots[0].formatted_time, "9:00 AM");
        assert_eq!(slots[1].formatted_time, "2:30 PM");
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let options = vec![
            option(5, "18:15"),
            option(1, "09:00"),
            option(7, "07:45"),
            option(2, "18:15"),
            option(9, "09:00"),
            option(3, "12:00"),
        ];
        let slots = group_time_slots(&options);

        let total: usize = slots.iter().map(|s| s.available_options.len()).sum();
        assert_eq!(total, options.len());

        let ids: HashSet<i64> = slots.iter().flat_map(|s| s.option_ids()).collect();
        let expected: HashSet<i64> = options.iter().map(|o| o.tour_option_id).collect();
        assert_eq!(ids, expected);

        for slot in &slots {
            assert!(slot.available_options.iter().all(|o| o.start_time == slot.time));
        }

        // Ascending and relative order kept inside a slot
        let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, vec!["07:45", "09:00", "12:00", "18:15"]);
        assert_eq!(slots[1].option_ids(), vec![1, 9]);
        assert_eq!(slots[3].option_ids(), vec![5, 2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_time_slots(&[]).is_empty());
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let options = vec![option(4, "10:00"), option(2, "08:00"), option(6, "10:00")];
        assert_eq!(group_time_slots(&options), group_time_slots(&options));
    }

    #[test]
    fn test_format_slot_time() {
        assert_eq!(format_slot_time("00:05"), "12:05 AM");
        assert_eq!(format_slot_time("12:00"), "12:00 PM");
        assert_eq!(format_slot_time("Flexible"), "Flexible");
    }
}
