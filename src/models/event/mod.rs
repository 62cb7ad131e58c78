// Event module
// Scheduling event definition as published by the event service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::slot::MINUTES_PER_DAY;

/// Slot durations the event service may publish, in minutes.
pub const VALID_SLOT_DURATIONS: [u16; 3] = [15, 30, 60];

/// A scheduling event: the date range and daily time window inside which
/// participants mark their availability.
///
/// Times are minutes from midnight; dates are pure calendar dates with no
/// timezone attached. The optional `timezone` field is a display label
/// chosen by the organizer, never used for arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: u16,
    pub end_time: u16,
    pub slot_duration: u16,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Event {
    /// Validate the event definition
    pub fn validate(&self) -> Result<(), String> {
        if self.slug.trim().is_empty() {
            return Err("Event slug cannot be empty".to_string());
        }

        if self.end_date < self.start_date {
            return Err("Event end date must not be before start date".to_string());
        }

        if self.start_time >= self.end_time || self.end_time > MINUTES_PER_DAY {
            return Err(format!(
                "Event time window {}..{} is invalid (need 0 <= start < end <= {})",
                self.start_time, self.end_time, MINUTES_PER_DAY
            ));
        }

        if !VALID_SLOT_DURATIONS.contains(&self.slot_duration) {
            return Err(format!(
                "Slot duration {} is not supported (must be 15, 30 or 60 minutes)",
                self.slot_duration
            ));
        }

        Ok(())
    }

    /// Number of grid rows that make up one hour
    pub fn slots_per_hour(&self) -> usize {
        (60 / self.slot_duration) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: "evt_1".to_string(),
            slug: "team-offsite".to_string(),
            title: "Team offsite".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            start_time: 540,
            end_time: 1020,
            slot_duration: 30,
            timezone: Some("Europe/Warsaw".to_string()),
        }
    }

    #[test]
    fn valid_event_passes_validation() {
        assert!(sample_event().validate().is_ok());
    }

    #[test]
    fn rejects_reversed_date_range() {
        let mut event = sample_event();
        event.end_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(event.validate().is_err());
    }

    #[test]
    fn rejects_reversed_or_oversized_time_window() {
        let mut event = sample_event();
        event.start_time = 1020;
        event.end_time = 540;
        assert!(event.validate().is_err());

        let mut event = sample_event();
        event.end_time = 1441;
        assert!(event.validate().is_err());
    }

    #[test]
    fn rejects_unsupported_slot_duration() {
        let mut event = sample_event();
        event.slot_duration = 20;
        assert!(event.validate().is_err());
    }

    #[test]
    fn slots_per_hour_matches_duration() {
        let mut event = sample_event();
        assert_eq!(event.slots_per_hour(), 2);
        event.slot_duration = 15;
        assert_eq!(event.slots_per_hour(), 4);
        event.slot_duration = 60;
        assert_eq!(event.slots_per_hour(), 1);
    }

    #[test]
    fn deserializes_service_payload() {
        let json = r#"{
            "id": "evt_9",
            "slug": "spring-sync",
            "title": "Spring sync",
            "description": null,
            "startDate": "2024-04-01",
            "endDate": "2024-04-05",
            "startTime": 480,
            "endTime": 1080,
            "slotDuration": 15,
            "timezone": "Europe/Warsaw"
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.slug, "spring-sync");
        assert_eq!(event.start_time, 480);
        assert!(event.validate().is_ok());
    }
}
