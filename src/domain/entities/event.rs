use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl From<i64> for PlaceId {
    fn from(value: i64) -> Self {
        PlaceId(value)
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId(value)
    }
}

impl From<EventId> for i64 {
    fn from(value: EventId) -> Self {
        value.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Opened,
    Closed,
    Paused,
    Cancelled,
    Aborted,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Opened,
        EventStatus::Closed,
        EventStatus::Paused,
        EventStatus::Cancelled,
        EventStatus::Aborted,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EventStatus::Opened => "OPENED",
            EventStatus::Closed => "CLOSED",
            EventStatus::Paused => "PAUSED",
            EventStatus::Cancelled => "CANCELLED",
            EventStatus::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseEnumError {
                kind: "event status",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceType {
    #[default]
    Common,
    Sports,
    Party,
}

impl PlaceType {
    pub const ALL: [PlaceType; 3] = [PlaceType::Common, PlaceType::Sports, PlaceType::Party];

    pub const fn as_str(self) -> &'static str {
        match self {
            PlaceType::Common => "COMMON",
            PlaceType::Sports => "SPORTS",
            PlaceType::Party => "PARTY",
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        PlaceType::ALL
            .into_iter()
            .find(|place_type| place_type.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseEnumError {
                kind: "place type",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlace {
    pub place_type: PlaceType,
    pub place_name: String,
    pub address: String,
    pub phone_number: String,
    pub capacity: i32,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub place_id: PlaceId,
    pub event_name: String,
    pub event_status: EventStatus,
    pub event_start_datetime: NaiveDateTime,
    pub event_end_datetime: NaiveDateTime,
    pub current_number_of_people: i32,
    pub capacity: i32,
    pub memo: Option<String>,
}

/// Flattened, read-only row of an event joined with its owning place.
///
/// Built fresh for every query and never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventViewRow {
    pub id: EventId,
    pub place_name: String,
    pub event_name: String,
    pub event_status: EventStatus,
    pub event_start_datetime: NaiveDateTime,
    pub event_end_datetime: NaiveDateTime,
    pub current_number_of_people: i32,
    pub capacity: i32,
    pub memo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_status_parses_case_insensitively() {
        assert_eq!("OPENED".parse::<EventStatus>(), Ok(EventStatus::Opened));
        assert_eq!(" cancelled ".parse::<EventStatus>(), Ok(EventStatus::Cancelled));
        assert!("OPEN".parse::<EventStatus>().is_err());
    }

    #[test]
    fn event_status_round_trips_through_its_name() {
        for status in EventStatus::ALL {
            assert_eq!(status.as_str().parse::<EventStatus>(), Ok(status));
        }
    }

    #[test]
    fn place_type_rejects_unknown_names() {
        let err = "STADIUM".parse::<PlaceType>().expect_err("unknown place type should fail");
        assert_eq!(err.to_string(), "unknown place type: STADIUM");
    }

    #[test]
    fn view_row_serializes_with_camel_case_fields() {
        let start = NaiveDateTime::parse_from_str("2021-01-01 09:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("fixture datetime should parse");
        let end = NaiveDateTime::parse_from_str("2021-01-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("fixture datetime should parse");
        let row = EventViewRow {
            id: EventId(1),
            place_name: "서울 배드민턴장".to_string(),
            event_name: "운동1".to_string(),
            event_status: EventStatus::Opened,
            event_start_datetime: start,
            event_end_datetime: end,
            current_number_of_people: 0,
            capacity: 24,
            memo: None,
        };

        let json = serde_json::to_value(&row).expect("view row should serialize");

        assert_eq!(json["placeName"], "서울 배드민턴장");
        assert_eq!(json["eventStatus"], "OPENED");
        assert_eq!(json["eventStartDatetime"], "2021-01-01T09:00:00");
        assert_eq!(json["id"], 1);
    }
}
