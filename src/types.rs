use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stylist {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i32,
    pub duration_minutes: i32,
    pub description: String,
}

/// One contiguous span of a stylist's working hours on a given day.
/// Times are minute granularity, `start < end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkInterval {
    pub id: Uuid,
    pub stylist_id: Uuid,
    pub day: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Reserved,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reserved" => Some(Self::Reserved),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// An appointment is never deleted, only moved from Reserved to Cancelled.
/// Its duration is not stored; it is the sum of its services' durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub stylist_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityRequest {
    pub stylist_id: Uuid,
    pub day: NaiveDate,
    #[validate(length(min = 1, message = "at least one service must be requested"))]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationRequest {
    pub stylist_id: Uuid,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    #[validate(length(min = 1, message = "at least one service must be requested"))]
    pub service_ids: Vec<Uuid>,
    #[serde(default)]
    #[validate(length(max = 500, message = "notes are limited to 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkIntervalRequest {
    pub stylist_id: Uuid,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Continuous range of valid start times within one free block. Any start
/// between `earliest_start` and `latest_start` inclusive fits the requested
/// duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeWindow {
    pub earliest_start: NaiveTime,
    pub latest_start: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub total_duration_minutes: i32,
    pub windows: Vec<FreeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationPreview {
    pub stylist_name: String,
    pub services: Vec<Service>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub total_duration_minutes: i32,
    pub total_price_cents: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationConfirmation {
    pub appointment_id: Uuid,
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_serializes_lowercase_and_round_trips() {
        assert_eq!(
            serde_json::to_value(AppointmentStatus::Reserved).unwrap(),
            serde_json::json!("reserved")
        );
        let parsed: AppointmentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::parse("reserved"), Some(AppointmentStatus::Reserved));
        assert_eq!(AppointmentStatus::parse("unknown"), None);
    }

    #[test]
    fn availability_omits_the_reason_when_windows_exist() {
        let availability = DayAvailability {
            total_duration_minutes: 30,
            windows: vec![FreeWindow {
                earliest_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                latest_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            }],
            reason: None,
        };
        let value = serde_json::to_value(&availability).unwrap();
        assert!(value.get("reason").is_none());
        assert_eq!(value["total_duration_minutes"], 30);
    }
}
