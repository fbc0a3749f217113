use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    Confirmed,
    Waitlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Participant,
    Organizer,
}

/// A registration record linking a person to an event. Cancellation
/// removes the record outright rather than flipping a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub status: AttendeeStatus,
    pub user_type: UserType,
}

/// Person details for a new registration. Name and email fall back to
/// the session user when the body omits them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
