use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::attendee::Attendee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    /// Derives the display status from the event's start instant.
    /// Events have no stored end time; anything that started earlier
    /// today still counts as ongoing.
    pub fn derive(date: NaiveDate, time: NaiveTime, now: DateTime<Utc>) -> Self {
        let starts_at = date.and_time(time).and_utc();
        if now < starts_at {
            EventStatus::Upcoming
        } else if now.date_naive() == date {
            EventStatus::Ongoing
        } else {
            EventStatus::Completed
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Maximum confirmed attendees. Immutable after creation.
    pub capacity: i32,
    /// Denormalized count of attendee records for this event, waitlist
    /// included. Only the attendee operations write this field.
    pub registered_count: i32,
    /// Zero denotes a free event.
    pub price: Decimal,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub organizer_email: String,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.time).and_utc()
    }
}

/// Fields accepted when an organizer creates an event. Identity fields
/// come from the session, never from the request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub capacity: i32,
    #[serde(default)]
    pub price: Decimal,
}

/// Partial update merged over an existing event. Absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub price: Option<Decimal>,
    pub status: Option<EventStatus>,
}

/// Organizer view of an event: the record plus its full attendee list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithAttendees {
    #[serde(flatten)]
    pub event: Event,
    pub attendees: Vec<Attendee>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn status_is_upcoming_before_start() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        let status = EventStatus::derive(date(2024, 2, 15), time(14, 0), now);
        assert_eq!(status, EventStatus::Upcoming);
    }

    #[test]
    fn status_is_ongoing_after_start_same_day() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 15, 30, 0).unwrap();
        let status = EventStatus::derive(date(2024, 2, 15), time(14, 0), now);
        assert_eq!(status, EventStatus::Ongoing);
    }

    #[test]
    fn status_is_completed_after_event_day() {
        let now = Utc.with_ymd_and_hms(2024, 2, 16, 9, 0, 0).unwrap();
        let status = EventStatus::derive(date(2024, 2, 15), time(14, 0), now);
        assert_eq!(status, EventStatus::Completed);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&EventStatus::Upcoming).unwrap();
        assert_eq!(json, "\"upcoming\"");
    }
}
