use chrono::Utc;
use uuid::Uuid;

use crate::models::{Attendee, AttendeeStatus, UserType};
use crate::store::Store;
use crate::utils::error::AppError;

/// Capacity decision, evaluated against the count *before* the new
/// record is added: the capacity-th registrant is confirmed, the one
/// after goes on the waitlist. There is no promotion path back off the
/// waitlist when a confirmed attendee cancels.
pub fn registration_status(capacity: i32, registered_count: i32) -> AttendeeStatus {
    if registered_count < capacity {
        AttendeeStatus::Confirmed
    } else {
        AttendeeStatus::Waitlist
    }
}

/// Person details resolved by the handler before registration.
#[derive(Debug, Clone)]
pub struct Registrant {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_type: UserType,
}

impl Store {
    /// Registers a person for an event and bumps the event's
    /// denormalized count in the same lock scope. Waitlisted
    /// registrants count toward the displayed total, matching the
    /// numbers users see.
    pub async fn register_attendee(
        &self,
        event_id: Uuid,
        registrant: Registrant,
    ) -> Result<Attendee, AppError> {
        let mut inner = self.write().await;

        let event = inner
            .events
            .iter_mut()
            .find(|event| event.id == event_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Event with id '{}' was not found", event_id))
            })?;

        let status = registration_status(event.capacity, event.registered_count);
        event.registered_count += 1;

        let attendee = Attendee {
            id: Uuid::new_v4(),
            event_id,
            name: registrant.name,
            email: registrant.email,
            phone: registrant.phone,
            registration_date: Utc::now(),
            status,
            user_type: registrant.user_type,
        };
        inner.attendees.push(attendee.clone());

        self.persist(&inner).await?;

        tracing::info!(
            event_id = %event_id,
            attendee_id = %attendee.id,
            status = ?attendee.status,
            "Attendee registered"
        );
        Ok(attendee)
    }

    /// Removes every registration matching (event, email) and decrements
    /// the event's count by one, floored at zero. Statuses of the
    /// remaining attendees are untouched.
    pub async fn cancel_registration(&self, event_id: Uuid, email: &str) -> Result<(), AppError> {
        let mut inner = self.write().await;

        if !inner.events.iter().any(|event| event.id == event_id) {
            return Err(AppError::NotFound(format!(
                "Event with id '{}' was not found",
                event_id
            )));
        }

        let before = inner.attendees.len();
        inner
            .attendees
            .retain(|a| !(a.event_id == event_id && a.email.eq_ignore_ascii_case(email)));

        if inner.attendees.len() == before {
            return Err(AppError::NotFound(format!(
                "No registration for '{}' on event '{}'",
                email, event_id
            )));
        }

        if let Some(event) = inner.events.iter_mut().find(|event| event.id == event_id) {
            if event.registered_count > 0 {
                event.registered_count -= 1;
            }
        }

        self.persist(&inner).await?;

        tracing::info!(event_id = %event_id, email = %email, "Registration cancelled");
        Ok(())
    }

    pub async fn attendees_by_event(&self, event_id: Uuid) -> Vec<Attendee> {
        let inner = self.read().await;
        inner
            .attendees
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect()
    }

    pub async fn attendees_by_user(&self, email: &str) -> Vec<Attendee> {
        let inner = self.read().await;
        inner
            .attendees
            .iter()
            .filter(|a| a.email.eq_ignore_ascii_case(email))
            .cloned()
            .collect()
    }

    pub async fn is_registered(&self, event_id: Uuid, email: &str) -> bool {
        self.attendees_by_user(email)
            .await
            .iter()
            .any(|a| a.event_id == event_id)
    }

    /// Attendee ids for an event, the shape the register endpoint
    /// returns.
    pub async fn attendee_ids_for_event(&self, event_id: Uuid) -> Vec<Uuid> {
        let inner = self.read().await;
        inner
            .attendees
            .iter()
            .filter(|a| a.event_id == event_id)
            .map(|a| a.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEvent, Event, User};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    fn registrant(name: &str, email: &str) -> Registrant {
        Registrant {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            user_type: UserType::Participant,
        }
    }

    async fn event_with_capacity(store: &Store, capacity: i32) -> (User, Event) {
        let organizer = store
            .create_user("Organizer", "org@example.com", "secret")
            .await
            .unwrap();
        let event = store
            .create_event(
                &organizer,
                CreateEvent {
                    title: "Capacity Test".to_string(),
                    description: "".to_string(),
                    location: "Hall".to_string(),
                    category: "tech".to_string(),
                    date: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
                    time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    capacity,
                    price: Decimal::ZERO,
                },
            )
            .await
            .unwrap();
        (organizer, event)
    }

    #[test]
    fn policy_boundary_at_capacity() {
        assert_eq!(registration_status(2, 0), AttendeeStatus::Confirmed);
        assert_eq!(registration_status(2, 1), AttendeeStatus::Confirmed);
        assert_eq!(registration_status(2, 2), AttendeeStatus::Waitlist);
        assert_eq!(registration_status(2, 5), AttendeeStatus::Waitlist);
    }

    #[tokio::test]
    async fn register_for_missing_event_fails() {
        let store = Store::in_memory();
        let err = store
            .register_attendee(Uuid::new_v4(), registrant("A", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn waitlist_starts_past_capacity_and_count_includes_waitlist() {
        let store = Store::in_memory();
        let (_, event) = event_with_capacity(&store, 2).await;

        let a = store
            .register_attendee(event.id, registrant("A", "a@example.com"))
            .await
            .unwrap();
        let b = store
            .register_attendee(event.id, registrant("B", "b@example.com"))
            .await
            .unwrap();
        let c = store
            .register_attendee(event.id, registrant("C", "c@example.com"))
            .await
            .unwrap();

        assert_eq!(a.status, AttendeeStatus::Confirmed);
        assert_eq!(b.status, AttendeeStatus::Confirmed);
        assert_eq!(c.status, AttendeeStatus::Waitlist);

        let event = store.event_by_id(event.id).await.unwrap();
        assert_eq!(event.registered_count, 3);
    }

    #[tokio::test]
    async fn cancel_decrements_without_promoting_waitlist() {
        let store = Store::in_memory();
        let (_, event) = event_with_capacity(&store, 2).await;

        store
            .register_attendee(event.id, registrant("A", "a@example.com"))
            .await
            .unwrap();
        store
            .register_attendee(event.id, registrant("B", "b@example.com"))
            .await
            .unwrap();
        store
            .register_attendee(event.id, registrant("C", "c@example.com"))
            .await
            .unwrap();

        store
            .cancel_registration(event.id, "a@example.com")
            .await
            .unwrap();

        let event = store.event_by_id(event.id).await.unwrap();
        assert_eq!(event.registered_count, 2);

        let remaining = store.attendees_by_event(event.id).await;
        assert_eq!(remaining.len(), 2);
        let b = remaining.iter().find(|a| a.email == "b@example.com").unwrap();
        let c = remaining.iter().find(|a| a.email == "c@example.com").unwrap();
        assert_eq!(b.status, AttendeeStatus::Confirmed);
        // C stays waitlisted even though a confirmed spot opened up.
        assert_eq!(c.status, AttendeeStatus::Waitlist);
    }

    #[tokio::test]
    async fn count_tracks_attendee_records_across_mixed_operations() {
        let store = Store::in_memory();
        let (_, event) = event_with_capacity(&store, 3).await;

        for email in ["a@x.com", "b@x.com", "c@x.com", "d@x.com"] {
            store
                .register_attendee(event.id, registrant("P", email))
                .await
                .unwrap();
        }
        store.cancel_registration(event.id, "b@x.com").await.unwrap();
        store
            .register_attendee(event.id, registrant("E", "e@x.com"))
            .await
            .unwrap();
        store.cancel_registration(event.id, "a@x.com").await.unwrap();

        let event = store.event_by_id(event.id).await.unwrap();
        let attendees = store.attendees_by_event(event.id).await;
        assert_eq!(event.registered_count as usize, attendees.len());
    }

    #[tokio::test]
    async fn duplicate_registration_creates_second_record_and_cancel_drifts() {
        let store = Store::in_memory();
        let (_, event) = event_with_capacity(&store, 5).await;

        // No duplicate guard: the same email registers twice and both
        // records count toward the total.
        store
            .register_attendee(event.id, registrant("A", "a@example.com"))
            .await
            .unwrap();
        store
            .register_attendee(event.id, registrant("A", "a@example.com"))
            .await
            .unwrap();

        let fetched = store.event_by_id(event.id).await.unwrap();
        assert_eq!(fetched.registered_count, 2);
        assert_eq!(store.attendees_by_event(event.id).await.len(), 2);

        // Cancellation removes every matching record but decrements the
        // count only once, so the count drifts to 1 with zero records.
        store
            .cancel_registration(event.id, "a@example.com")
            .await
            .unwrap();

        let fetched = store.event_by_id(event.id).await.unwrap();
        assert_eq!(fetched.registered_count, 1);
        assert!(store.attendees_by_event(event.id).await.is_empty());
        assert!(!store.is_registered(event.id, "a@example.com").await);
    }

    #[tokio::test]
    async fn cancel_unknown_registration_is_not_found() {
        let store = Store::in_memory();
        let (_, event) = event_with_capacity(&store, 2).await;

        let err = store
            .cancel_registration(event.id, "ghost@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let event = store.event_by_id(event.id).await.unwrap();
        assert_eq!(event.registered_count, 0);
    }

    #[tokio::test]
    async fn is_registered_reflects_registration_lifecycle() {
        let store = Store::in_memory();
        let (_, event) = event_with_capacity(&store, 5).await;

        assert!(!store.is_registered(event.id, "a@example.com").await);

        store
            .register_attendee(event.id, registrant("A", "a@example.com"))
            .await
            .unwrap();
        assert!(store.is_registered(event.id, "A@Example.com").await);

        store
            .cancel_registration(event.id, "a@example.com")
            .await
            .unwrap();
        assert!(!store.is_registered(event.id, "a@example.com").await);
    }

    #[tokio::test]
    async fn registrations_for_user_span_events() {
        let store = Store::in_memory();
        let (organizer, first) = event_with_capacity(&store, 5).await;
        let second = store
            .create_event(
                &organizer,
                CreateEvent {
                    title: "Second".to_string(),
                    description: "".to_string(),
                    location: "Hall".to_string(),
                    category: "tech".to_string(),
                    date: NaiveDate::from_ymd_opt(2030, 2, 1).unwrap(),
                    time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    capacity: 5,
                    price: Decimal::ZERO,
                },
            )
            .await
            .unwrap();

        store
            .register_attendee(first.id, registrant("A", "a@example.com"))
            .await
            .unwrap();
        store
            .register_attendee(second.id, registrant("A", "a@example.com"))
            .await
            .unwrap();
        store
            .register_attendee(second.id, registrant("B", "b@example.com"))
            .await
            .unwrap();

        assert_eq!(store.attendees_by_user("a@example.com").await.len(), 2);
        assert_eq!(store.events_registered_by("a@example.com").await.len(), 2);
        assert_eq!(store.events_registered_by("b@example.com").await.len(), 1);
    }
}
