use chrono::Utc;
use uuid::Uuid;

use crate::models::{CreateEvent, Event, EventPatch, EventStatus, User};
use crate::store::Store;
use crate::utils::error::AppError;

impl Store {
    /// Appends a new event owned by `organizer`. Field validation is the
    /// handler's job; the store only assigns the derived fields.
    pub async fn create_event(
        &self,
        organizer: &User,
        input: CreateEvent,
    ) -> Result<Event, AppError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            location: input.location,
            category: input.category,
            date: input.date,
            time: input.time,
            capacity: input.capacity,
            registered_count: 0,
            price: input.price,
            organizer_id: organizer.id,
            organizer_name: organizer.name.clone(),
            organizer_email: organizer.email.clone(),
            status: EventStatus::derive(input.date, input.time, now),
            created_at: now,
        };

        let mut inner = self.write().await;
        inner.events.push(event.clone());
        self.persist(&inner).await?;

        tracing::info!(event_id = %event.id, organizer_id = %organizer.id, "Event created");
        Ok(event)
    }

    pub async fn event_by_id(&self, id: Uuid) -> Result<Event, AppError> {
        let inner = self.read().await;
        inner
            .events
            .iter()
            .find(|event| event.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", id)))
    }

    /// All events in insertion order.
    pub async fn list_events(&self) -> Vec<Event> {
        let inner = self.read().await;
        inner.events.clone()
    }

    pub async fn events_by_organizer(&self, organizer_id: Uuid) -> Vec<Event> {
        let inner = self.read().await;
        inner
            .events
            .iter()
            .filter(|event| event.organizer_id == organizer_id)
            .cloned()
            .collect()
    }

    /// Events the given email holds a registration for, in event
    /// insertion order.
    pub async fn events_registered_by(&self, email: &str) -> Vec<Event> {
        let inner = self.read().await;
        inner
            .events
            .iter()
            .filter(|event| {
                inner
                    .attendees
                    .iter()
                    .any(|a| a.event_id == event.id && a.email.eq_ignore_ascii_case(email))
            })
            .cloned()
            .collect()
    }

    /// Merges the patch over the stored record. Capacity and the
    /// organizer fields are not patchable.
    pub async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Event, AppError> {
        let mut inner = self.write().await;
        let event = inner
            .events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", id)))?;

        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(category) = patch.category {
            event.category = category;
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(price) = patch.price {
            event.price = price;
        }
        if let Some(status) = patch.status {
            event.status = status;
        }

        let updated = event.clone();
        self.persist(&inner).await?;
        Ok(updated)
    }

    /// Case-insensitive substring match over title, description and
    /// location. Naive scan, same contract a server-side full-text
    /// query would satisfy.
    pub async fn search_events(&self, term: &str) -> Vec<Event> {
        let needle = term.to_lowercase();
        let inner = self.read().await;
        inner
            .events
            .iter()
            .filter(|event| {
                event.title.to_lowercase().contains(&needle)
                    || event.description.to_lowercase().contains(&needle)
                    || event.location.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Case-insensitive exact category match.
    pub async fn events_by_category(&self, category: &str) -> Vec<Event> {
        let inner = self.read().await;
        inner
            .events
            .iter()
            .filter(|event| event.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }
}
