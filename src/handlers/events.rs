use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CreateEvent, EventWithAttendees, RegisterAttendee, UserType};
use crate::store::attendees::Registrant;
use crate::store::Store;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
}

/// `GET /events/` — every event, in creation order.
pub async fn list_events(State(store): State<Store>) -> Response {
    let events = store.list_events().await;
    success(events, "Events listed").into_response()
}

/// `GET /events/{id}`
pub async fn get_event(
    State(store): State<Store>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = store.event_by_id(id).await?;
    Ok(success(event, "Event found").into_response())
}

/// `POST /events/` — creates an event owned by the session user.
/// Required-field and future-date checks live here; the store trusts
/// its input.
pub async fn create_event(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateEvent>,
) -> Result<Response, AppError> {
    validate_event(&body)?;
    let event = store.create_event(&user, body).await?;
    Ok(created(event, "Event created").into_response())
}

fn validate_event(input: &CreateEvent) -> Result<(), AppError> {
    for (value, label) in [
        (&input.title, "Title"),
        (&input.description, "Description"),
        (&input.location, "Location"),
        (&input.category, "Category"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::ValidationError(format!("{} is required", label)));
        }
    }
    if input.capacity <= 0 {
        return Err(AppError::ValidationError(
            "Capacity must be a positive number".to_string(),
        ));
    }
    if input.price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Price cannot be negative".to_string(),
        ));
    }
    let starts_at = input.date.and_time(input.time).and_utc();
    if starts_at <= Utc::now() {
        return Err(AppError::ValidationError(
            "Event date must be in the future".to_string(),
        ));
    }
    Ok(())
}

/// `GET /events/registered` — events the session user holds a
/// registration for.
pub async fn registered_events(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let events = store.events_registered_by(&user.email).await;
    success(events, "Registered events listed").into_response()
}

/// `GET /events/organizer` — events the session user created.
pub async fn organizer_events(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let events = store.events_by_organizer(user.id).await;
    success(events, "Organizer events listed").into_response()
}

/// `GET /events/category?category=`
pub async fn by_category(
    State(store): State<Store>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let events = store.events_by_category(&query.category).await;
    success(events, "Events filtered by category").into_response()
}

/// `GET /events/search?term=`
pub async fn search(State(store): State<Store>, Query(query): Query<SearchQuery>) -> Response {
    let events = store.search_events(&query.term).await;
    success(events, "Search results").into_response()
}

/// `POST /events/{id}/register` — registers the session user (or the
/// person named in the body) and returns the event's updated attendee
/// id list. Whether the spot is confirmed or waitlisted is the store's
/// capacity decision.
pub async fn register(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<RegisterAttendee>>,
) -> Result<Response, AppError> {
    let event = store.event_by_id(id).await?;
    let person = body.map(|Json(p)| p).unwrap_or_default();

    let user_type = if event.organizer_id == user.id {
        UserType::Organizer
    } else {
        UserType::Participant
    };

    let registrant = Registrant {
        name: person.name.unwrap_or_else(|| user.name.clone()),
        email: person.email.unwrap_or_else(|| user.email.clone()),
        phone: person.phone,
        user_type,
    };

    store.register_attendee(id, registrant).await?;
    let attendee_ids = store.attendee_ids_for_event(id).await;
    Ok(success(attendee_ids, "Registration recorded").into_response())
}

/// `DELETE /events/{id}/register` — cancels the session user's own
/// registration. Hard delete; nobody is promoted off the waitlist.
pub async fn cancel(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    store.cancel_registration(id, &user.email).await?;
    Ok(empty_success("Registration cancelled").into_response())
}

/// `GET /events/{id}/attendees` — attendee list, restricted to the
/// event's organizer.
pub async fn list_attendees(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = store.event_by_id(id).await?;
    if event.organizer_id != user.id {
        return Err(AppError::Forbidden(
            "Only the organizer can view attendees".to_string(),
        ));
    }

    let attendees = store.attendees_by_event(id).await;
    Ok(success(attendees, "Attendees listed").into_response())
}

/// `GET /events/{id}/organizer` — the organizer's combined view of an
/// event and its attendees.
pub async fn event_with_attendees(
    State(store): State<Store>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = store.event_by_id(id).await?;
    if event.organizer_id != user.id {
        return Err(AppError::Forbidden(
            "Only the organizer can view this event's details".to_string(),
        ));
    }

    let attendees = store.attendees_by_event(id).await;
    Ok(success(
        EventWithAttendees { event, attendees },
        "Event with attendees",
    )
    .into_response())
}
