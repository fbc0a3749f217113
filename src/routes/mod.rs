use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, hsts_enabled_from_env};
use crate::handlers::{auth, events, health_check, users};
use crate::store::Store;

pub fn create_routes(store: Store) -> Router {
    let include_hsts = hsts_enabled_from_env();

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/check", get(auth::check))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/",
            get(events::list_events).post(events::create_event),
        )
        .route("/events/registered", get(events::registered_events))
        .route("/events/organizer", get(events::organizer_events))
        .route("/events/category", get(events::by_category))
        .route("/events/search", get(events::search))
        .route("/events/:id", get(events::get_event))
        .route(
            "/events/:id/register",
            post(events::register).delete(events::cancel),
        )
        .route("/events/:id/attendees", get(events::list_attendees))
        .route("/events/:id/organizer", get(events::event_with_attendees))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer())
                .layer(middleware::from_fn(move |req, next| {
                    apply_security_headers(req, next, include_hsts)
                })),
        )
        .with_state(store)
}
