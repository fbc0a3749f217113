pub mod attendee;
pub mod event;
pub mod session;
pub mod user;

pub use attendee::{Attendee, AttendeeStatus, RegisterAttendee, UserType};
pub use event::{CreateEvent, Event, EventPatch, EventStatus, EventWithAttendees};
pub use session::Session;
pub use user::{AuthCheck, CreateUser, LoginRequest, LoginResponse, PublicUser, User};
