use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A live login. Sessions exist only in process memory; restarting the
/// server invalidates every token, which callers detect through
/// `GET /auth/check` and treat as a normal expiry.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
