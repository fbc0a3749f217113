use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{Attendee, Event, Session, User};
use crate::utils::error::AppError;

pub mod attendees;
pub mod events;
pub mod seed;
pub mod users;

pub use attendees::registration_status;

/// All mutable state, guarded by a single lock so every operation that
/// touches both an event and its attendees commits as one unit.
/// Collections keep insertion order; lookups are linear scans, which is
/// fine at this scale.
#[derive(Default)]
pub struct StoreInner {
    pub(crate) events: Vec<Event>,
    pub(crate) attendees: Vec<Attendee>,
    pub(crate) users: Vec<User>,
    pub(crate) sessions: HashMap<String, Session>,
}

/// On-disk shape: the two domain collections plus users. Sessions are
/// deliberately not persisted; a restart logs everyone out.
#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    events: Vec<Event>,
    attendees: Vec<Attendee>,
    users: Vec<User>,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<StoreInner>>,
    snapshot_path: Option<PathBuf>,
}

impl Store {
    /// Opens a store backed by a JSON snapshot file, creating an empty
    /// store when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let inner = match std::fs::read(&path) {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                tracing::info!(
                    path = %path.display(),
                    events = snapshot.events.len(),
                    attendees = snapshot.attendees.len(),
                    users = snapshot.users.len(),
                    "Loaded snapshot"
                );
                StoreInner {
                    events: snapshot.events,
                    attendees: snapshot.attendees,
                    users: snapshot.users,
                    sessions: HashMap::new(),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No snapshot found, starting empty");
                StoreInner::default()
            }
            Err(e) => return Err(AppError::StorageError(e)),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
            snapshot_path: Some(path),
        })
    }

    /// Store without a backing file. Used by tests and available as an
    /// explicit ephemeral mode.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            snapshot_path: None,
        }
    }

    pub(crate) async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().await
    }

    /// Writes the snapshot while the caller still holds the write lock,
    /// so a mutation and its persistence are a single logical step.
    pub(crate) async fn persist(&self, inner: &StoreInner) -> Result<(), AppError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            events: inner.events.clone(),
            attendees: inner.attendees.clone(),
            users: inner.users.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(AppError::StorageError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateEvent;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    fn sample_event() -> CreateEvent {
        CreateEvent {
            title: "Rust Meetup".to_string(),
            description: "Monthly meetup".to_string(),
            location: "Community Hall".to_string(),
            category: "tech".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            capacity: 10,
            price: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = Store::open(&path).unwrap();
        let organizer = store
            .create_user("Org", "org@example.com", "secret")
            .await
            .unwrap();
        let event = store.create_event(&organizer, sample_event()).await.unwrap();

        let reopened = Store::open(&path).unwrap();
        let events = reopened.list_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, event.id);
        assert_eq!(events[0].title, "Rust Meetup");

        let user = reopened.user_by_email("org@example.com").await;
        assert!(user.is_some());
    }

    #[tokio::test]
    async fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("absent.json")).unwrap();
        assert!(store.list_events().await.is_empty());
    }

    #[tokio::test]
    async fn sessions_do_not_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = Store::open(&path).unwrap();
        store
            .create_user("Ana", "ana@example.com", "pw")
            .await
            .unwrap();
        let session = store.login("ana@example.com", "pw").await.unwrap();

        let reopened = Store::open(&path).unwrap();
        assert!(reopened.session_user(&session.token).await.is_none());
    }
}
