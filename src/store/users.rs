use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{Session, User};
use crate::store::Store;
use crate::utils::error::AppError;

const TOKEN_LEN: usize = 32;

/// Salted SHA-256, keyed by the user id so equal passwords do not
/// produce equal digests.
fn hash_password(user_id: Uuid, password: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", user_id, password).as_bytes());
    format!("{:x}", digest)
}

fn mint_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Random password for seeded demo accounts; nobody is meant to log
/// into them.
pub(crate) fn seed_password() -> String {
    mint_token()
}

impl Store {
    /// Creates a user account. Emails are unique; a duplicate signup is
    /// a validation failure rather than a silent second account.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let mut inner = self.write().await;

        if inner
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::ValidationError(format!(
                "A user with email '{}' already exists",
                email
            )));
        }

        let id = Uuid::new_v4();
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(id, password),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());

        self.persist(&inner).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn user_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let inner = self.read().await;
        inner
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' was not found", id)))
    }

    /// All users in signup order.
    pub async fn list_users(&self) -> Vec<User> {
        let inner = self.read().await;
        inner.users.clone()
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        let inner = self.read().await;
        inner
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Verifies credentials and opens a session. The error is the same
    /// for an unknown email and a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let mut inner = self.write().await;

        let user = inner
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if user.password_hash != hash_password(user.id, password) {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        let session = Session {
            token: mint_token(),
            user_id: user.id,
            created_at: Utc::now(),
        };
        inner.sessions.insert(session.token.clone(), session.clone());

        tracing::info!(user_id = %user.id, "Session opened");
        Ok(session)
    }

    /// Drops the session if it exists. Logging out with a dead token is
    /// not an error.
    pub async fn logout(&self, token: &str) {
        let mut inner = self.write().await;
        if inner.sessions.remove(token).is_some() {
            tracing::info!("Session closed");
        }
    }

    /// Resolves a token to its user. The single source of truth for
    /// "who is the current actor".
    pub async fn session_user(&self, token: &str) -> Option<User> {
        let inner = self.read().await;
        let session = inner.sessions.get(token)?;
        inner
            .users
            .iter()
            .find(|u| u.id == session.user_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signup_login_and_resolve_session() {
        let store = Store::in_memory();
        let user = store
            .create_user("Ana", "ana@example.com", "hunter2")
            .await
            .unwrap();

        let session = store.login("ana@example.com", "hunter2").await.unwrap();
        let resolved = store.session_user(&session.token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let store = Store::in_memory();
        store
            .create_user("Ana", "ana@example.com", "hunter2")
            .await
            .unwrap();

        let err = store.login("ana@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));

        let err = store.login("ghost@example.com", "hunter2").await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = Store::in_memory();
        store
            .create_user("Ana", "ana@example.com", "pw")
            .await
            .unwrap();

        let err = store
            .create_user("Other", "Ana@Example.com", "pw2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let store = Store::in_memory();
        store
            .create_user("Ana", "ana@example.com", "pw")
            .await
            .unwrap();
        let session = store.login("ana@example.com", "pw").await.unwrap();

        store.logout(&session.token).await;
        assert!(store.session_user(&session.token).await.is_none());

        // Second logout with the same token is a no-op.
        store.logout(&session.token).await;
    }

    #[test]
    fn equal_passwords_hash_differently_per_user() {
        let a = hash_password(Uuid::new_v4(), "same");
        let b = hash_password(Uuid::new_v4(), "same");
        assert_ne!(a, b);
    }
}
