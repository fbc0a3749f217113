use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::models::User;
use crate::store::Store;
use crate::utils::error::AppError;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated actor for a request, resolved from the session
/// token against the store. Handlers that need identity take this as an
/// argument; an invalid or missing token rejects with 401 before the
/// handler runs.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Store> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, store: &Store) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::AuthError("Missing session token".to_string()))?;

        let user = store
            .session_user(&token)
            .await
            .ok_or_else(|| AppError::AuthError("Session is invalid or expired".to_string()))?;

        Ok(CurrentUser(user))
    }
}

/// Token from the session cookie, falling back to a bearer header for
/// non-browser clients.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}
