use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::{AuthCheck, LoginRequest, LoginResponse};
use crate::store::Store;
use crate::utils::auth::{clear_session_cookie, session_cookie, session_token, CurrentUser};
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

/// `POST /auth/login` — verifies credentials, opens a session and hands
/// the token back both as a cookie and in the body.
pub async fn login(
    State(store): State<Store>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let session = store.login(&body.email, &body.password).await?;

    let cookie = HeaderValue::from_str(&session_cookie(&session.token))
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie value: {}", e)))?;

    let mut response = success(
        LoginResponse {
            token: session.token,
        },
        "Login successful",
    )
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// `GET /auth/logout` — drops the session and expires the cookie.
/// Always succeeds; logging out twice is not an error.
pub async fn logout(State(store): State<Store>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        store.logout(&token).await;
    }

    let cookie = HeaderValue::from_str(&clear_session_cookie())
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie value: {}", e)))?;

    let mut response = empty_success("Logged out").into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// `GET /auth/check` — 200 with the user id when the session is live,
/// 401 otherwise (the extractor rejects before we get here).
pub async fn check(CurrentUser(user): CurrentUser) -> Response {
    success(AuthCheck { user_id: user.id }, "Session is valid").into_response()
}
