use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::models::{CreateUser, PublicUser};
use crate::store::Store;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// `POST /users/` — open signup.
pub async fn create_user(
    State(store): State<Store>,
    Json(body): Json<CreateUser>,
) -> Result<Response, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(AppError::ValidationError(
            "A valid email is required".to_string(),
        ));
    }
    if body.password.is_empty() {
        return Err(AppError::ValidationError("Password is required".to_string()));
    }

    let user = store
        .create_user(body.name.trim(), body.email.trim(), &body.password)
        .await?;

    Ok(created(PublicUser::from(&user), "User created").into_response())
}

/// `GET /users/` — directory of accounts, session required.
pub async fn list_users(State(store): State<Store>, CurrentUser(_): CurrentUser) -> Response {
    let users: Vec<PublicUser> = store.list_users().await.iter().map(PublicUser::from).collect();
    success(users, "Users listed").into_response()
}

/// `GET /users/{id}` — profile lookup, session required.
pub async fn get_user(
    State(store): State<Store>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let user = store.user_by_id(id).await?;
    Ok(success(PublicUser::from(&user), "User found").into_response())
}
