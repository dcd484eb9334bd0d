//! User endpoints.
//!
//! Envelope: `{ message, data? }` on success, `{ message, error }` on
//! failure. Validation failures share the 400 status with unclassified
//! errors, unlike the product endpoints.

use super::{json_body, parse_flag, parse_id};
use crate::error::AppError;
use crate::models::{PageRequest, UserFilter, UserProfile};
use crate::validators;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};

const NOT_FOUND_MESSAGE: &str = "User not found";
const UNAUTHORIZED_MESSAGE: &str = "Invalid credentials or account is inactive";

#[derive(Debug)]
pub struct UserApiError {
    context: &'static str,
    error: AppError,
}

impl UserApiError {
    pub fn new(context: &'static str, error: impl Into<AppError>) -> Self {
        Self {
            context,
            error: error.into(),
        }
    }

    /// For `map_err`: attaches the operation's failure message.
    fn context<E: Into<AppError>>(context: &'static str) -> impl FnOnce(E) -> Self {
        move |error| Self::new(context, error)
    }

    fn not_found() -> Self {
        Self::new(NOT_FOUND_MESSAGE, AppError::NotFound)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.error {
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "message": NOT_FOUND_MESSAGE })),
            AppError::Conflict(message) => (StatusCode::CONFLICT, json!({ "message": message })),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": UNAUTHORIZED_MESSAGE }),
            ),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": self.context, "error": errors.to_string() }),
            ),
            AppError::Unclassified(message) => {
                tracing::error!(context = self.context, error = %message, "User request failed");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": self.context, "error": message }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub is_active: Option<String>,
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Value>, UserApiError> {
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    let filter = UserFilter {
        search: query.search.filter(|search| !search.is_empty()),
        is_active: parse_flag(query.is_active.as_deref()),
    };

    let users = state
        .user_service
        .list_users(filter, page)
        .await
        .map_err(UserApiError::context("Failed to retrieve users"))?;

    Ok(Json(json!({
        "message": "Users retrieved successfully",
        "data": users,
    })))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, UserApiError> {
    const CONTEXT: &str = "Failed to create user";

    let body = json_body(body).map_err(UserApiError::context(CONTEXT))?;
    let payload =
        validators::validate_create_user(&body).map_err(UserApiError::context(CONTEXT))?;

    let user = state
        .user_service
        .create_user(payload)
        .await
        .map_err(UserApiError::context(CONTEXT))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "data": user,
        })),
    )
        .into_response())
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, UserApiError> {
    let id = parse_id(&id).ok_or_else(UserApiError::not_found)?;

    let user = state
        .user_service
        .get_user(id)
        .await
        .map_err(UserApiError::context("Failed to retrieve user"))?;

    Ok(Json(json!({
        "message": "User retrieved successfully",
        "data": user,
    })))
}

/// PUT|PATCH /api/v1/users/{id}
///
/// The user is looked up before the body is validated, so an unknown id
/// answers 404 even for an invalid body.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, UserApiError> {
    const CONTEXT: &str = "Failed to update user";

    let id = parse_id(&id).ok_or_else(UserApiError::not_found)?;
    let user = state
        .user_service
        .get_user(id)
        .await
        .map_err(UserApiError::context(CONTEXT))?;

    let body = json_body(body).map_err(UserApiError::context(CONTEXT))?;
    let changes =
        validators::validate_update_user(&body).map_err(UserApiError::context(CONTEXT))?;

    let user = state
        .user_service
        .update_user(user, changes)
        .await
        .map_err(UserApiError::context(CONTEXT))?;

    Ok(Json(json!({
        "message": "User updated successfully",
        "data": user,
    })))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, UserApiError> {
    let id = parse_id(&id).ok_or_else(UserApiError::not_found)?;

    state
        .user_service
        .delete_user(id)
        .await
        .map_err(UserApiError::context("Failed to delete user"))?;

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// PATCH /api/v1/users/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, UserApiError> {
    let id = parse_id(&id).ok_or_else(UserApiError::not_found)?;

    let user = state
        .user_service
        .toggle_active(id)
        .await
        .map_err(UserApiError::context("Failed to toggle user status"))?;

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };

    Ok(Json(json!({
        "message": message,
        "data": user,
    })))
}

/// POST /api/v1/login
///
/// Unknown email, wrong password and inactive account all produce the same
/// 401 body.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, UserApiError> {
    const CONTEXT: &str = "Login failed";

    let body = json_body(body).map_err(UserApiError::context(CONTEXT))?;
    let credentials = validators::validate_login(&body).map_err(UserApiError::context(CONTEXT))?;

    let user = state
        .auth_service
        .authenticate(&credentials.email, &credentials.password)
        .await
        .map_err(UserApiError::context(CONTEXT))?
        .ok_or_else(|| UserApiError::new(CONTEXT, AppError::Unauthorized))?;

    Ok(Json(json!({
        "message": "Login successful",
        "data": { "user": UserProfile::from(&user) },
    })))
}
