//! Handlers for the four collection operations.
//!
//! Wire contract:
//! - `GET /users` -- 200 with all records, ascending by id
//! - `POST /users` -- 201 with the inserted record, 422 on a blank field
//! - `PUT /users/{id}` -- 200 with the updated record, 404 for unknown ids
//! - `DELETE /users/{id}` -- 204 always (delete is idempotent)
//!
//! Every non-2xx response carries an [`ErrorBody`] envelope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use roster_core::{ErrorBody, User, UserDraft, UserId};

use crate::storage::{StoreError, UserStore};

use super::AppState;

/// Returns the full collection, ordered ascending by id.
pub async fn list_users_handler(State(state): State<AppState>) -> Json<Vec<User>> {
    let _guard = state.shutdown.in_flight_guard();
    Json(state.store.list())
}

/// Inserts a new record with a server-assigned id.
///
/// Mirrors the client-side submit gate: a draft with a blank field (after
/// trimming) is rejected with 422 rather than stored.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(draft): Json<UserDraft>,
) -> Response {
    let _guard = state.shutdown.in_flight_guard();

    if !draft.is_complete() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::new("name and email must be non-empty")),
        )
            .into_response();
    }

    let user = state.store.insert(&draft);
    debug!("created user {}", user.id);
    (StatusCode::CREATED, Json(user)).into_response()
}

/// Replaces the name and email of the record matching the path id.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(draft): Json<UserDraft>,
) -> Response {
    let _guard = state.shutdown.in_flight_guard();

    if !draft.is_complete() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::new("name and email must be non-empty")),
        )
            .into_response();
    }

    match state.store.update(id, &draft) {
        Ok(user) => Json(user).into_response(),
        Err(err @ StoreError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, Json(ErrorBody::new(err.to_string()))).into_response()
        }
    }
}

/// Deletes the record matching the path id, if any.
///
/// Deleting an unknown id is not an error -- the operation matches zero
/// rows and succeeds, so retries and races are harmless.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> StatusCode {
    let _guard = state.shutdown.in_flight_guard();

    if !state.store.remove(id) {
        debug!("delete matched no row for user {id}");
    }
    StatusCode::NO_CONTENT
}
