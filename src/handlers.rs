pub mod balance_sheet;
pub mod health;
pub mod one_offs;
pub mod recurring;
pub mod users;

use crate::schemas::ErrorResponse;
use axum::{http::StatusCode, response::Json};
use sea_orm::DbErr;
use tracing::{error, warn};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn database_error(context: &str, db_error: DbErr) -> ApiError {
    error!("{}: {}", context, db_error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(context, "DATABASE_ERROR")),
    )
}

pub(crate) fn not_found(what: &str, id: i32) -> ApiError {
    warn!("{} with ID {} not found", what, id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            format!("{} with id {} does not exist", what, id),
            "NOT_FOUND",
        )),
    )
}

/// Answer for a record that exists but belongs to another user.
pub(crate) fn not_owner(what: &str, id: i32, user_id: i32) -> ApiError {
    warn!("User {} tried to access {} {} owned by someone else", user_id, what, id);
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse::new(
            format!("{} {} does not belong to user {}", what, id, user_id),
            "FORBIDDEN",
        )),
    )
}

pub(crate) fn validation_error(message: impl Into<String>) -> ApiError {
    let message = message.into();
    warn!("Rejecting request: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, "VALIDATION_ERROR")),
    )
}
