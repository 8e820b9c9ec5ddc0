use crate::handlers::users::require_user;
use crate::handlers::{database_error, not_found, not_owner, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use model::entities::one_off_transaction;
use model::repository::select_upcoming_one_offs;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for creating a one-off transaction
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateOneOffRequest {
    /// Display name
    #[validate(length(max = 255))]
    pub name: Option<String>,
    /// Amount (positive for income, negative for expense)
    pub amount: Decimal,
    /// Booking date
    pub date: NaiveDate,
    /// Whether this is a salary payment (default: false)
    pub is_salary: Option<bool>,
}

/// Request body for updating a one-off transaction
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate, Default)]
pub struct UpdateOneOffRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub is_salary: Option<bool>,
}

/// One-off transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OneOffResponse {
    pub id: i32,
    pub name: Option<String>,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub is_salary: bool,
    pub owner_id: i32,
}

impl From<one_off_transaction::Model> for OneOffResponse {
    fn from(model: one_off_transaction::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            date: model.date,
            is_salary: model.is_salary,
            owner_id: model.owner_id,
        }
    }
}

async fn find_owned(
    db: &DatabaseConnection,
    user_id: i32,
    one_off_id: i32,
) -> Result<one_off_transaction::Model, ApiError> {
    require_user(db, user_id).await?;

    match one_off_transaction::Entity::find_by_id(one_off_id).one(db).await {
        Ok(Some(model)) if model.owner_id == user_id => Ok(model),
        Ok(Some(_)) => Err(not_owner("One-off transaction", one_off_id, user_id)),
        Ok(None) => Err(not_found("One-off transaction", one_off_id)),
        Err(db_error) => Err(database_error(
            "Failed to retrieve one-off transaction",
            db_error,
        )),
    }
}

/// Create a one-off transaction
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/one-offs",
    tag = "one-offs",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
    ),
    request_body = CreateOneOffRequest,
    responses(
        (status = 201, description = "One-off transaction created successfully", body = ApiResponse<OneOffResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_one_off(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateOneOffRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<OneOffResponse>>), ApiError> {
    trace!("Entering create_one_off function for user_id: {}", user_id);
    require_user(&state.db, user_id).await?;

    let new_one_off = one_off_transaction::ActiveModel {
        name: Set(request.name.clone()),
        amount: Set(request.amount),
        date: Set(request.date),
        is_salary: Set(request.is_salary.unwrap_or(false)),
        owner_id: Set(user_id),
        ..Default::default()
    };

    match new_one_off.insert(&state.db).await {
        Ok(model) => {
            info!(
                "One-off transaction created with ID: {}, amount: {}, date: {}",
                model.id, model.amount, model.date
            );
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: OneOffResponse::from(model),
                    message: "One-off transaction created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(db_error) => Err(database_error(
            "Failed to create one-off transaction",
            db_error,
        )),
    }
}

/// List upcoming one-off transactions (dated today or later)
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/one-offs",
    tag = "one-offs",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "One-off transactions retrieved successfully", body = ApiResponse<Vec<OneOffResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_one_offs(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OneOffResponse>>>, ApiError> {
    trace!("Entering get_one_offs function for user_id: {}", user_id);
    require_user(&state.db, user_id).await?;

    let today = Utc::now().date_naive();
    match select_upcoming_one_offs(user_id, today).all(&state.db).await {
        Ok(models) => {
            debug!("Retrieved {} upcoming one-off transactions", models.len());
            Ok(Json(ApiResponse {
                data: models.into_iter().map(OneOffResponse::from).collect(),
                message: "One-off transactions retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => Err(database_error(
            "Failed to retrieve one-off transactions",
            db_error,
        )),
    }
}

/// Get a one-off transaction
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/one-offs/{one_off_id}",
    tag = "one-offs",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("one_off_id" = i32, Path, description = "One-off transaction ID"),
    ),
    responses(
        (status = 200, description = "One-off transaction retrieved successfully", body = ApiResponse<OneOffResponse>),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_one_off(
    Path((user_id, one_off_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OneOffResponse>>, ApiError> {
    let model = find_owned(&state.db, user_id, one_off_id).await?;

    Ok(Json(ApiResponse {
        data: OneOffResponse::from(model),
        message: "One-off transaction retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a one-off transaction
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/one-offs/{one_off_id}",
    tag = "one-offs",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("one_off_id" = i32, Path, description = "One-off transaction ID"),
    ),
    request_body = UpdateOneOffRequest,
    responses(
        (status = 200, description = "One-off transaction updated successfully", body = ApiResponse<OneOffResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_one_off(
    Path((user_id, one_off_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateOneOffRequest>>,
) -> Result<Json<ApiResponse<OneOffResponse>>, ApiError> {
    let existing = find_owned(&state.db, user_id, one_off_id).await?;

    let mut active: one_off_transaction::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(Some(name));
    }
    if let Some(amount) = request.amount {
        active.amount = Set(amount);
    }
    if let Some(date) = request.date {
        active.date = Set(date);
    }
    if let Some(is_salary) = request.is_salary {
        active.is_salary = Set(is_salary);
    }

    match active.update(&state.db).await {
        Ok(model) => {
            info!("One-off transaction {} updated successfully", one_off_id);
            Ok(Json(ApiResponse {
                data: OneOffResponse::from(model),
                message: "One-off transaction updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => Err(database_error(
            "Failed to update one-off transaction",
            db_error,
        )),
    }
}

/// Delete a one-off transaction
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/one-offs/{one_off_id}",
    tag = "one-offs",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("one_off_id" = i32, Path, description = "One-off transaction ID"),
    ),
    responses(
        (status = 200, description = "One-off transaction deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_one_off(
    Path((user_id, one_off_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let existing = find_owned(&state.db, user_id, one_off_id).await?;

    match one_off_transaction::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await
    {
        Ok(result) => {
            debug!("Delete affected {} rows", result.rows_affected);
            info!("One-off transaction {} deleted successfully", one_off_id);
            Ok(Json(ApiResponse {
                data: format!("One-off transaction {} deleted", one_off_id),
                message: "One-off transaction deleted successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => Err(database_error(
            "Failed to delete one-off transaction",
            db_error,
        )),
    }
}
