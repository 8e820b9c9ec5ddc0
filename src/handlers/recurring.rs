use crate::handlers::users::require_user;
use crate::handlers::{database_error, not_found, not_owner, validation_error, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use model::entities::recurring_transaction::{self, BasePeriod};
use model::repository::select_active_rules;
use model::transaction::RecurringRule;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Request body for creating a recurring rule
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateRecurringRequest {
    /// Display name
    #[validate(length(max = 255))]
    pub name: Option<String>,
    /// Amount of every occurrence (positive for income, negative for expense)
    pub amount: Decimal,
    /// First occurrence
    pub start_date: NaiveDate,
    /// Last date an occurrence may fall on; open-ended when absent
    pub end_date: Option<NaiveDate>,
    /// One of daily, weekly, monthly, quarterly, annually
    #[schema(value_type = String, example = "monthly")]
    pub base_period: BasePeriod,
    /// Repeat every `frequency` periods (default: 1)
    #[validate(range(min = 1, max = 1000))]
    pub frequency: Option<i32>,
    /// Whether occurrences are salary payments (default: false)
    pub is_salary: Option<bool>,
}

fn validate_create_dates(request: &CreateRecurringRequest) -> Result<(), ValidationError> {
    match request.end_date {
        Some(end) if end < request.start_date => Err(ValidationError::new("end_before_start")),
        _ => Ok(()),
    }
}

/// Request body for updating a recurring rule
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate, Default)]
pub struct UpdateRecurringRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Removes the end date, making the rule open-ended
    pub clear_end_date: Option<bool>,
    #[schema(value_type = Option<String>, example = "weekly")]
    pub base_period: Option<BasePeriod>,
    #[validate(range(min = 1, max = 1000))]
    pub frequency: Option<i32>,
    pub is_salary: Option<bool>,
}

/// Recurring rule response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecurringResponse {
    pub id: i32,
    pub name: Option<String>,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(value_type = String)]
    pub base_period: BasePeriod,
    pub frequency: i32,
    pub is_salary: bool,
    pub owner_id: i32,
}

impl From<recurring_transaction::Model> for RecurringResponse {
    fn from(model: recurring_transaction::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            start_date: model.start_date,
            end_date: model.end_date,
            base_period: model.base_period,
            frequency: model.frequency,
            is_salary: model.is_salary,
            owner_id: model.owner_id,
        }
    }
}

async fn find_owned(
    db: &DatabaseConnection,
    user_id: i32,
    recurring_id: i32,
) -> Result<recurring_transaction::Model, ApiError> {
    require_user(db, user_id).await?;

    match recurring_transaction::Entity::find_by_id(recurring_id).one(db).await {
        Ok(Some(model)) if model.owner_id == user_id => Ok(model),
        Ok(Some(_)) => Err(not_owner("Recurring rule", recurring_id, user_id)),
        Ok(None) => Err(not_found("Recurring rule", recurring_id)),
        Err(db_error) => Err(database_error("Failed to retrieve recurring rule", db_error)),
    }
}

/// Create a recurring rule
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/recurring",
    tag = "recurring",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
    ),
    request_body = CreateRecurringRequest,
    responses(
        (status = 201, description = "Recurring rule created successfully", body = ApiResponse<RecurringResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_recurring(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateRecurringRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<RecurringResponse>>), ApiError> {
    trace!("Entering create_recurring function for user_id: {}", user_id);
    require_user(&state.db, user_id).await?;

    let new_rule = recurring_transaction::ActiveModel {
        name: Set(request.name.clone()),
        amount: Set(request.amount),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        base_period: Set(request.base_period),
        frequency: Set(request.frequency.unwrap_or(1)),
        is_salary: Set(request.is_salary.unwrap_or(false)),
        owner_id: Set(user_id),
        ..Default::default()
    };

    match new_rule.insert(&state.db).await {
        Ok(model) => {
            info!(
                "Recurring rule created with ID: {}, amount: {}, every {} {:?}",
                model.id, model.amount, model.frequency, model.base_period
            );
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: RecurringResponse::from(model),
                    message: "Recurring rule created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(db_error) => Err(database_error("Failed to create recurring rule", db_error)),
    }
}

/// List recurring rules that have not ended yet
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/recurring",
    tag = "recurring",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
    ),
    responses(
        (status = 200, description = "Recurring rules retrieved successfully", body = ApiResponse<Vec<RecurringResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_recurring_rules(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RecurringResponse>>>, ApiError> {
    trace!("Entering get_recurring_rules function for user_id: {}", user_id);
    require_user(&state.db, user_id).await?;

    let today = Utc::now().date_naive();
    match select_active_rules(user_id, today).all(&state.db).await {
        Ok(models) => {
            debug!("Retrieved {} active recurring rules", models.len());
            Ok(Json(ApiResponse {
                data: models.into_iter().map(RecurringResponse::from).collect(),
                message: "Recurring rules retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => Err(database_error("Failed to retrieve recurring rules", db_error)),
    }
}

/// Get a recurring rule
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/recurring/{recurring_id}",
    tag = "recurring",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("recurring_id" = i32, Path, description = "Recurring rule ID"),
    ),
    responses(
        (status = 200, description = "Recurring rule retrieved successfully", body = ApiResponse<RecurringResponse>),
        (status = 403, description = "Rule belongs to another user", body = ErrorResponse),
        (status = 404, description = "Rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_recurring(
    Path((user_id, recurring_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RecurringResponse>>, ApiError> {
    let model = find_owned(&state.db, user_id, recurring_id).await?;

    Ok(Json(ApiResponse {
        data: RecurringResponse::from(model),
        message: "Recurring rule retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update a recurring rule
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/recurring/{recurring_id}",
    tag = "recurring",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("recurring_id" = i32, Path, description = "Recurring rule ID"),
    ),
    request_body = UpdateRecurringRequest,
    responses(
        (status = 200, description = "Recurring rule updated successfully", body = ApiResponse<RecurringResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Rule belongs to another user", body = ErrorResponse),
        (status = 404, description = "Rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_recurring(
    Path((user_id, recurring_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateRecurringRequest>>,
) -> Result<Json<ApiResponse<RecurringResponse>>, ApiError> {
    let existing = find_owned(&state.db, user_id, recurring_id).await?;

    let mut updated = existing.clone();
    if let Some(name) = request.name {
        updated.name = Some(name);
    }
    if let Some(amount) = request.amount {
        updated.amount = amount;
    }
    if let Some(start_date) = request.start_date {
        updated.start_date = start_date;
    }
    if request.clear_end_date.unwrap_or(false) {
        updated.end_date = None;
    } else if let Some(end_date) = request.end_date {
        updated.end_date = Some(end_date);
    }
    if let Some(base_period) = request.base_period {
        updated.base_period = base_period;
    }
    if let Some(frequency) = request.frequency {
        updated.frequency = frequency;
    }
    if let Some(is_salary) = request.is_salary {
        updated.is_salary = is_salary;
    }

    // The merged rule has to be well-formed, not only the patch
    if let Err(reason) = RecurringRule::from(updated.clone()).validate() {
        return Err(validation_error(reason.to_string()));
    }

    let mut active: recurring_transaction::ActiveModel = existing.into();
    active.name = Set(updated.name);
    active.amount = Set(updated.amount);
    active.start_date = Set(updated.start_date);
    active.end_date = Set(updated.end_date);
    active.base_period = Set(updated.base_period);
    active.frequency = Set(updated.frequency);
    active.is_salary = Set(updated.is_salary);

    match active.update(&state.db).await {
        Ok(model) => {
            info!("Recurring rule {} updated successfully", recurring_id);
            Ok(Json(ApiResponse {
                data: RecurringResponse::from(model),
                message: "Recurring rule updated successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => Err(database_error("Failed to update recurring rule", db_error)),
    }
}

/// Delete a recurring rule
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/recurring/{recurring_id}",
    tag = "recurring",
    params(
        ("user_id" = i32, Path, description = "Owner user ID"),
        ("recurring_id" = i32, Path, description = "Recurring rule ID"),
    ),
    responses(
        (status = 200, description = "Recurring rule deleted successfully", body = ApiResponse<String>),
        (status = 403, description = "Rule belongs to another user", body = ErrorResponse),
        (status = 404, description = "Rule not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_recurring(
    Path((user_id, recurring_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let existing = find_owned(&state.db, user_id, recurring_id).await?;

    match recurring_transaction::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await
    {
        Ok(result) => {
            debug!("Delete affected {} rows", result.rows_affected);
            info!("Recurring rule {} deleted successfully", recurring_id);
            Ok(Json(ApiResponse {
                data: format!("Recurring rule {} deleted", recurring_id),
                message: "Recurring rule deleted successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => Err(database_error("Failed to delete recurring rule", db_error)),
    }
}
