use crate::handlers::users::require_user;
use crate::handlers::ApiError;
use crate::helpers::converters::{sheet_to_dto, sheet_to_planner_dto};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use common::{BalanceDto, BalanceSheetDto, FinancialPlannerDto};
use compute::error::ComputeError;
use compute::ledger::{BalanceSheet, Projector};
use model::repository::DbRepository;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

/// Request body for setting the starting balance
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetBalanceRequest {
    /// Balance the projection starts from
    pub balance: Decimal,
}

/// Query parameters for projection endpoints
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectionQuery {
    /// Project as of this date instead of the current date (YYYY-MM-DD)
    pub today: Option<NaiveDate>,
}

fn projection_error(err: ComputeError) -> ApiError {
    match err {
        ComputeError::InvalidRule { .. } => {
            warn!("Projection rejected a recurring rule: {}", err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(err.to_string(), "INVALID_RULE")),
            )
        }
        ComputeError::Repository(_) => {
            error!("Failed to load transactions for projection: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to load transactions",
                    "DATABASE_ERROR",
                )),
            )
        }
        ComputeError::Date(_) => {
            error!("Projection failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string(), "PROJECTION_ERROR")),
            )
        }
    }
}

async fn stored_balance(state: &AppState, user_id: i32) -> Decimal {
    state.balances.get(&user_id).await.unwrap_or(Decimal::ZERO)
}

async fn project_for(
    state: &AppState,
    user_id: i32,
    today: Option<NaiveDate>,
    starting_balance: Decimal,
) -> Result<BalanceSheet, ApiError> {
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let projector = Projector::new(today, state.horizon);
    let repository = DbRepository::new(state.db.clone());

    projector
        .project_for_owner(&repository, user_id, starting_balance)
        .await
        .map_err(projection_error)
}

/// Get the stored starting balance
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/balance",
    tag = "balance-sheet",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = ApiResponse<BalanceDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_balance(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BalanceDto>>, ApiError> {
    require_user(&state.db, user_id).await?;
    let balance = stored_balance(&state, user_id).await;
    debug!("Stored balance for user {}: {}", user_id, balance);

    Ok(Json(ApiResponse {
        data: BalanceDto { user_id, balance },
        message: "Balance retrieved successfully".to_string(),
        success: true,
    }))
}

/// Set the starting balance
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/balance",
    tag = "balance-sheet",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = SetBalanceRequest,
    responses(
        (status = 200, description = "Balance stored successfully", body = ApiResponse<BalanceDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn set_balance(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<SetBalanceRequest>,
) -> Result<Json<ApiResponse<BalanceDto>>, ApiError> {
    require_user(&state.db, user_id).await?;
    state.balances.insert(user_id, request.balance).await;
    info!("Starting balance of user {} set to {}", user_id, request.balance);

    Ok(Json(ApiResponse {
        data: BalanceDto {
            user_id,
            balance: request.balance,
        },
        message: "Balance stored successfully".to_string(),
        success: true,
    }))
}

/// Get the projected balance sheet
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/balance-sheet",
    tag = "balance-sheet",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ProjectionQuery,
    ),
    responses(
        (status = 200, description = "Balance sheet computed successfully", body = ApiResponse<BalanceSheetDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "A recurring rule cannot be evaluated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_balance_sheet(
    Path(user_id): Path<i32>,
    Query(query): Query<ProjectionQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BalanceSheetDto>>, ApiError> {
    trace!("Entering get_balance_sheet function for user_id: {}", user_id);
    require_user(&state.db, user_id).await?;

    let starting_balance = stored_balance(&state, user_id).await;
    let sheet = project_for(&state, user_id, query.today, starting_balance).await?;
    info!(
        "Balance sheet for user {} has {} entries, closing at {}",
        user_id,
        sheet.len(),
        sheet.closing_balance()
    );

    Ok(Json(ApiResponse {
        data: sheet_to_dto(user_id, &sheet),
        message: "Balance sheet computed successfully".to_string(),
        success: true,
    }))
}

/// Get the salary view of a projection started from a zero balance
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/financial-planner",
    tag = "balance-sheet",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ProjectionQuery,
    ),
    responses(
        (status = 200, description = "Financial plan computed successfully", body = ApiResponse<FinancialPlannerDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "A recurring rule cannot be evaluated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_financial_planner(
    Path(user_id): Path<i32>,
    Query(query): Query<ProjectionQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FinancialPlannerDto>>, ApiError> {
    trace!("Entering get_financial_planner function for user_id: {}", user_id);
    require_user(&state.db, user_id).await?;

    let sheet = project_for(&state, user_id, query.today, Decimal::ZERO).await?;
    debug!(
        "Financial plan for user {} covers {} salary entries",
        user_id,
        sheet.salary_entries().count()
    );

    Ok(Json(ApiResponse {
        data: sheet_to_planner_dto(user_id, &sheet),
        message: "Financial plan computed successfully".to_string(),
        success: true,
    }))
}
