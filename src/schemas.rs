use common::{BalanceDto, BalanceSheetDto, EntryKind, FinancialPlannerDto, LedgerEntryDto};
use compute::horizon::HorizonPolicy;
use moka::future::Cache;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::balance_sheet::SetBalanceRequest;
use crate::handlers::one_offs::{CreateOneOffRequest, OneOffResponse, UpdateOneOffRequest};
use crate::handlers::recurring::{
    CreateRecurringRequest, RecurringResponse, UpdateRecurringRequest,
};
use crate::handlers::users::{CreateUserRequest, UserResponse};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Starting balance per user; a missing entry reads as zero
    pub balances: Cache<i32, Decimal>,
    /// How far balance sheets are projected
    pub horizon: HorizonPolicy,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::one_offs::create_one_off,
        crate::handlers::one_offs::get_one_offs,
        crate::handlers::one_offs::get_one_off,
        crate::handlers::one_offs::update_one_off,
        crate::handlers::one_offs::delete_one_off,
        crate::handlers::recurring::create_recurring,
        crate::handlers::recurring::get_recurring_rules,
        crate::handlers::recurring::get_recurring,
        crate::handlers::recurring::update_recurring,
        crate::handlers::recurring::delete_recurring,
        crate::handlers::balance_sheet::get_balance,
        crate::handlers::balance_sheet::set_balance,
        crate::handlers::balance_sheet::get_balance_sheet,
        crate::handlers::balance_sheet::get_financial_planner,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<OneOffResponse>,
            ApiResponse<Vec<OneOffResponse>>,
            ApiResponse<RecurringResponse>,
            ApiResponse<Vec<RecurringResponse>>,
            ApiResponse<BalanceDto>,
            ApiResponse<BalanceSheetDto>,
            ApiResponse<FinancialPlannerDto>,
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UserResponse,
            CreateOneOffRequest,
            UpdateOneOffRequest,
            OneOffResponse,
            CreateRecurringRequest,
            UpdateRecurringRequest,
            RecurringResponse,
            SetBalanceRequest,
            BalanceDto,
            BalanceSheetDto,
            FinancialPlannerDto,
            LedgerEntryDto,
            EntryKind,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registration"),
        (name = "one-offs", description = "One-off transactions"),
        (name = "recurring", description = "Recurring transaction rules"),
        (name = "balance-sheet", description = "Starting balance and projected ledger"),
    ),
    info(
        title = "Budgetapp API",
        description = "Personal finance tracker: recurring transactions, projected balance sheets and salary planning",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
