use crate::handlers::{database_error, ApiError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: String,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Looks up the user a request is scoped to, answering 404 if it does not exist.
pub(crate) async fn require_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<user::Model, ApiError> {
    match user::Entity::find_by_id(user_id).one(db).await {
        Ok(Some(user_model)) => Ok(user_model),
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("User with id {} does not exist", user_id),
                    "USER_NOT_FOUND",
                )),
            ))
        }
        Err(db_error) => Err(database_error(
            &format!("Failed to look up user {}", user_id),
            db_error,
        )),
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateUserRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering create_user function");
    debug!("Creating user with username: {}", request.username);

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User created successfully with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = db_error.sql_err() {
                warn!("Username '{}' already exists", request.username);
                return Err((
                    StatusCode::CONFLICT,
                    Json(ErrorResponse::new(
                        format!("Username '{}' already exists", request.username),
                        "USERNAME_ALREADY_EXISTS",
                    )),
                ));
            }
            error!("Failed to create user '{}': {}", request.username, db_error);
            Err(database_error("Failed to create user", db_error))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let user_model = require_user(&state.db, user_id).await?;
    info!(
        "Successfully retrieved user with ID: {}, username: {}",
        user_model.id, user_model.username
    );

    Ok(Json(ApiResponse {
        data: UserResponse::from(user_model),
        message: "User retrieved successfully".to_string(),
        success: true,
    }))
}
