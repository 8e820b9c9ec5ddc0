use crate::handlers::{
    balance_sheet::{get_balance, get_balance_sheet, get_financial_planner, set_balance},
    health::health_check,
    one_offs::{create_one_off, delete_one_off, get_one_off, get_one_offs, update_one_off},
    recurring::{
        create_recurring, delete_recurring, get_recurring, get_recurring_rules, update_recurring,
    },
    users::{create_user, get_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Users
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/:user_id", get(get_user))
        // One-off transactions
        .route(
            "/api/v1/users/:user_id/one-offs",
            get(get_one_offs).post(create_one_off),
        )
        .route(
            "/api/v1/users/:user_id/one-offs/:one_off_id",
            get(get_one_off).put(update_one_off).delete(delete_one_off),
        )
        // Recurring rules
        .route(
            "/api/v1/users/:user_id/recurring",
            get(get_recurring_rules).post(create_recurring),
        )
        .route(
            "/api/v1/users/:user_id/recurring/:recurring_id",
            get(get_recurring).put(update_recurring).delete(delete_recurring),
        )
        // Balance and projections
        .route(
            "/api/v1/users/:user_id/balance",
            get(get_balance).put(set_balance),
        )
        .route("/api/v1/users/:user_id/balance-sheet", get(get_balance_sheet))
        .route(
            "/api/v1/users/:user_id/financial-planner",
            get(get_financial_planner),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
