use crate::config::{build_app_state, Settings};
use crate::router::create_router;
use crate::schemas::AppState;
use axum::Router;
use migration::{Migrator, MigratorTrait};
use model::entities::user;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create AppState for testing with two registered users (ids 1 and 2)
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;

    for username in ["test_user1", "test_user2"] {
        user::ActiveModel {
            username: Set(username.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to create test user");
    }

    build_app_state(db, &Settings::default()).expect("Failed to build test state")
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is determined by the RUST_LOG environment variable,
/// defaulting to WARN if not set.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing together with the state it runs on
pub async fn setup_test_app_with_state() -> (Router, AppState) {
    let state = setup_test_app_state().await;
    (create_router(state.clone()), state)
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    setup_test_app_with_state().await.0
}
