use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state_with_url, Settings};
use crate::router::create_router;

pub async fn serve(settings: &Settings, database_url: &str, bind_address: &str) -> Result<()> {
    trace!("Entering serve function");
    info!("Budgetapp starting up");
    debug!("Database URL: {}", database_url);
    debug!("Bind address: {}", bind_address);

    let state = match initialize_app_state_with_url(database_url, settings).await {
        Ok(state) => {
            debug!(
                "Application state initialized, projecting with horizon {}",
                state.horizon
            );
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    run_server(create_router(state), bind_address).await
}

/// Binds `bind_address` and serves `app` until the server stops.
pub(crate) async fn run_server(app: Router, bind_address: &str) -> Result<()> {
    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Budgetapp API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
