use anyhow::Result;
use tracing::{debug, info, trace};

use super::initdb::{apply_migrations, connect};
use super::serve::run_server;
use crate::config::{build_app_state, Settings};
use crate::router::create_router;

pub async fn migrate_and_serve(
    settings: &Settings,
    database_url: &str,
    bind_address: &str,
) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", database_url);

    let db = connect(database_url).await?;
    apply_migrations(&db).await?;

    // The migrated connection is reused for serving
    let state = build_app_state(db, settings)?;
    debug!("Application state initialized successfully");

    run_server(create_router(state), bind_address).await
}
