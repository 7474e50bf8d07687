use dotenvy::dotenv;
use partner_portal::{
    config::{database, portal},
    errors::Result,
    telemetry,
    web::{AppState, router},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 2. Configuration, then tracing at the configured level
    let config = portal::load_default_config()?;
    telemetry::init(&config.log_level)?;
    info!(site_origin = %config.site_origin, "configuration loaded");

    // 3. Database and schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Serve
    let addr = config.server.socket_addr()?;
    let app = router(AppState::new(db, config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "partner portal listening");

    axum::serve(listener, app).await?;
    Ok(())
}
