use dotenvy::dotenv;
use loan_scenarios::{
    api::{self, AppState},
    config::{self, database},
    core::{LoanRepository, ScenarioService},
    errors::Result,
};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env first so RUST_LOG from it is honoured
    let dotenv_loaded = dotenv().is_ok(); // Non-fatal, env vars can be set externally

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!(dotenv_loaded, "Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;
    let addr: SocketAddr = app_config.bind_addr.parse()?;

    // 4. Initialize database and the repository that owns it
    let db = database::init_database(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;
    let repository = LoanRepository::new(db);

    // 5. Run the API until shutdown; the service and its store are dropped afterwards
    let service = ScenarioService::new(repository, app_config.service_settings());
    api::serve(addr, AppState::new(service))
        .await
        .inspect_err(|e| error!("Server error: {e}"))?;

    Ok(())
}
