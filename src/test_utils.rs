//! Shared test utilities for the loan scenario service.
//!
//! This module provides helpers for setting up in-memory databases and
//! building scenarios with sensible defaults.

use crate::{
    config::database,
    core::{
        LoanRepository, LoanRequest, ScenarioService, ServiceSettings,
        amortization::amortize,
        types::{LoanTerms, Money, NewLoanScenario, Rate},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all storage tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    database::init_database(database::DEFAULT_DATABASE_URL).await
}

/// Repository over a fresh in-memory database.
pub async fn setup_test_repository() -> Result<LoanRepository> {
    Ok(LoanRepository::new(setup_test_db().await?))
}

/// Service with default settings over a fresh in-memory database.
pub async fn setup_test_service() -> Result<ScenarioService> {
    setup_test_service_with(ServiceSettings::default()).await
}

/// Service with custom settings over a fresh in-memory database.
pub async fn setup_test_service_with(settings: ServiceSettings) -> Result<ScenarioService> {
    Ok(ScenarioService::new(setup_test_repository().await?, settings))
}

/// Computes an unsaved scenario for already-valid terms.
///
/// # Panics
/// Panics if the terms are rejected by the engine.
#[allow(clippy::unwrap_used)]
pub fn test_scenario(amount: Money, apr: Rate, term_months: u32) -> NewLoanScenario {
    amortize(&LoanTerms {
        amount,
        apr,
        term_months,
    })
    .unwrap()
}

/// Parses a JSON body into a raw request.
///
/// # Panics
/// Panics if `body` is not a JSON object.
#[allow(clippy::unwrap_used)]
pub fn loan_request(body: serde_json::Value) -> LoanRequest {
    serde_json::from_value(body).unwrap()
}
