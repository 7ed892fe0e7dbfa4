//! Database configuration module for the loan scenario store.
//!
//! This module handles `SQLite` connection setup and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.

use crate::entities::{LoanScenarios, ScheduleEntries};
use crate::errors::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::{debug, info};

/// Process-lifetime storage, the default.
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Establishes a connection pool for `database_url`.
///
/// Every connection to an in-memory `SQLite` URL opens a separate, empty database,
/// so in-memory pools hold exactly one connection that is never recycled.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    if is_in_memory(database_url) {
        debug!("Using a single pinned connection for in-memory database");
        let forever = Duration::from_secs(60 * 60 * 24 * 365 * 100);
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(forever)
            .max_lifetime(forever);
    }

    let db = Database::connect(options).await?;
    info!(database_url, "Database connection established");
    Ok(db)
}

/// Creates the scenario and schedule tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Scenarios first: schedule entries reference them
    let mut scenario_table = schema.create_table_from_entity(LoanScenarios);
    let mut schedule_table = schema.create_table_from_entity(ScheduleEntries);

    db.execute(builder.build(scenario_table.if_not_exists()))
        .await?;
    db.execute(builder.build(schedule_table.if_not_exists()))
        .await?;

    Ok(())
}

/// Connects to `database_url` and ensures the schema exists.
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(database_url).await?;
    create_tables(&db).await?;
    info!("Database tables ready");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{LoanScenarioModel, ScheduleEntryModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:loans?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/loans.sqlite?mode=rwc"));
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection(DEFAULT_DATABASE_URL).await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<LoanScenarioModel> = LoanScenarios::find().limit(1).all(&db).await?;
        let _: Vec<ScheduleEntryModel> = ScheduleEntries::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = init_database(DEFAULT_DATABASE_URL).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
