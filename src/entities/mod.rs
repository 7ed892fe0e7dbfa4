//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod loan_scenario;
pub mod schedule_entry;

// Re-export specific types to avoid conflicts with the domain types in `core`
pub use loan_scenario::{Entity as LoanScenarios, Model as LoanScenarioModel};
pub use schedule_entry::{Entity as ScheduleEntries, Model as ScheduleEntryModel};
