//! Loan scenario entity - one row per persisted scenario.
//!
//! Money is stored in integer minor units (cents) and the APR as its decimal
//! string, so nothing is rounded by the storage layer.

use sea_orm::entity::prelude::*;

/// Loan scenario database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "loan_scenarios")]
pub struct Model {
    /// Unique identifier, assigned on insert
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Principal in cents
    pub amount_cents: i64,
    /// Annual percentage rate in decimal notation (e.g. `"5.5"`)
    pub apr: String,
    /// Number of monthly payments
    pub term_months: i32,
    /// Fixed monthly payment in cents
    pub monthly_payment_cents: i64,
}

/// Defines relationships between `LoanScenario` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One scenario has many schedule entries
    #[sea_orm(has_many = "super::schedule_entry::Entity")]
    ScheduleEntries,
}

impl Related<super::schedule_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
