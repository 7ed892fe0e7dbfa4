//! Schedule entry entity - one row per month of a scenario's schedule.
//!
//! Rows are written together with their scenario and never modified.
use sea_orm::entity::prelude::*;

/// Schedule entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_entries")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the scenario this entry belongs to
    pub scenario_id: i64,
    /// 1-based payment period
    pub month: i32,
    /// Interest portion in cents
    pub interest_paid_cents: i64,
    /// Principal portion in cents
    pub principal_paid_cents: i64,
    /// Outstanding principal after the payment, in cents
    pub remaining_balance_cents: i64,
}

/// Defines relationships between `ScheduleEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one scenario
    #[sea_orm(
        belongs_to = "super::loan_scenario::Entity",
        from = "Column::ScenarioId",
        to = "super::loan_scenario::Column::Id"
    )]
    LoanScenario,
}

impl Related<super::loan_scenario::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanScenario.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
