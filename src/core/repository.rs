//! Loan repository - owns stored scenarios and assigns their identifiers.
//!
//! Scenarios are written once, inside a single database transaction together
//! with their full schedule, and never updated or deleted. Readers therefore
//! only ever observe complete scenarios.

use crate::{
    core::types::{
        LoanScenario, NewLoanScenario, ScenarioSummary, ScheduleEntry, from_cents, to_cents,
    },
    entities::{
        LoanScenarioModel, LoanScenarios, ScheduleEntries, ScheduleEntryModel, loan_scenario,
        schedule_entry,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Schedule rows per `INSERT` statement, well under `SQLite`'s bind-parameter limit.
const INSERT_BATCH_ROWS: usize = 128;

fn corrupt(message: String) -> Error {
    Error::CorruptRecord { message }
}

fn term_to_column(term_months: u32) -> Result<i32> {
    i32::try_from(term_months)
        .map_err(|_| Error::invalid_input("term_months", format!("{term_months} is out of range")))
}

fn summary_from_model(model: &LoanScenarioModel) -> Result<ScenarioSummary> {
    let apr = Decimal::from_str(&model.apr).map_err(|e| {
        corrupt(format!(
            "scenario {} has unreadable apr {:?}: {e}",
            model.id, model.apr
        ))
    })?;
    let term_months = u32::try_from(model.term_months)
        .map_err(|_| corrupt(format!("scenario {} has negative term", model.id)))?;

    Ok(ScenarioSummary {
        id: model.id,
        amount: from_cents(model.amount_cents),
        apr,
        term_months,
        monthly_payment: from_cents(model.monthly_payment_cents),
    })
}

fn entry_from_model(model: &ScheduleEntryModel) -> Result<ScheduleEntry> {
    let month = u32::try_from(model.month)
        .map_err(|_| corrupt(format!("schedule row {} has negative month", model.id)))?;

    Ok(ScheduleEntry {
        month,
        interest_paid: from_cents(model.interest_paid_cents),
        principal_paid: from_cents(model.principal_paid_cents),
        remaining_balance: from_cents(model.remaining_balance_cents),
    })
}

fn entry_to_active_model(entry: &ScheduleEntry) -> Result<schedule_entry::ActiveModel> {
    Ok(schedule_entry::ActiveModel {
        month: Set(term_to_column(entry.month)?),
        interest_paid_cents: Set(to_cents(entry.interest_paid)?),
        principal_paid_cents: Set(to_cents(entry.principal_paid)?),
        remaining_balance_cents: Set(to_cents(entry.remaining_balance)?),
        ..Default::default()
    })
}

fn assemble(summary: ScenarioSummary, schedule: Vec<ScheduleEntry>) -> LoanScenario {
    LoanScenario {
        id: summary.id,
        amount: summary.amount,
        apr: summary.apr,
        term_months: summary.term_months,
        monthly_payment: summary.monthly_payment,
        schedule,
    }
}

/// Scenario store backed by a `SeaORM` connection.
///
/// Constructed once at startup and handed to the service; there is no global
/// store.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Wraps an initialized connection (tables must already exist).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a fully computed scenario and returns it with its new identifier.
    ///
    /// Every row is converted before the transaction starts. The scenario row
    /// and its schedule rows are then committed together, so a failed create
    /// stores nothing and a committed one is always returned.
    #[instrument(skip(self, scenario), fields(term_months = scenario.terms.term_months))]
    pub async fn create(&self, scenario: NewLoanScenario) -> Result<LoanScenario> {
        let NewLoanScenario {
            terms,
            monthly_payment,
            schedule,
        } = scenario;

        let header = loan_scenario::ActiveModel {
            amount_cents: Set(to_cents(terms.amount)?),
            apr: Set(terms.apr.to_string()),
            term_months: Set(term_to_column(terms.term_months)?),
            monthly_payment_cents: Set(to_cents(monthly_payment)?),
            ..Default::default()
        };
        let mut rows = schedule
            .iter()
            .map(entry_to_active_model)
            .collect::<Result<Vec<_>>>()?;

        let txn = self.db.begin().await?;

        let inserted = header.insert(&txn).await?;
        let summary = summary_from_model(&inserted)?;
        for row in &mut rows {
            row.scenario_id = Set(inserted.id);
        }
        for chunk in rows.chunks(INSERT_BATCH_ROWS) {
            ScheduleEntries::insert_many(chunk.to_vec()).exec(&txn).await?;
        }

        txn.commit().await?;
        debug!(id = summary.id, rows = schedule.len(), "Scenario committed");

        Ok(assemble(summary, schedule))
    }

    /// Lists every stored scenario in creation order, without schedules.
    pub async fn list(&self) -> Result<Vec<ScenarioSummary>> {
        LoanScenarios::find()
            .order_by_asc(loan_scenario::Column::Id)
            .all(&self.db)
            .await?
            .iter()
            .map(summary_from_model)
            .collect()
    }

    /// Loads a scenario with its complete schedule.
    ///
    /// Fails with [`Error::NotFound`] when no scenario has this identifier.
    pub async fn get(&self, id: i64) -> Result<LoanScenario> {
        let model = LoanScenarios::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(Error::NotFound { id })?;

        let schedule = ScheduleEntries::find()
            .filter(schedule_entry::Column::ScenarioId.eq(id))
            .order_by_asc(schedule_entry::Column::Month)
            .all(&self.db)
            .await?
            .iter()
            .map(entry_from_model)
            .collect::<Result<Vec<_>>>()?;

        Ok(assemble(summary_from_model(&model)?, schedule))
    }
}
