//! Domain types shared by the engine, the repository and the service.
//!
//! Money is always a [`Decimal`] rounded to cents. Responses serialize money as
//! JSON numbers so browser clients can format them directly.

use crate::errors::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Monetary value in the loan's currency.
pub type Money = Decimal;

/// Annual percentage rate as a percentage (5 means 5%).
pub type Rate = Decimal;

/// Number of decimal places kept for money (cents).
pub const CURRENCY_DP: u32 = 2;

/// The smallest representable amount of money, one cent.
pub const MINOR_UNIT: Money = Decimal::from_parts(1, 0, 0, false, CURRENCY_DP);

/// Rounds to cents, half-up.
#[must_use]
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest amount of money the store can hold, `i64::MAX` cents.
#[must_use]
pub fn max_storable_money() -> Money {
    from_cents(i64::MAX)
}

/// Converts a cent-precision amount into integer minor units for storage.
pub fn to_cents(value: Money) -> Result<i64> {
    let scaled = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| Error::invalid_input("money", format!("{value} is out of range")))?;
    if !scaled.fract().is_zero() {
        return Err(Error::invalid_input(
            "money",
            format!("{value} has more than {CURRENCY_DP} decimal places"),
        ));
    }
    scaled
        .to_i64()
        .ok_or_else(|| Error::invalid_input("money", format!("{value} is out of range")))
}

/// Converts stored minor units back into money.
#[must_use]
pub fn from_cents(cents: i64) -> Money {
    Decimal::new(cents, CURRENCY_DP)
}

/// Validated loan parameters, ready for the amortization engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanTerms {
    /// Principal, positive and rounded to cents
    pub amount: Money,
    /// Annual percentage rate, non-negative
    pub apr: Rate,
    /// Number of monthly payments, at least one
    pub term_months: u32,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// 1-based payment period
    pub month: u32,
    /// Interest portion of this month's payment
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_paid: Money,
    /// Principal portion of this month's payment
    #[serde(with = "rust_decimal::serde::float")]
    pub principal_paid: Money,
    /// Outstanding principal after the payment
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_balance: Money,
}

/// A fully computed scenario that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoanScenario {
    /// Inputs the scenario was computed from
    pub terms: LoanTerms,
    /// Fixed monthly payment
    pub monthly_payment: Money,
    /// Complete schedule, one entry per month
    pub schedule: Vec<ScheduleEntry>,
}

/// A persisted scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanScenario {
    /// Identifier assigned by the repository
    pub id: i64,
    /// Principal
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Money,
    /// Annual percentage rate
    #[serde(with = "rust_decimal::serde::float")]
    pub apr: Rate,
    /// Number of monthly payments
    pub term_months: u32,
    /// Fixed monthly payment
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Money,
    /// Complete schedule
    pub schedule: Vec<ScheduleEntry>,
}

/// List view of a scenario, without its schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSummary {
    /// Identifier assigned by the repository
    pub id: i64,
    /// Principal
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Money,
    /// Annual percentage rate
    #[serde(with = "rust_decimal::serde::float")]
    pub apr: Rate,
    /// Number of monthly payments
    pub term_months: u32,
    /// Fixed monthly payment
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Money,
}

impl From<&LoanScenario> for ScenarioSummary {
    fn from(scenario: &LoanScenario) -> Self {
        Self {
            id: scenario.id,
            amount: scenario.amount,
            apr: scenario.apr,
            term_months: scenario.term_months,
            monthly_payment: scenario.monthly_payment,
        }
    }
}

/// Detail view of a scenario with a bounded schedule preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioDetail {
    /// Identifier assigned by the repository
    pub id: i64,
    /// Principal
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Money,
    /// Annual percentage rate
    #[serde(with = "rust_decimal::serde::float")]
    pub apr: Rate,
    /// Number of monthly payments
    pub term_months: u32,
    /// Fixed monthly payment
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Money,
    /// The first months of the schedule
    pub schedule_preview: Vec<ScheduleEntry>,
}

impl ScenarioDetail {
    /// Builds the detail view, keeping at most `preview_months` schedule entries.
    #[must_use]
    pub fn from_scenario(scenario: LoanScenario, preview_months: usize) -> Self {
        let LoanScenario {
            id,
            amount,
            apr,
            term_months,
            monthly_payment,
            schedule,
        } = scenario;

        Self {
            id,
            amount,
            apr,
            term_months,
            monthly_payment,
            schedule_preview: schedule.into_iter().take(preview_months).collect(),
        }
    }
}
