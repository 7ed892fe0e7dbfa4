//! Amortization engine - fixed-rate monthly payment and schedule generation.
//!
//! Every function here is pure: identical inputs always produce identical
//! outputs. Interest is rounded to cents each month and the final month pays
//! off whatever balance remains, so a schedule's principal always sums to the
//! loan amount and always ends at a zero balance.

use crate::{
    core::types::{
        LoanTerms, MINOR_UNIT, Money, NewLoanScenario, Rate, ScheduleEntry, round_money,
    },
    errors::{Error, Result},
};
use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

fn check_inputs(amount: Money, apr: Rate, term_months: u32) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input("amount", "amount must be > 0"));
    }
    if apr < Decimal::ZERO {
        return Err(Error::invalid_input("apr", "apr must be >= 0"));
    }
    if term_months == 0 {
        return Err(Error::invalid_input("term_months", "term_months must be >= 1"));
    }
    Ok(())
}

/// Converts an APR percentage into the periodic monthly rate (`apr / 100 / 12`).
pub fn monthly_rate(apr: Rate) -> Result<Rate> {
    apr.checked_div(Decimal::ONE_HUNDRED)
        .and_then(|annual| annual.checked_div(MONTHS_PER_YEAR))
        .ok_or_else(|| {
            Error::invalid_input("apr", format!("cannot derive a monthly rate from {apr}"))
        })
}

/// Computes the fixed monthly payment, rounded half-up to cents.
///
/// A zero rate splits the amount evenly across the term. Otherwise the standard
/// annuity formula `P * r * (1+r)^n / ((1+r)^n - 1)` is used. The result is never
/// less than one cent for a positive amount.
pub fn compute_monthly_payment(amount: Money, apr: Rate, term_months: u32) -> Result<Money> {
    check_inputs(amount, apr, term_months)?;

    let rate = monthly_rate(apr)?;
    let periods = Decimal::from(term_months);

    let payment = if rate.is_zero() {
        amount / periods
    } else {
        let overflow = || Error::invalid_input("amount", "payment calculation overflowed");
        let growth = (Decimal::ONE + rate)
            .checked_powu(u64::from(term_months))
            .ok_or_else(overflow)?;
        let numerator = amount
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(growth))
            .ok_or_else(overflow)?;
        numerator
            .checked_div(growth - Decimal::ONE)
            .ok_or_else(overflow)?
    };

    Ok(round_money(payment).max(MINOR_UNIT))
}

/// Generates the full month-by-month schedule for a loan.
///
/// Months before the last pay `monthly_payment - interest` of principal, capped
/// at the outstanding balance. The last month pays the entire remaining balance
/// plus its interest.
pub fn generate_schedule(
    amount: Money,
    apr: Rate,
    term_months: u32,
    monthly_payment: Money,
) -> Result<Vec<ScheduleEntry>> {
    check_inputs(amount, apr, term_months)?;
    if monthly_payment <= Decimal::ZERO {
        return Err(Error::invalid_input(
            "monthly_payment",
            "monthly_payment must be > 0",
        ));
    }

    let rate = monthly_rate(apr)?;
    let mut balance = round_money(amount);
    let mut schedule = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let interest = balance
            .checked_mul(rate)
            .map(round_money)
            .ok_or_else(|| {
                Error::invalid_input("amount", format!("interest on {balance} overflows"))
            })?;
        let principal = if month == term_months {
            balance
        } else {
            (monthly_payment - interest).max(Decimal::ZERO).min(balance)
        };
        balance -= principal;

        schedule.push(ScheduleEntry {
            month,
            interest_paid: interest,
            principal_paid: principal,
            remaining_balance: balance,
        });
    }

    Ok(schedule)
}

/// Computes payment and schedule for validated terms.
pub fn amortize(terms: &LoanTerms) -> Result<NewLoanScenario> {
    let monthly_payment = compute_monthly_payment(terms.amount, terms.apr, terms.term_months)?;
    let schedule = generate_schedule(terms.amount, terms.apr, terms.term_months, monthly_payment)?;

    debug!(
        amount = %terms.amount,
        apr = %terms.apr,
        term_months = terms.term_months,
        monthly_payment = %monthly_payment,
        "Computed amortization schedule"
    );

    Ok(NewLoanScenario {
        terms: terms.clone(),
        monthly_payment,
        schedule,
    })
}
