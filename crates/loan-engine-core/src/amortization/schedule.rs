use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanEngineError;
use crate::time_value::MONTHS_PER_YEAR;
use crate::types::*;
use crate::LoanEngineResult;

/// One installment of an amortization schedule. Money fields are rounded to
/// whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRow {
    pub month: u32,
    pub emi: Money,
    pub principal: Money,
    pub interest: Money,
    /// Outstanding principal after this installment, never negative.
    pub balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Installments aggregated per loan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

/// Build the month-by-month schedule for an unrounded `emi`.
///
/// The running balance is carried unrounded between months; only the
/// emitted rows are rounded.
pub(crate) fn build_schedule(
    principal: Money,
    monthly_rate: Rate,
    emi: Money,
    months: u32,
    first_emi_date: Option<NaiveDate>,
) -> LoanEngineResult<Vec<MonthRow>> {
    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let principal_part = emi - interest;
        balance -= principal_part;

        let due_date = match first_emi_date {
            Some(first) => Some(due_date_for(first, month)?),
            None => None,
        };

        rows.push(MonthRow {
            month,
            emi: round_currency(emi),
            principal: round_currency(principal_part),
            interest: round_currency(interest),
            balance: round_currency(balance.max(Decimal::ZERO)),
            due_date,
        });
    }

    Ok(rows)
}

fn due_date_for(first: NaiveDate, month: u32) -> LoanEngineResult<NaiveDate> {
    first
        .checked_add_months(Months::new(month - 1))
        .ok_or_else(|| LoanEngineError::InvalidInput {
            field: "first_emi_date".into(),
            reason: format!("Installment {month} falls outside the supported calendar range"),
        })
}

/// Aggregate a schedule into loan years of twelve installments each.
pub fn summarise_by_year(schedule: &[MonthRow]) -> Vec<YearSummary> {
    schedule
        .chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(i, rows)| YearSummary {
            year: i as u32 + 1,
            principal_paid: rows.iter().map(|r| r.principal).sum(),
            interest_paid: rows.iter().map(|r| r.interest).sum(),
            closing_balance: rows.last().map(|r| r.balance).unwrap_or(Decimal::ZERO),
        })
        .collect()
}
