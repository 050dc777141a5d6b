use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::{build_schedule, summarise_by_year, MonthRow, YearSummary};
use crate::error::{CalculationFault, LoanEngineError};
use crate::time_value::{emi_for, monthly_rate, MONTHS_PER_YEAR};
use crate::types::*;
use crate::LoanEngineResult;

/// Longest supported repayment period.
pub const MAX_TENURE_YEARS: u32 = 30;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual interest rate as a percentage (8.5 = 8.5%).
    pub annual_rate_percent: Rate,
    pub tenure_years: u32,
    /// Date of the first installment; when set, every schedule row carries a
    /// due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_emi_date: Option<NaiveDate>,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Rate, tenure_years: u32) -> Self {
        LoanTerms {
            principal,
            annual_rate_percent,
            tenure_years,
            first_emi_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub principal: Money,
    /// Monthly installment. Rounded to whole units, except at a zero rate
    /// where it is exactly `principal / months`.
    pub emi: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Interest as a percentage of the total payment, to two decimals.
    pub interest_share_percent: Rate,
    pub months: u32,
    pub schedule: Vec<MonthRow>,
    pub yearly_summary: Vec<YearSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalculationFault>,
}

impl AmortizationResult {
    /// All-zero result carrying the fault that produced it.
    pub fn zeroed(fault: CalculationFault) -> Self {
        AmortizationResult {
            principal: Decimal::ZERO,
            emi: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            interest_share_percent: Decimal::ZERO,
            months: 0,
            schedule: Vec::new(),
            yearly_summary: Vec::new(),
            error: Some(fault),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the EMI, totals and full amortization schedule for a loan.
pub fn amortize(terms: &LoanTerms) -> LoanEngineResult<AmortizationResult> {
    validate_terms(terms)?;

    let r = monthly_rate(terms.annual_rate_percent);
    let months = terms.tenure_years * MONTHS_PER_YEAR;
    let emi_raw = emi_for(terms.principal, r, months)?;

    let (emi, total_payment, total_interest) = if r.is_zero() {
        (emi_raw, terms.principal, Decimal::ZERO)
    } else {
        let total = emi_raw
            .checked_mul(Decimal::from(months))
            .map(round_currency)
            .ok_or_else(|| LoanEngineError::NonFiniteResult {
                context: "total payment".into(),
            })?;
        (round_currency(emi_raw), total, total - terms.principal)
    };

    let schedule = build_schedule(terms.principal, r, emi_raw, months, terms.first_emi_date)?;
    let yearly_summary = summarise_by_year(&schedule);

    let interest_share_percent = if total_payment.is_zero() {
        Decimal::ZERO
    } else {
        round_cents(total_interest / total_payment * dec!(100))
    };

    Ok(AmortizationResult {
        principal: terms.principal,
        emi,
        total_payment,
        total_interest,
        interest_share_percent,
        months,
        schedule,
        yearly_summary,
        error: None,
    })
}

/// Non-failing form of [`amortize`] for callers that recalculate on every
/// input change. Invalid or overflowing inputs produce a zeroed result whose
/// `error` names the fault.
pub fn compute_amortization(
    principal: Money,
    annual_rate_percent: Rate,
    tenure_years: u32,
) -> AmortizationResult {
    let terms = LoanTerms::new(principal, annual_rate_percent, tenure_years);
    match amortize(&terms) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "amortization fell back to a zeroed result");
            AmortizationResult::zeroed(CalculationFault::from(&e))
        }
    }
}

/// [`amortize`] wrapped in the standard computation envelope.
pub fn calculate_amortization(
    terms: &LoanTerms,
) -> LoanEngineResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = amortize(terms)?;

    if terms.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: EMI is principal divided by number of months".into());
    }
    if result.total_interest > result.principal {
        warnings.push(format!(
            "Total interest ({}) exceeds the principal borrowed",
            result.total_interest
        ));
    }

    tracing::debug!(
        principal = %terms.principal,
        emi = %result.emi,
        months = result.months,
        "amortization computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": monthly_rate(terms.annual_rate_percent).to_string(),
        "rounding": "nearest whole currency unit, half away from zero",
        "interest_method": "reducing balance, monthly rest",
    });

    Ok(with_metadata(
        "Reducing-balance EMI with monthly amortization schedule",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_terms(terms: &LoanTerms) -> LoanEngineResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(LoanEngineError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if terms.annual_rate_percent < Decimal::ZERO {
        return Err(LoanEngineError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative.".into(),
        });
    }
    if terms.tenure_years == 0 || terms.tenure_years > MAX_TENURE_YEARS {
        return Err(LoanEngineError::InvalidInput {
            field: "tenure_years".into(),
            reason: format!("Tenure must be between 1 and {MAX_TENURE_YEARS} years."),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_home_loan_emi() {
        let result = amortize(&LoanTerms::new(dec!(2_500_000), dec!(8.5), 20)).unwrap();
        assert_eq!(result.emi, dec!(21696));
        assert_eq!(result.months, 240);
        assert_eq!(result.schedule.len(), 240);
        assert_eq!(result.yearly_summary.len(), 20);
        // 21,695.58 * 240 = 5,206,939.40
        assert_eq!(result.total_payment, dec!(5_206_939));
        assert_eq!(result.total_interest, dec!(2_706_939));
    }

    #[test]
    fn test_zero_rate_exact_division() {
        let result = amortize(&LoanTerms::new(dec!(100_000), Decimal::ZERO, 3)).unwrap();
        assert_eq!(result.emi, dec!(100_000) / dec!(36));
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.total_payment, dec!(100_000));
        assert_eq!(result.interest_share_percent, Decimal::ZERO);
    }

    #[test]
    fn test_negative_principal_rejected() {
        let err = amortize(&LoanTerms::new(dec!(-5), dec!(9), 5)).unwrap_err();
        match err {
            LoanEngineError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_tenure_out_of_range_rejected() {
        for tenure in [0, 31] {
            let err = amortize(&LoanTerms::new(dec!(100_000), dec!(9), tenure)).unwrap_err();
            match err {
                LoanEngineError::InvalidInput { field, .. } => assert_eq!(field, "tenure_years"),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_compute_zeroes_invalid_input() {
        let result = compute_amortization(Decimal::ZERO, dec!(9), 10);
        assert!(!result.is_valid());
        assert_eq!(result.emi, Decimal::ZERO);
        assert!(result.schedule.is_empty());
        assert_eq!(result.error.unwrap().kind, FaultKind::InvalidInput);
    }

    #[test]
    fn test_compute_zeroes_overflow() {
        let result = compute_amortization(dec!(100_000), dec!(12_000), 30);
        assert_eq!(result.error.unwrap().kind, FaultKind::NonFiniteResult);
        assert_eq!(result.total_payment, Decimal::ZERO);
    }

    #[test]
    fn test_envelope_warns_on_zero_rate() {
        let out = calculate_amortization(&LoanTerms::new(dec!(60_000), Decimal::ZERO, 1)).unwrap();
        assert_eq!(out.result.emi, dec!(5_000));
        assert!(out.warnings.iter().any(|w| w.contains("Zero interest")));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
