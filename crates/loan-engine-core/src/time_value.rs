use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanEngineError;
use crate::types::{Money, Rate};
use crate::LoanEngineResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate (8.5 = 8.5%) to a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Rate) -> Rate {
    annual_rate_percent / Decimal::from(MONTHS_PER_YEAR) / dec!(100)
}

/// Equated monthly installment on a reducing balance, unrounded.
///
/// `emi = P * r * (1 + r)^n / ((1 + r)^n - 1)`, or `P / n` when `r` is zero.
/// Every step that can overflow is checked and reported as a non-finite
/// result instead of panicking.
pub fn emi_for(principal: Money, monthly_rate: Rate, months: u32) -> LoanEngineResult<Money> {
    if months == 0 {
        return Err(LoanEngineError::InvalidInput {
            field: "months".into(),
            reason: "Number of months must be > 0".into(),
        });
    }

    if monthly_rate < Decimal::ZERO {
        return Err(LoanEngineError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Monthly rate cannot be negative".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(months))
        .ok_or_else(|| LoanEngineError::NonFiniteResult {
            context: format!("(1 + r)^{months}"),
        })?;

    let denominator = growth - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return Err(LoanEngineError::DivisionByZero {
            context: "EMI annuity factor".into(),
        });
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| LoanEngineError::NonFiniteResult {
            context: "EMI numerator".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_emi_home_loan() {
        // 25 lakh at 8.5% over 20 years ≈ 21,695.6
        let emi = emi_for(dec!(2_500_000), monthly_rate(dec!(8.5)), 240).unwrap();
        assert!((emi - dec!(21695.6)).abs() < dec!(1), "got {emi}");
    }

    #[test]
    fn test_emi_zero_rate_is_linear() {
        let emi = emi_for(dec!(120_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(emi, dec!(10_000));
    }

    #[test]
    fn test_emi_zero_months_rejected() {
        let err = emi_for(dec!(100_000), dec!(0.01), 0).unwrap_err();
        match err {
            LoanEngineError::InvalidInput { field, .. } => assert_eq!(field, "months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_emi_negative_rate_rejected() {
        let err = emi_for(dec!(100_000), dec!(-0.005), 12).unwrap_err();
        match err {
            LoanEngineError::InvalidInput { field, .. } => assert_eq!(field, "monthly_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_emi_overflow_is_reported() {
        // (1 + 1000)^360 does not fit in 96 bits
        let err = emi_for(dec!(100_000), dec!(1000), 360).unwrap_err();
        assert!(matches!(err, LoanEngineError::NonFiniteResult { .. }));
    }

    #[test]
    fn test_emi_per_lakh_at_nine_percent() {
        // Reference factor used by eligibility sizing: 1 lakh, 9%, 20 years ≈ 899.73
        let emi = emi_for(dec!(100_000), monthly_rate(dec!(9)), 240).unwrap();
        assert!((emi - dec!(899.73)).abs() < dec!(0.01), "got {emi}");
    }
}
