//! Loosely-typed request forms.
//!
//! A calculator form sends whatever the user has typed so far: empty strings,
//! negative or fractional tenures, numbers as strings. These types accept any
//! JSON scalar per field and turn bad values into the same zeroed result the
//! non-failing entry points produce, so only a malformed document is an error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::amortization::{compute_amortization, AmortizationResult};
use crate::eligibility::{compute_eligibility, EligibilityInputs, EligibilityResult, EmploymentType};
use crate::error::{CalculationFault, LoanEngineError};
use crate::types::*;
use crate::LoanEngineResult;

/// EMI calculator fields as a form holds them mid-edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalculatorForm {
    pub principal: Value,
    pub annual_rate_percent: Value,
    pub tenure_years: Value,
}

impl CalculatorForm {
    /// Amortize whatever the form holds. Never fails.
    pub fn compute(&self) -> AmortizationResult {
        match self.parse() {
            Ok((principal, rate, tenure)) => compute_amortization(principal, rate, tenure),
            Err(e) => {
                tracing::warn!(error = %e, "calculator form rejected");
                AmortizationResult::zeroed(CalculationFault::from(&e))
            }
        }
    }

    fn parse(&self) -> LoanEngineResult<(Money, Rate, u32)> {
        Ok((
            parse_amount("principal", &self.principal)?,
            parse_amount("annual_rate_percent", &self.annual_rate_percent)?,
            parse_whole("tenure_years", &self.tenure_years)?,
        ))
    }
}

/// Eligibility fields as a form holds them mid-edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicantForm {
    pub monthly_income: Value,
    pub age: Value,
    pub employment_type: Value,
    pub existing_monthly_obligations: Value,
    pub credit_score: Value,
    pub requested_tenure_years: Value,
}

impl ApplicantForm {
    pub fn to_inputs(&self) -> LoanEngineResult<EligibilityInputs> {
        Ok(EligibilityInputs {
            monthly_income: parse_amount("monthly_income", &self.monthly_income)?,
            age: parse_whole("age", &self.age)?,
            employment_type: parse_employment(&self.employment_type)?,
            existing_monthly_obligations: parse_amount(
                "existing_monthly_obligations",
                &self.existing_monthly_obligations,
            )?,
            credit_score: parse_whole("credit_score", &self.credit_score)?,
            requested_tenure_years: parse_whole(
                "requested_tenure_years",
                &self.requested_tenure_years,
            )?,
        })
    }

    /// Assess whatever the form holds under the default policy. Never fails.
    pub fn compute(&self) -> EligibilityResult {
        match self.to_inputs() {
            Ok(inputs) => compute_eligibility(&inputs),
            Err(e) => {
                tracing::warn!(error = %e, "applicant form rejected");
                EligibilityResult::zeroed(CalculationFault::from(&e))
            }
        }
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> LoanEngineError {
    LoanEngineError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// A blank field counts as zero; range checks are left to the engines.
fn parse_amount(field: &str, value: &Value) -> LoanEngineResult<Decimal> {
    match value {
        Value::Null => Ok(Decimal::ZERO),
        Value::String(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Value::String(s) => {
            parse_decimal(s.trim()).ok_or_else(|| invalid(field, format!("'{s}' is not a number")))
        }
        Value::Number(n) => parse_decimal(&n.to_string())
            .ok_or_else(|| invalid(field, format!("{n} is out of range"))),
        _ => Err(invalid(field, "expected a number")),
    }
}

fn parse_whole(field: &str, value: &Value) -> LoanEngineResult<u32> {
    let amount = parse_amount(field, value)?;
    if amount < Decimal::ZERO {
        return Err(invalid(field, "cannot be negative"));
    }
    if !amount.fract().is_zero() {
        return Err(invalid(field, "must be a whole number"));
    }
    amount
        .to_u32()
        .ok_or_else(|| invalid(field, format!("{amount} is out of range")))
}

fn parse_employment(value: &Value) -> LoanEngineResult<EmploymentType> {
    match value {
        Value::String(s) if !s.trim().is_empty() => {
            s.parse().map_err(|e: String| invalid("employment_type", e))
        }
        Value::Null | Value::String(_) => Err(invalid("employment_type", "is required")),
        _ => Err(invalid("employment_type", "expected a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use rust_decimal_macros::dec;

    fn calculator(json: &str) -> AmortizationResult {
        serde_json::from_str::<CalculatorForm>(json).unwrap().compute()
    }

    fn applicant(json: &str) -> EligibilityResult {
        serde_json::from_str::<ApplicantForm>(json).unwrap().compute()
    }

    fn fault_message(fault: &Option<CalculationFault>) -> &str {
        let fault = fault.as_ref().expect("result should carry a fault");
        assert_eq!(fault.kind, FaultKind::InvalidInput);
        &fault.message
    }

    #[test]
    fn test_calculator_accepts_numbers_and_strings() {
        let result = calculator(
            r#"{"principal": "2500000", "annual_rate_percent": 8.5, "tenure_years": "20"}"#,
        );
        assert!(result.error.is_none());
        assert_eq!(result.emi, dec!(21696));
    }

    #[test]
    fn test_calculator_negative_tenure_is_zeroed() {
        let result =
            calculator(r#"{"principal": 500000, "annual_rate_percent": 9, "tenure_years": -1}"#);
        assert!(fault_message(&result.error).contains("tenure_years"));
        assert_eq!(result.emi, Decimal::ZERO);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_calculator_fractional_tenure_is_zeroed() {
        let result =
            calculator(r#"{"principal": 500000, "annual_rate_percent": 9, "tenure_years": 2.5}"#);
        assert!(fault_message(&result.error).contains("whole number"));
        assert_eq!(result.total_payment, Decimal::ZERO);
    }

    #[test]
    fn test_calculator_blank_fields_are_zeroed() {
        let result = calculator(r#"{"principal": "", "annual_rate_percent": "9"}"#);
        assert!(result.error.is_some());
        assert_eq!(result.emi, Decimal::ZERO);
    }

    #[test]
    fn test_calculator_text_in_number_field_is_zeroed() {
        let result =
            calculator(r#"{"principal": "5 lakh", "annual_rate_percent": 9, "tenure_years": 5}"#);
        assert!(fault_message(&result.error).contains("principal"));
    }

    #[test]
    fn test_applicant_form_happy_path() {
        let result = applicant(
            r#"{"monthly_income": "50000", "age": 30, "employment_type": "salaried",
                "credit_score": 750, "requested_tenure_years": 20}"#,
        );
        assert!(result.error.is_none());
        assert!(result.eligible);
        assert_eq!(result.max_loan_amount, dec!(3_334_348));
    }

    #[test]
    fn test_applicant_negative_age_is_zeroed() {
        let result = applicant(
            r#"{"monthly_income": 50000, "age": -1, "employment_type": "salaried",
                "credit_score": 750, "requested_tenure_years": 20}"#,
        );
        assert!(fault_message(&result.error).contains("age"));
        assert!(!result.eligible);
        assert_eq!(result.max_loan_amount, Decimal::ZERO);
    }

    #[test]
    fn test_applicant_empty_income_is_zeroed() {
        let result = applicant(
            r#"{"monthly_income": "", "age": 30, "employment_type": "salaried",
                "credit_score": 750, "requested_tenure_years": 20}"#,
        );
        assert!(fault_message(&result.error).contains("monthly_income"));
        assert_eq!(result.max_loan_amount, Decimal::ZERO);
    }

    #[test]
    fn test_applicant_missing_employment_type_is_zeroed() {
        let result = applicant(
            r#"{"monthly_income": 50000, "age": 30, "credit_score": 750,
                "requested_tenure_years": 20}"#,
        );
        assert!(fault_message(&result.error).contains("employment_type"));
    }

    #[test]
    fn test_zeroed_result_serializes_fault_kind() {
        let result = applicant(r#"{"monthly_income": "", "age": -1}"#);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"]["kind"], "invalid_input");
        assert_eq!(value["eligible"], false);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(serde_json::from_str::<CalculatorForm>(r#"{"principal": "#).is_err());
        assert!(serde_json::from_str::<ApplicantForm>(r#""50000""#).is_err());
    }
}
