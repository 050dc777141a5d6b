use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::foir::select_foir;
use super::offers::{build_offers, match_tier, CreditTier, LenderOffer};
use super::policy::{EligibilityPolicy, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};
use crate::amortization::{amortize, LoanTerms, MAX_TENURE_YEARS};
use crate::error::{CalculationFault, LoanEngineError};
use crate::time_value::{emi_for, monthly_rate, MONTHS_PER_YEAR};
use crate::types::*;
use crate::LoanEngineResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Business,
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmploymentType::Salaried => "salaried",
            EmploymentType::SelfEmployed => "self-employed",
            EmploymentType::Business => "business",
        };
        f.write_str(s)
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "salaried" => Ok(EmploymentType::Salaried),
            "self-employed" | "self_employed" | "selfemployed" => Ok(EmploymentType::SelfEmployed),
            "business" => Ok(EmploymentType::Business),
            other => Err(format!(
                "unknown employment type '{other}' (expected salaried, self-employed or business)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInputs {
    pub monthly_income: Money,
    pub age: u32,
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub existing_monthly_obligations: Money,
    pub credit_score: u32,
    pub requested_tenure_years: u32,
}

/// Why an applicant did not qualify. Not an error: these are legitimate
/// outcomes of a successful assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IneligibilityReason {
    /// Existing obligations consume the whole FOIR allowance.
    InsufficientRepaymentCapacity,
    BelowMinimumLoanAmount { minimum: Money },
    AgeOutOfRange { age: u32, min_age: u32, max_age: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    /// Zero whenever `eligible` is false.
    pub max_loan_amount: Money,
    pub emi: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub foir: Rate,
    pub net_available_emi: Money,
    pub credit_tier: String,
    pub tier_message: String,
    pub recommended_offers: Vec<LenderOffer>,
    pub ineligibility_reasons: Vec<IneligibilityReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalculationFault>,
}

impl EligibilityResult {
    /// All-zero, non-eligible result carrying the fault that produced it.
    pub fn zeroed(fault: CalculationFault) -> Self {
        EligibilityResult {
            eligible: false,
            max_loan_amount: Decimal::ZERO,
            emi: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            foir: Decimal::ZERO,
            net_available_emi: Decimal::ZERO,
            credit_tier: String::new(),
            tier_message: String::new(),
            recommended_offers: Vec::new(),
            ineligibility_reasons: Vec::new(),
            error: Some(fault),
        }
    }

    fn not_eligible(
        foir: Rate,
        net_available_emi: Money,
        tier: &CreditTier,
        reasons: Vec<IneligibilityReason>,
    ) -> Self {
        EligibilityResult {
            eligible: false,
            max_loan_amount: Decimal::ZERO,
            emi: Decimal::ZERO,
            total_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            foir,
            net_available_emi: round_cents(net_available_emi),
            credit_tier: tier.name.clone(),
            tier_message: tier.message.clone(),
            recommended_offers: Vec::new(),
            ineligibility_reasons: reasons,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Size the largest loan an applicant can service and attach the offers for
/// their credit tier.
///
/// Affordability and age decide eligibility; the credit score only selects
/// which offers are shown.
pub fn assess_eligibility(
    inputs: &EligibilityInputs,
    policy: &EligibilityPolicy,
) -> LoanEngineResult<EligibilityResult> {
    validate_inputs(inputs)?;
    policy.validate()?;

    let tier = match_tier(inputs.credit_score, &policy.credit_tiers).ok_or_else(|| {
        LoanEngineError::InvalidPolicy(format!(
            "no credit tier accepts score {}",
            inputs.credit_score
        ))
    })?;

    // -- FOIR and repayment capacity -----------------------------------------
    let annual_income = inputs
        .monthly_income
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .ok_or_else(|| non_finite("annual income"))?;
    let foir = select_foir(annual_income, &policy.income_bands, policy.fallback_foir);
    let net_available_emi = inputs
        .monthly_income
        .checked_mul(foir)
        .and_then(|v| v.checked_sub(inputs.existing_monthly_obligations))
        .ok_or_else(|| non_finite("net available EMI"))?;

    tracing::debug!(%annual_income, %foir, %net_available_emi, "repayment capacity");

    if net_available_emi <= Decimal::ZERO {
        return Ok(EligibilityResult::not_eligible(
            foir,
            net_available_emi,
            tier,
            vec![IneligibilityReason::InsufficientRepaymentCapacity],
        ));
    }

    // -- Maximum principal at the reference rate -----------------------------
    let months = inputs.requested_tenure_years * MONTHS_PER_YEAR;
    let per_unit_emi = emi_for(
        policy.reference_principal,
        monthly_rate(policy.reference_rate_percent),
        months,
    )?;
    if per_unit_emi <= Decimal::ZERO {
        return Err(non_finite("reference EMI factor"));
    }

    let max_loan_amount = net_available_emi
        .checked_div(per_unit_emi)
        .and_then(|v| v.checked_mul(policy.reference_principal))
        .map(|v| v.floor())
        .ok_or_else(|| non_finite("maximum loan amount"))?;

    tracing::debug!(%per_unit_emi, %max_loan_amount, "loan sized at reference rate");

    // -- Gates -----------------------------------------------------------------
    let mut reasons = Vec::new();
    if max_loan_amount <= policy.minimum_loan_amount {
        reasons.push(IneligibilityReason::BelowMinimumLoanAmount {
            minimum: policy.minimum_loan_amount,
        });
    }
    if !policy
        .age_limits
        .admits(inputs.age, inputs.employment_type)
    {
        reasons.push(IneligibilityReason::AgeOutOfRange {
            age: inputs.age,
            min_age: policy.age_limits.min_age,
            max_age: policy.age_limits.max_age_for(inputs.employment_type),
        });
    }
    if !reasons.is_empty() {
        return Ok(EligibilityResult::not_eligible(
            foir,
            net_available_emi,
            tier,
            reasons,
        ));
    }

    // -- Reporting numbers for the sized loan ----------------------------------
    let reporting = amortize(&LoanTerms::new(
        max_loan_amount,
        policy.reference_rate_percent,
        inputs.requested_tenure_years,
    ))?;

    tracing::debug!(tier = %tier.name, offers = tier.offers.len(), "credit tier matched");

    Ok(EligibilityResult {
        eligible: true,
        max_loan_amount,
        emi: reporting.emi,
        total_payment: reporting.total_payment,
        total_interest: reporting.total_interest,
        foir,
        net_available_emi: round_cents(net_available_emi),
        credit_tier: tier.name.clone(),
        tier_message: tier.message.clone(),
        recommended_offers: build_offers(tier, max_loan_amount),
        ineligibility_reasons: Vec::new(),
        error: None,
    })
}

/// Non-failing eligibility check under the default policy, for callers that
/// recalculate on every input change. Invalid or overflowing inputs produce
/// the zeroed, non-eligible result with `error` set.
pub fn compute_eligibility(inputs: &EligibilityInputs) -> EligibilityResult {
    match assess_eligibility(inputs, &EligibilityPolicy::default()) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "eligibility fell back to a zeroed result");
            EligibilityResult::zeroed(CalculationFault::from(&e))
        }
    }
}

/// [`assess_eligibility`] wrapped in the standard computation envelope.
pub fn calculate_eligibility(
    inputs: &EligibilityInputs,
    policy: &EligibilityPolicy,
) -> LoanEngineResult<ComputationOutput<EligibilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = assess_eligibility(inputs, policy)?;

    if result.eligible {
        warnings.push(format!(
            "Loan sized at the {}% reference rate; lender rates shown may differ",
            policy.reference_rate_percent
        ));
    }
    if inputs.credit_score < policy.pricing_warning_below_score {
        warnings.push(format!(
            "Credit score {} attracts higher pricing; offers are indicative only",
            inputs.credit_score
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "reference_rate_percent": policy.reference_rate_percent.to_string(),
        "reference_principal": policy.reference_principal.to_string(),
        "minimum_loan_amount": policy.minimum_loan_amount.to_string(),
        "requested_tenure_years": inputs.requested_tenure_years,
        "employment_type": inputs.employment_type.to_string(),
    });

    Ok(with_metadata(
        "FOIR-based loan eligibility with credit-tier offers",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn non_finite(context: &str) -> LoanEngineError {
    LoanEngineError::NonFiniteResult {
        context: context.into(),
    }
}

fn validate_inputs(inputs: &EligibilityInputs) -> LoanEngineResult<()> {
    if inputs.monthly_income <= Decimal::ZERO {
        return Err(LoanEngineError::InvalidInput {
            field: "monthly_income".into(),
            reason: "Monthly income must be positive.".into(),
        });
    }
    if inputs.age == 0 {
        return Err(LoanEngineError::InvalidInput {
            field: "age".into(),
            reason: "Age must be positive.".into(),
        });
    }
    if inputs.existing_monthly_obligations < Decimal::ZERO {
        return Err(LoanEngineError::InvalidInput {
            field: "existing_monthly_obligations".into(),
            reason: "Existing obligations cannot be negative.".into(),
        });
    }
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&inputs.credit_score) {
        return Err(LoanEngineError::InvalidInput {
            field: "credit_score".into(),
            reason: format!(
                "Credit score must be between {MIN_CREDIT_SCORE} and {MAX_CREDIT_SCORE}."
            ),
        });
    }
    if inputs.requested_tenure_years == 0 || inputs.requested_tenure_years > MAX_TENURE_YEARS {
        return Err(LoanEngineError::InvalidInput {
            field: "requested_tenure_years".into(),
            reason: format!("Tenure must be between 1 and {MAX_TENURE_YEARS} years."),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
