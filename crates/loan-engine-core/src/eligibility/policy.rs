use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::assess::EmploymentType;
use super::foir::{default_income_bands, IncomeBand, FALLBACK_FOIR};
use super::offers::{default_credit_tiers, CreditTier};
use crate::error::LoanEngineError;
use crate::types::*;
use crate::LoanEngineResult;

/// Lowest credit score the bureau scale produces.
pub const MIN_CREDIT_SCORE: u32 = 300;
/// Highest credit score the bureau scale produces.
pub const MAX_CREDIT_SCORE: u32 = 900;

/// Inclusive applicant age window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLimits {
    pub min_age: u32,
    pub max_age_salaried: u32,
    /// Applies to self-employed applicants and business owners.
    pub max_age_non_salaried: u32,
}

impl AgeLimits {
    pub fn max_age_for(&self, employment: EmploymentType) -> u32 {
        match employment {
            EmploymentType::Salaried => self.max_age_salaried,
            EmploymentType::SelfEmployed | EmploymentType::Business => self.max_age_non_salaried,
        }
    }

    pub fn admits(&self, age: u32, employment: EmploymentType) -> bool {
        age >= self.min_age && age <= self.max_age_for(employment)
    }
}

impl Default for AgeLimits {
    fn default() -> Self {
        AgeLimits {
            min_age: 23,
            max_age_salaried: 62,
            max_age_non_salaried: 70,
        }
    }
}

/// Static lending rules the eligibility engine sizes loans against.
///
/// The loan is always sized at `reference_rate_percent`, independently of the
/// rates quoted in the credit tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub income_bands: Vec<IncomeBand>,
    pub fallback_foir: Rate,
    pub reference_rate_percent: Rate,
    pub reference_principal: Money,
    /// A computed maximum must exceed this amount to be eligible.
    pub minimum_loan_amount: Money,
    pub age_limits: AgeLimits,
    pub credit_tiers: Vec<CreditTier>,
    /// Scores below this get a pricing warning in the envelope. Never gates
    /// eligibility.
    #[serde(default = "default_pricing_warning_score")]
    pub pricing_warning_below_score: u32,
}

fn default_pricing_warning_score() -> u32 {
    650
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        EligibilityPolicy {
            income_bands: default_income_bands(),
            fallback_foir: FALLBACK_FOIR,
            reference_rate_percent: dec!(9),
            reference_principal: dec!(100_000),
            minimum_loan_amount: dec!(100_000),
            age_limits: AgeLimits::default(),
            credit_tiers: default_credit_tiers(),
            pricing_warning_below_score: default_pricing_warning_score(),
        }
    }
}

impl EligibilityPolicy {
    /// Check the policy is internally consistent: bands ascending and
    /// contiguous with an open top band, every ratio in (0, 1], and a tier
    /// table sorted by descending score that catches every valid score.
    pub fn validate(&self) -> LoanEngineResult<()> {
        validate_ratio("fallback_foir", self.fallback_foir)?;

        let Some(last) = self.income_bands.last() else {
            return Err(LoanEngineError::InvalidPolicy(
                "at least one income band is required".into(),
            ));
        };
        if last.upper.is_some() {
            return Err(LoanEngineError::InvalidPolicy(
                "the highest income band must be open-ended".into(),
            ));
        }
        for band in &self.income_bands {
            validate_ratio("income_bands.foir", band.foir)?;
            if band.lower < Decimal::ZERO {
                return Err(LoanEngineError::InvalidPolicy(
                    "income band lower bounds cannot be negative".into(),
                ));
            }
        }
        for pair in self.income_bands.windows(2) {
            match pair[0].upper {
                Some(upper) if upper > pair[0].lower && upper == pair[1].lower => {}
                _ => {
                    return Err(LoanEngineError::InvalidPolicy(format!(
                        "income band starting at {} must end where the next band starts",
                        pair[0].lower
                    )))
                }
            }
        }

        if self.reference_rate_percent <= Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "reference rate must be positive".into(),
            ));
        }
        if self.reference_principal <= Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "reference principal must be positive".into(),
            ));
        }
        if self.minimum_loan_amount < Decimal::ZERO {
            return Err(LoanEngineError::InvalidPolicy(
                "minimum loan amount cannot be negative".into(),
            ));
        }

        let ages = &self.age_limits;
        if ages.min_age > ages.max_age_salaried || ages.min_age > ages.max_age_non_salaried {
            return Err(LoanEngineError::InvalidPolicy(
                "minimum age exceeds a maximum age".into(),
            ));
        }

        match self.credit_tiers.last() {
            Some(tier) if tier.min_score <= MIN_CREDIT_SCORE => {}
            _ => {
                return Err(LoanEngineError::InvalidPolicy(format!(
                    "the last credit tier must accept scores down to {MIN_CREDIT_SCORE}"
                )))
            }
        }
        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&self.pricing_warning_below_score) {
            return Err(LoanEngineError::InvalidPolicy(format!(
                "pricing_warning_below_score must be within {MIN_CREDIT_SCORE}..={MAX_CREDIT_SCORE}"
            )));
        }

        for pair in self.credit_tiers.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(LoanEngineError::InvalidPolicy(format!(
                    "credit tier '{}' must have a higher min_score than '{}'",
                    pair[0].name, pair[1].name
                )));
            }
        }
        for tier in &self.credit_tiers {
            for offer in &tier.offers {
                validate_ratio("loan_multiplier", offer.loan_multiplier)?;
            }
        }

        Ok(())
    }
}

fn validate_ratio(name: &str, value: Rate) -> LoanEngineResult<()> {
    if value <= Decimal::ZERO || value > Decimal::ONE {
        return Err(LoanEngineError::InvalidPolicy(format!(
            "{name} must be in (0, 1], got {value}"
        )));
    }
    Ok(())
}
