use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_engine_core::eligibility::{self, EligibilityInputs, EligibilityPolicy, EmploymentType};

use crate::input;

/// Arguments for the eligibility check
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON or YAML applicant file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML eligibility policy (defaults to the built-in policy)
    #[arg(long)]
    pub policy: Option<String>,

    /// Net monthly income
    #[arg(long, alias = "monthly-income")]
    pub income: Option<Decimal>,

    /// Applicant age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// salaried, self-employed or business
    #[arg(long, alias = "employment-type")]
    pub employment: Option<EmploymentType>,

    /// Existing monthly EMIs and other fixed obligations
    #[arg(long, default_value = "0")]
    pub obligations: Decimal,

    /// Credit bureau score (300-900)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Requested tenure in years (1-30)
    #[arg(long, alias = "years")]
    pub tenure: Option<u32>,
}

fn read_applicant(args: &EligibilityArgs) -> Result<EligibilityInputs, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(inputs) = input::stdin::read_stdin()? {
        return Ok(inputs);
    }

    Ok(EligibilityInputs {
        monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
        age: args.age.ok_or("--age is required (or provide --input)")?,
        employment_type: args
            .employment
            .ok_or("--employment is required (or provide --input)")?,
        existing_monthly_obligations: args.obligations,
        credit_score: args
            .credit_score
            .ok_or("--credit-score is required (or provide --input)")?,
        requested_tenure_years: args.tenure.ok_or("--tenure is required (or provide --input)")?,
    })
}

fn read_policy(path: Option<&str>) -> Result<EligibilityPolicy, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let policy: EligibilityPolicy = input::file::read_input(path)?;
            policy.validate()?;
            Ok(policy)
        }
        None => Ok(EligibilityPolicy::default()),
    }
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let applicant = read_applicant(&args)?;
    let policy = read_policy(args.policy.as_deref())?;
    let result = eligibility::calculate_eligibility(&applicant, &policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_policy() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(EligibilityPolicy::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_without_file() {
        let policy = read_policy(None).unwrap();
        assert_eq!(policy, EligibilityPolicy::default());
    }

    #[test]
    fn test_policy_command_lists_tiers() {
        let value = run_policy().unwrap();
        assert_eq!(value["credit_tiers"].as_array().unwrap().len(), 5);
        assert_eq!(value["reference_rate_percent"], "9");
    }
}
