use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_engine_core::amortization::{self, LoanTerms};

use crate::input;

/// Loan terms, given as flags or as a JSON/YAML document
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (8.5 = 8.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in years (1-30)
    #[arg(long, alias = "years")]
    pub tenure: Option<u32>,

    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    pub first_emi_date: Option<NaiveDate>,
}

/// Arguments for the EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Include the month-by-month schedule and yearly summary in the output
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for printing the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Aggregate installments per loan year
    #[arg(long)]
    pub yearly: bool,
}

fn read_terms(args: &LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(terms) = input::stdin::read_stdin()? {
        return Ok(terms);
    }

    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
        tenure_years: args.tenure.ok_or("--tenure is required (or provide --input)")?,
        first_emi_date: args.first_emi_date,
    })
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = read_terms(&args.loan)?;
    let output = amortization::calculate_amortization(&terms)?;
    let mut value = serde_json::to_value(output)?;

    if !args.schedule {
        strip_schedule(&mut value);
    }
    Ok(value)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = read_terms(&args.loan)?;
    let result = amortization::amortize(&terms)?;

    if args.yearly {
        Ok(serde_json::to_value(result.yearly_summary)?)
    } else {
        Ok(serde_json::to_value(result.schedule)?)
    }
}

/// Drop the per-month rows so the summary stays readable.
fn strip_schedule(value: &mut Value) {
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        result.remove("schedule");
        result.remove("yearly_summary");
    }
}
