pub mod emi;
pub mod schedule;

pub use emi::{
    amortize, calculate_amortization, compute_amortization, AmortizationResult, LoanTerms,
    MAX_TENURE_YEARS,
};
pub use schedule::{MonthRow, YearSummary};
