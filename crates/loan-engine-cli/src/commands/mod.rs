pub mod amortization;
pub mod eligibility;
