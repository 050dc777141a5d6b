pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "eligibility")]
pub mod eligibility;

#[cfg(feature = "eligibility")]
pub mod form;

pub use error::{CalculationFault, FaultKind, LoanEngineError};
pub use types::*;

/// Standard result type for all loan-engine operations
pub type LoanEngineResult<T> = Result<T, LoanEngineError>;
