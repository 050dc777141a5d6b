use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoanEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Non-finite result in {context}")]
    NonFiniteResult { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Invalid eligibility policy: {0}")]
    InvalidPolicy(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanEngineError {
    fn from(e: serde_json::Error) -> Self {
        LoanEngineError::SerializationError(e.to_string())
    }
}

/// Broad class of a failure folded into a zeroed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    InvalidInput,
    NonFiniteResult,
}

/// Error indicator carried by results of the non-failing entry points
/// (`compute_amortization`, `compute_eligibility`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationFault {
    pub kind: FaultKind,
    pub message: String,
}

impl From<&LoanEngineError> for CalculationFault {
    fn from(e: &LoanEngineError) -> Self {
        let kind = match e {
            LoanEngineError::InvalidInput { .. }
            | LoanEngineError::InvalidPolicy(_)
            | LoanEngineError::SerializationError(_) => FaultKind::InvalidInput,
            LoanEngineError::NonFiniteResult { .. } | LoanEngineError::DivisionByZero { .. } => {
                FaultKind::NonFiniteResult
            }
        };
        CalculationFault {
            kind,
            message: e.to_string(),
        }
    }
}
