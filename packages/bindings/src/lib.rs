use napi::Result as NapiResult;
use napi_derive::napi;

use loan_engine_core::amortization::{self, LoanTerms};
use loan_engine_core::eligibility::{self, EligibilityInputs, EligibilityPolicy};
use loan_engine_core::form::{ApplicantForm, CalculatorForm};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_amortization(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_amortization(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Never throws for form mistakes: blank, negative, fractional or non-numeric
/// values come back as a zeroed result with an `error` field, so a form can
/// recalculate on every keystroke. Only a malformed JSON document throws.
#[napi]
pub fn compute_amortization(input_json: String) -> NapiResult<String> {
    let form: CalculatorForm = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&form.compute()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_eligibility(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let inputs: EligibilityInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = match policy_json {
        Some(json) => serde_json::from_str::<EligibilityPolicy>(&json).map_err(to_napi_error)?,
        None => EligibilityPolicy::default(),
    };
    let output = eligibility::calculate_eligibility(&inputs, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Lenient like [`compute_amortization`]: bad field values produce a zeroed,
/// non-eligible result carrying the fault.
#[napi]
pub fn compute_eligibility(input_json: String) -> NapiResult<String> {
    let form: ApplicantForm = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&form.compute()).map_err(to_napi_error)
}

#[napi]
pub fn default_eligibility_policy() -> NapiResult<String> {
    serde_json::to_string(&EligibilityPolicy::default()).map_err(to_napi_error)
}
