pub mod assess;
pub mod foir;
pub mod offers;
pub mod policy;

pub use assess::{
    assess_eligibility, calculate_eligibility, compute_eligibility, EligibilityInputs,
    EligibilityResult, EmploymentType, IneligibilityReason,
};
pub use offers::{CreditTier, LenderOffer, OfferTemplate};
pub use policy::{AgeLimits, EligibilityPolicy};
