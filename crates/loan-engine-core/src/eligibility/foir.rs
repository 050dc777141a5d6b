use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Annual income band `[lower, upper)` and the share of monthly income a
/// lender allows for debt service within it. `upper == None` is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBand {
    pub lower: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Money>,
    pub foir: Rate,
}

impl IncomeBand {
    pub fn contains(&self, annual_income: Money) -> bool {
        annual_income >= self.lower && self.upper.map_or(true, |upper| annual_income < upper)
    }
}

/// Ratio applied to incomes below the lowest band.
pub const FALLBACK_FOIR: Rate = dec!(0.55);

pub fn default_income_bands() -> Vec<IncomeBand> {
    vec![
        IncomeBand {
            lower: dec!(300_000),
            upper: Some(dec!(600_000)),
            foir: dec!(0.55),
        },
        IncomeBand {
            lower: dec!(600_000),
            upper: Some(dec!(1_000_000)),
            foir: dec!(0.60),
        },
        IncomeBand {
            lower: dec!(1_000_000),
            upper: Some(dec!(1_800_000)),
            foir: dec!(0.65),
        },
        IncomeBand {
            lower: dec!(1_800_000),
            upper: None,
            foir: dec!(0.70),
        },
    ]
}

/// Pick the FOIR for an annual income. The first band containing the income
/// wins; incomes outside every band get `fallback`.
pub fn select_foir(annual_income: Money, bands: &[IncomeBand], fallback: Rate) -> Rate {
    bands
        .iter()
        .find(|band| band.contains(annual_income))
        .map(|band| band.foir)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foir(annual: Money) -> Rate {
        select_foir(annual, &default_income_bands(), FALLBACK_FOIR)
    }

    #[test]
    fn test_below_lowest_band_uses_fallback() {
        assert_eq!(foir(dec!(120_000)), dec!(0.55));
        assert_eq!(foir(dec!(299_999.99)), dec!(0.55));
    }

    #[test]
    fn test_band_lower_bounds_are_inclusive() {
        assert_eq!(foir(dec!(300_000)), dec!(0.55));
        assert_eq!(foir(dec!(600_000)), dec!(0.60));
        assert_eq!(foir(dec!(1_000_000)), dec!(0.65));
        assert_eq!(foir(dec!(1_800_000)), dec!(0.70));
    }

    #[test]
    fn test_band_upper_bounds_are_exclusive() {
        assert_eq!(foir(dec!(599_999)), dec!(0.55));
        assert_eq!(foir(dec!(999_999)), dec!(0.60));
        assert_eq!(foir(dec!(1_799_999)), dec!(0.65));
    }

    #[test]
    fn test_top_band_is_open_ended() {
        assert_eq!(foir(dec!(50_000_000)), dec!(0.70));
    }
}
