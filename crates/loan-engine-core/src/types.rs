use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values, in whole-unit currency (e.g. rupees). Wraps Decimal
/// to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates. Annual loan rates arrive as percentages (8.5 = 8.5%); ratios such
/// as FOIR and monthly rates are decimals (0.60 = 60%).
pub type Rate = Decimal;

/// Round a monetary amount to the nearest whole currency unit.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a percentage or sub-unit amount to two places, half away from zero
/// like [`round_currency`].
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(21695.5)), dec!(21696));
        assert_eq!(round_currency(dec!(21695.49)), dec!(21695));
        assert_eq!(round_currency(dec!(0.5)), dec!(1));
    }

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(dec!(12.345)), dec!(12.35));
        assert_eq!(round_cents(dec!(12.355)), dec!(12.36));
        assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
    }
}
