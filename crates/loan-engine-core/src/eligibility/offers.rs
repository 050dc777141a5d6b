use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Static description of one lender's offer within a credit tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTemplate {
    pub lender_name: String,
    pub interest_rate_range: String,
    pub processing_fee: String,
    /// Fraction of the applicant's maximum loan this lender will extend.
    pub loan_multiplier: Rate,
    pub special_features: Vec<String>,
}

/// Credit-score band mapped to a fixed list of offers. Tiers are matched in
/// order, so a table must be sorted by descending `min_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTier {
    pub name: String,
    pub min_score: u32,
    pub message: String,
    pub offers: Vec<OfferTemplate>,
}

/// Illustrative offer shown to an eligible applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenderOffer {
    pub lender_name: String,
    pub interest_rate_range: String,
    pub processing_fee: String,
    pub max_loan_amount: Money,
    pub special_features: Vec<String>,
}

/// First tier whose `min_score` the score reaches.
pub fn match_tier(credit_score: u32, tiers: &[CreditTier]) -> Option<&CreditTier> {
    tiers.iter().find(|tier| credit_score >= tier.min_score)
}

/// Materialise a tier's templates against the applicant's maximum loan.
pub fn build_offers(tier: &CreditTier, max_loan_amount: Money) -> Vec<LenderOffer> {
    tier.offers
        .iter()
        .map(|t| LenderOffer {
            lender_name: t.lender_name.clone(),
            interest_rate_range: t.interest_rate_range.clone(),
            processing_fee: t.processing_fee.clone(),
            max_loan_amount: (max_loan_amount * t.loan_multiplier).floor(),
            special_features: t.special_features.clone(),
        })
        .collect()
}

fn offer(
    lender_name: &str,
    interest_rate_range: &str,
    processing_fee: &str,
    loan_multiplier: Decimal,
    special_features: &[&str],
) -> OfferTemplate {
    OfferTemplate {
        lender_name: lender_name.into(),
        interest_rate_range: interest_rate_range.into(),
        processing_fee: processing_fee.into(),
        loan_multiplier,
        special_features: special_features.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_credit_tiers() -> Vec<CreditTier> {
    vec![
        CreditTier {
            name: "Excellent".into(),
            min_score: 750,
            message: "Excellent credit profile. You qualify for the best rates on offer.".into(),
            offers: vec![
                offer(
                    "Prime Housing Finance",
                    "7.25% - 8.10%",
                    "0.25%",
                    dec!(0.98),
                    &["Lowest rate band", "Zero foreclosure charges", "Doorstep service"],
                ),
                offer(
                    "National Trust Bank",
                    "7.50% - 8.35%",
                    "0.35%",
                    dec!(0.95),
                    &["Balance transfer with top-up", "Digital sanction in 48 hours"],
                ),
                offer(
                    "Metro Cooperative Bank",
                    "7.75% - 8.50%",
                    "0.50%",
                    dec!(0.92),
                    &["Rate concession for women co-applicants", "Flexible part-prepayment"],
                ),
                offer(
                    "Horizon Home Loans",
                    "7.90% - 8.75%",
                    "0.50%",
                    dec!(0.90),
                    &["Step-up EMI option", "Free property legal check"],
                ),
            ],
        },
        CreditTier {
            name: "Very Good".into(),
            min_score: 700,
            message: "Very good credit profile. Competitive offers are available.".into(),
            offers: vec![
                offer(
                    "National Trust Bank",
                    "8.25% - 9.00%",
                    "0.50%",
                    dec!(0.95),
                    &["Digital sanction in 72 hours", "Balance transfer facility"],
                ),
                offer(
                    "Metro Cooperative Bank",
                    "8.40% - 9.25%",
                    "0.50%",
                    dec!(0.92),
                    &["Flexible part-prepayment"],
                ),
                offer(
                    "Horizon Home Loans",
                    "8.60% - 9.50%",
                    "0.75%",
                    dec!(0.90),
                    &["Step-up EMI option", "Overdraft-linked home loan"],
                ),
            ],
        },
        CreditTier {
            name: "Good".into(),
            min_score: 650,
            message: "Good credit profile. Standard offers are available.".into(),
            offers: vec![
                offer(
                    "Horizon Home Loans",
                    "9.00% - 9.90%",
                    "1.00%",
                    dec!(0.90),
                    &["Step-up EMI option"],
                ),
                offer(
                    "Sahyog Housing Finance",
                    "9.25% - 10.25%",
                    "1.00%",
                    dec!(0.85),
                    &["Self-employed friendly documentation", "Loans for resale properties"],
                ),
                offer(
                    "Urban Small Finance Bank",
                    "9.50% - 10.50%",
                    "1.25%",
                    dec!(0.80),
                    &["Quick in-principle approval"],
                ),
            ],
        },
        CreditTier {
            name: "Fair".into(),
            min_score: 600,
            message: "Fair credit profile. Offers carry higher rates; a co-applicant can improve terms."
                .into(),
            offers: vec![
                offer(
                    "Sahyog Housing Finance",
                    "10.25% - 11.25%",
                    "1.50%",
                    dec!(0.80),
                    &["Co-applicant income considered", "Informal income assessment"],
                ),
                offer(
                    "Urban Small Finance Bank",
                    "10.50% - 11.50%",
                    "1.50%",
                    dec!(0.75),
                    &["Rate review after 12 on-time EMIs"],
                ),
            ],
        },
        CreditTier {
            name: "Needs Improvement".into(),
            min_score: 0,
            message: "Credit score below 600. Limited offers are available; improving your score unlocks better rates."
                .into(),
            offers: vec![
                offer(
                    "Urban Small Finance Bank",
                    "11.00% - 12.00%",
                    "2.00%",
                    dec!(0.70),
                    &["Credit-builder repayment plan", "Co-applicant recommended"],
                ),
                offer(
                    "Sahyog Housing Finance",
                    "11.25% - 12.00%",
                    "2.00%",
                    dec!(0.65),
                    &["Guarantor-backed sanction"],
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let tiers = default_credit_tiers();
        let name = |score| match_tier(score, &tiers).map(|t| t.name.as_str());
        assert_eq!(name(900), Some("Excellent"));
        assert_eq!(name(750), Some("Excellent"));
        assert_eq!(name(749), Some("Very Good"));
        assert_eq!(name(700), Some("Very Good"));
        assert_eq!(name(650), Some("Good"));
        assert_eq!(name(600), Some("Fair"));
        assert_eq!(name(599), Some("Needs Improvement"));
        assert_eq!(name(300), Some("Needs Improvement"));
    }

    #[test]
    fn test_offer_counts_per_tier() {
        let counts: Vec<usize> = default_credit_tiers().iter().map(|t| t.offers.len()).collect();
        assert_eq!(counts, vec![4, 3, 3, 2, 2]);
    }

    #[test]
    fn test_offer_caps_scale_with_max_loan() {
        let tiers = default_credit_tiers();
        let offers = build_offers(&tiers[0], dec!(3_334_348));
        assert_eq!(offers[0].max_loan_amount, dec!(3_267_661));
        assert_eq!(offers[1].max_loan_amount, dec!(3_167_630));
        assert_eq!(offers[0].lender_name, "Prime Housing Finance");
    }

    #[test]
    fn test_empty_table_matches_nothing() {
        assert!(match_tier(800, &[]).is_none());
    }
}
