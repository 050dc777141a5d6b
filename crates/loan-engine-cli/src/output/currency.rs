use rust_decimal::Decimal;
use std::str::FromStr;

/// Field names whose values are currency amounts.
const MONEY_SUFFIXES: [&str; 9] = [
    "amount",
    "emi",
    "payment",
    "interest",
    "principal",
    "balance",
    "_paid",
    "income",
    "obligations",
];

pub fn is_money_field(key: &str) -> bool {
    !key.ends_with("_percent") && MONEY_SUFFIXES.iter().any(|s| key.ends_with(s))
}

/// Group digits the Indian way (12,34,56,789.50) and prefix the rupee sign.
/// Values that are not decimal numbers are returned unchanged.
pub fn format_inr(raw: &str) -> String {
    let Ok(amount) = Decimal::from_str(raw) else {
        return raw.to_string();
    };

    let text = amount.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let grouped = group_indian(whole);
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    match fraction {
        Some(f) => format!("{sign}₹{grouped}.{f}"),
        None => format!("{sign}₹{grouped}"),
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lakh_and_crore_grouping() {
        assert_eq!(format_inr("999"), "₹999");
        assert_eq!(format_inr("1000"), "₹1,000");
        assert_eq!(format_inr("250000"), "₹2,50,000");
        assert_eq!(format_inr("21696"), "₹21,696");
        assert_eq!(format_inr("123456789.5"), "₹12,34,56,789.5");
        assert_eq!(format_inr("-2706939"), "-₹27,06,939");
    }

    #[test]
    fn test_non_numeric_passthrough() {
        assert_eq!(format_inr("7.25% - 8.10%"), "7.25% - 8.10%");
    }

    #[test]
    fn test_money_field_detection() {
        assert!(is_money_field("max_loan_amount"));
        assert!(is_money_field("emi"));
        assert!(is_money_field("net_available_emi"));
        assert!(is_money_field("principal_paid"));
        assert!(!is_money_field("interest_share_percent"));
        assert!(!is_money_field("month"));
        assert!(!is_money_field("foir"));
    }
}
