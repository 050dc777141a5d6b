use serde_json::Value;

/// Fields that answer each command, most specific first.
const PRIORITY_KEYS: [&str; 4] = ["max_loan_amount", "emi", "eligible", "reference_rate_percent"];

/// Print just the key answer value from the output, falling back to the
/// first field of the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            if let Some(val) = PRIORITY_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find(|val| !val.is_null())
            {
                return format_minimal(val);
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
                None => String::new(),
            }
        }
        Value::Array(items) => format!("{} rows", items.len()),
        other => format_minimal(other),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eligibility_answer_is_max_loan() {
        let value = json!({"result": {"eligible": true, "emi": "30000", "max_loan_amount": "3334348"}});
        assert_eq!(minimal_answer(&value), "3334348");
    }

    #[test]
    fn test_emi_answer() {
        let value = json!({"result": {"principal": "2500000", "emi": "21696"}});
        assert_eq!(minimal_answer(&value), "21696");
    }

    #[test]
    fn test_schedule_answer_counts_rows() {
        assert_eq!(minimal_answer(&json!([{"month": 1}, {"month": 2}])), "2 rows");
    }
}
