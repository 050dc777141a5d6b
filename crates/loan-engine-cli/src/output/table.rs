use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::currency::{format_inr, is_money_field};

/// Format output as tables using the tabled crate. Nested lists of records
/// (offers, schedules) are printed as their own tables below the summary.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalar fields go into a Field/Value table; arrays of objects follow as
/// titled tables of their own.
fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&String, &Vec<Value>)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => nested.push((key, items)),
            _ => builder.push_record([key.as_str(), &format_field(key, val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in nested {
        println!("\n{}:", title_case(key));
        print_array_table(items);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| title_case(h)));

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_field(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_field(key: &str, value: &Value) -> String {
    let rendered = format_value(value);
    if is_money_field(key) && (value.is_string() || value.is_number()) {
        format_inr(&rendered)
    } else {
        rendered
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_money_fields_grouped() {
        assert_eq!(format_field("max_loan_amount", &json!("3334348")), "₹33,34,348");
        assert_eq!(format_field("foir", &json!("0.60")), "0.60");
        assert_eq!(format_field("month", &json!(120)), "120");
    }

    #[test]
    fn test_features_joined() {
        assert_eq!(
            format_value(&json!(["Step-up EMI option", "Free property legal check"])),
            "Step-up EMI option, Free property legal check"
        );
        assert_eq!(format_value(&json!(true)), "yes");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("recommended_offers"), "Recommended Offers");
        assert_eq!(title_case("emi"), "Emi");
    }
}
