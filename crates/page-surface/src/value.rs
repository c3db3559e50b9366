//! Helpers for interpreting document-context evaluation results.

use serde_json::Value;

/// JavaScript truthiness for a JSON value: `false`, `null`, `0`, `NaN`, and
/// the empty string are falsy; everything else, including `"0"`, is truthy.
pub fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number
            .as_f64()
            .map(|n| n != 0.0 && !n.is_nan())
            .unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!js_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for value in [json!(true), json!(1), json!("0"), json!([]), json!({})] {
            assert!(js_truthy(&value), "{value} should be truthy");
        }
    }
}
