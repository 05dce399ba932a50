//! Lenient scalar coercion. The backend sends numbers as JSON numbers,
//! numeric strings, or null depending on where the value came from.

use serde_json::Value;

/// Integer view of a number or numeric string. Fractions truncate toward
/// zero; a string with trailing garbage ("2019a") keeps its leading digits.
pub fn coerce_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| u.min(i64::MAX as u64) as i64))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s.trim()),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        return f.is_finite().then(|| f.trunc() as i64);
    }
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// `year` / `page` policy: integer, 0 when missing or non-numeric.
pub fn int_or_zero(v: &Value) -> i32 {
    coerce_i64(v).and_then(|n| i32::try_from(n).ok()).unwrap_or(0)
}

/// Non-negative count, 0 when missing, negative or non-numeric.
pub fn count_or_zero(v: &Value) -> u64 {
    coerce_i64(v).and_then(|n| u64::try_from(n).ok()).unwrap_or(0)
}

pub fn float_opt(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

pub fn float_or(v: &Value, default: f64) -> f64 {
    float_opt(v).unwrap_or(default)
}

pub fn bool_or_false(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(_) => coerce_i64(v).is_some_and(|n| n != 0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// Non-empty string, or `None`.
pub fn string_opt(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn string_or_empty(v: &Value) -> String {
    string_opt(v).unwrap_or_default()
}

/// First field of `keys` that holds a non-null value.
pub fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .map(|k| &raw[*k])
        .find(|v| !v.is_null())
        .unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_or_zero_policy() {
        assert_eq!(int_or_zero(&json!("2020")), 2020);
        assert_eq!(int_or_zero(&json!(2020)), 2020);
        assert_eq!(int_or_zero(&json!(12.9)), 12);
        assert_eq!(int_or_zero(&json!(null)), 0);
        assert_eq!(int_or_zero(&json!("n/a")), 0);
        assert_eq!(int_or_zero(&json!("2019a")), 2019);
        assert_eq!(int_or_zero(&json!(true)), 0);
        assert_eq!(int_or_zero(&json!(1e12)), 0);
    }

    #[test]
    fn test_count_or_zero_rejects_negative() {
        assert_eq!(count_or_zero(&json!(-3)), 0);
        assert_eq!(count_or_zero(&json!("17")), 17);
    }

    #[test]
    fn test_float_opt() {
        assert_eq!(float_opt(&json!(0.25)), Some(0.25));
        assert_eq!(float_opt(&json!("0.5")), Some(0.5));
        assert_eq!(float_opt(&json!("NaN")), None);
        assert_eq!(float_opt(&json!(null)), None);
    }

    #[test]
    fn test_first_present_skips_nulls() {
        let raw = json!({"page": null, "page_start": 7});
        assert_eq!(first_present(&raw, &["page", "page_start"]), &json!(7));
        assert!(first_present(&raw, &["missing"]).is_null());
    }
}
