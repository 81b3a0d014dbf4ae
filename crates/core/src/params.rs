//! Lookup helpers for reading operation options out of a JSON object.
//!
//! Each helper takes the options value, a key and a default. A missing key,
//! a `null`, a value of the wrong JSON type or a non-object options value all
//! yield the default; range checks happen later, when the option is used.

use serde_json::Value;

/// Reads a number as `f64`; integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer as `usize`.
///
/// Fractional or negative numbers fall back to `default` rather than being
/// truncated, so `"count": 2.5` is not silently read as 2.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a boolean.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"severity": 0.4, "whole": 1});
        assert_eq!(param_f64(&params, "severity", 0.6), 0.4);
        assert_eq!(param_f64(&params, "whole", 0.6), 1.0);
    }

    #[test]
    fn param_f64_defaults_on_missing_null_or_wrong_type() {
        let params = json!({"a": null, "b": "strong"});
        assert_eq!(param_f64(&params, "a", 0.6), 0.6);
        assert_eq!(param_f64(&params, "b", 0.6), 0.6);
        assert_eq!(param_f64(&params, "c", 0.6), 0.6);
    }

    #[test]
    fn param_usize_reads_counts() {
        let params = json!({"count": 12});
        assert_eq!(param_usize(&params, "count", 8), 12);
    }

    #[test]
    fn param_usize_rejects_negative_and_fractional() {
        let params = json!({"neg": -3, "frac": 2.5});
        assert_eq!(param_usize(&params, "neg", 8), 8);
        assert_eq!(param_usize(&params, "frac", 8), 8);
    }

    #[test]
    fn param_bool_reads_flags() {
        let params = json!({"respect_alpha": true, "other": 1});
        assert!(param_bool(&params, "respect_alpha", false));
        assert!(!param_bool(&params, "other", false));
    }

    #[test]
    fn helpers_default_for_non_object_params() {
        let params = json!([1, 2, 3]);
        assert_eq!(param_f64(&params, "severity", 0.6), 0.6);
        assert_eq!(param_usize(&params, "count", 8), 8);
        assert!(param_bool(&params, "respect_alpha", true));
    }
}
