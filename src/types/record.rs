//! Row representation for the in-memory tables.

use serde_json::{Map, Value};

/// A single table row: field name mapped to a JSON value.
///
/// Field names and value types are fixed per table (integers, strings,
/// or date strings); no per-row schema variation exists in the dataset.
pub type Record = Map<String, Value>;

/// Numeric view of a field value, when it has one.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(42)), Some(42.0));
        assert_eq!(as_number(&json!(3.5)), Some(3.5));
        assert_eq!(as_number(&json!("laptop")), None);
    }
}
