//! Lenient field decoding shared by the JSON request bodies.
//!
//! Clients send ids as numbers or numeric strings and occasionally send
//! scalars where strings are expected. These helpers coerce what they can
//! and treat everything else as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a JSON number or numeric string to an id.
#[must_use]
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerces a JSON string, number or boolean to a string.
#[must_use]
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_id))
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        assert_eq!(coerce_id(&json!(7)), Some(7));
        assert_eq!(coerce_id(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_id(&json!("abc")), None);
        assert_eq!(coerce_id(&json!(1.5)), None);
        assert_eq!(coerce_id(&json!(null)), None);
    }

    #[test]
    fn strings_accept_scalars_only() {
        assert_eq!(coerce_string(&json!("cooked")).as_deref(), Some("cooked"));
        assert_eq!(coerce_string(&json!(3)).as_deref(), Some("3"));
        assert_eq!(coerce_string(&json!(true)).as_deref(), Some("true"));
        assert_eq!(coerce_string(&json!(["x"])), None);
    }
}
