//! Bridging between [`Value`] and serde.

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::object::Object;
use crate::value::Value;

impl Serialize for Value {
    /// Undefined serializes as unit; functions and iterators have no
    /// serialized form and fail.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => obj.serialize(serializer),
            Value::Function(_) | Value::Iterator(_) => Err(S::Error::custom(format!(
                "a {} has no serialized form",
                self.kind()
            ))),
        }
    }
}

impl Serialize for Object {
    /// Own properties as a map, in insertion order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::from(items.into_iter().map(Value::from).collect::<Vec<_>>())
            }
            serde_json::Value::Object(map) => Value::from(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Object>(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    /// Test that JSON objects keep their key order when converted.
    fn test_from_json_preserves_order() {
        let value = Value::from(json!({ "z": 1, "a": [true, null], "m": { "x": "y" } }));
        let obj = value.as_object().expect("object");

        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(obj.get("z"), Value::from(1));
        assert_eq!(obj.get("a"), Value::array(vec![Value::Bool(true), Value::Null]));
    }

    #[test]
    /// Test serializing built values back to JSON.
    ///
    /// This test verifies that:
    /// 1. Objects serialize as maps in insertion order
    /// 2. Undefined serializes as null
    /// 3. Functions cannot be serialized
    fn test_serialize() {
        let obj: Object = vec![
            ("b", Value::from("x")),
            ("a", Value::Undefined),
            ("c", Value::array([1, 2])),
        ]
        .into_iter()
        .collect();

        let text = serde_json::to_string(&obj).unwrap();
        assert_eq!(text, r#"{"b":"x","a":null,"c":[1.0,2.0]}"#);

        let func = Value::function(|_| Ok(Value::Null));
        let err = serde_json::to_string(&func).unwrap_err();
        assert!(err.to_string().contains("function has no serialized form"));
    }
}
