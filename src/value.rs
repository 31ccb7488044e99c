//! Dynamic scalar values and the generic field map used by the CRUD facade

use base64::Engine;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Unordered column-name → value mapping.
///
/// A `FieldSet` is used both to build write statements (INSERT/UPDATE) and
/// to represent one decoded result row. Keys are unique; iteration follows
/// insertion order, but callers must not rely on any particular order.
pub type FieldSet = IndexMap<String, Value>;

/// A dynamically-typed SQL scalar.
///
/// This is the cell type for [`FieldSet`] values on both the write path
/// (statement arguments) and the read path (decoded row cells). The row
/// decoder normalizes text-compatible binary payloads to [`Value::Text`];
/// [`Value::Binary`] only survives decoding for payloads that are not
/// valid UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
   /// SQL NULL
   Null,
   /// Boolean (stored by MySQL as TINYINT(1))
   Bool(bool),
   /// Signed 64-bit integer
   Int(i64),
   /// 64-bit float
   Float(f64),
   /// Text
   Text(String),
   /// Raw bytes
   Binary(Vec<u8>),
}

impl Value {
   /// Returns true if this value is [`Value::Null`].
   pub fn is_null(&self) -> bool {
      matches!(self, Value::Null)
   }

   /// Borrow the text payload, if this is a [`Value::Text`].
   pub fn as_str(&self) -> Option<&str> {
      match self {
         Value::Text(s) => Some(s),
         _ => None,
      }
   }

   /// The integer payload, if this is a [`Value::Int`].
   pub fn as_i64(&self) -> Option<i64> {
      match self {
         Value::Int(i) => Some(*i),
         _ => None,
      }
   }
}

impl From<bool> for Value {
   fn from(v: bool) -> Self {
      Value::Bool(v)
   }
}

impl From<i64> for Value {
   fn from(v: i64) -> Self {
      Value::Int(v)
   }
}

impl From<i32> for Value {
   fn from(v: i32) -> Self {
      Value::Int(v.into())
   }
}

impl From<u32> for Value {
   fn from(v: u32) -> Self {
      Value::Int(v.into())
   }
}

impl From<f64> for Value {
   fn from(v: f64) -> Self {
      Value::Float(v)
   }
}

impl From<&str> for Value {
   fn from(v: &str) -> Self {
      Value::Text(v.to_string())
   }
}

impl From<String> for Value {
   fn from(v: String) -> Self {
      Value::Text(v)
   }
}

impl From<Vec<u8>> for Value {
   fn from(v: Vec<u8>) -> Self {
      Value::Binary(v)
   }
}

impl<T: Into<Value>> From<Option<T>> for Value {
   fn from(v: Option<T>) -> Self {
      v.map_or(Value::Null, Into::into)
   }
}

impl From<Value> for JsonValue {
   /// Convert a decoded value to JSON.
   ///
   /// Binary payloads become base64-encoded strings since JSON has no
   /// native binary type. Non-finite floats become JSON null.
   fn from(value: Value) -> Self {
      match value {
         Value::Null => JsonValue::Null,
         Value::Bool(b) => JsonValue::Bool(b),
         Value::Int(i) => JsonValue::Number(i.into()),
         Value::Float(f) => serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
         Value::Text(s) => JsonValue::String(s),
         Value::Binary(b) => JsonValue::String(base64_encode(&b)),
      }
   }
}

impl Serialize for Value {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      match self {
         Value::Null => serializer.serialize_unit(),
         Value::Bool(b) => serializer.serialize_bool(*b),
         Value::Int(i) => serializer.serialize_i64(*i),
         Value::Float(f) => serializer.serialize_f64(*f),
         Value::Text(s) => serializer.serialize_str(s),
         Value::Binary(b) => serializer.serialize_str(&base64_encode(b)),
      }
   }
}

/// Base64 encode binary data for JSON serialization.
fn base64_encode(data: &[u8]) -> String {
   base64::engine::general_purpose::STANDARD.encode(data)
}

/// Bind a [`Value`] to a SQLx MySQL query as the next positional argument.
pub fn bind_value<'a>(
   query: sqlx::query::Query<'a, sqlx::MySql, sqlx::mysql::MySqlArguments>,
   value: Value,
) -> sqlx::query::Query<'a, sqlx::MySql, sqlx::mysql::MySqlArguments> {
   match value {
      Value::Null => query.bind(None::<String>),
      Value::Bool(b) => query.bind(b),
      Value::Int(i) => query.bind(i),
      Value::Float(f) => query.bind(f),
      Value::Text(s) => query.bind(s),
      Value::Binary(b) => query.bind(b),
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_from_scalars() {
      assert_eq!(Value::from(42_i64), Value::Int(42));
      assert_eq!(Value::from(42_i32), Value::Int(42));
      assert_eq!(Value::from(1.5), Value::Float(1.5));
      assert_eq!(Value::from(true), Value::Bool(true));
      assert_eq!(Value::from("a"), Value::Text("a".into()));
      assert_eq!(Value::from(vec![1_u8, 2]), Value::Binary(vec![1, 2]));
   }

   #[test]
   fn test_from_option() {
      assert_eq!(Value::from(None::<i64>), Value::Null);
      assert_eq!(Value::from(Some(7_i64)), Value::Int(7));
   }

   #[test]
   fn test_json_bridge() {
      assert_eq!(JsonValue::from(Value::Null), JsonValue::Null);
      assert_eq!(JsonValue::from(Value::Int(42)), serde_json::json!(42));
      assert_eq!(JsonValue::from(Value::Text("a".into())), serde_json::json!("a"));
      // Binary crosses into JSON as base64
      assert_eq!(
         JsonValue::from(Value::Binary(b"hello".to_vec())),
         serde_json::json!("aGVsbG8=")
      );
      // NaN has no JSON representation
      assert_eq!(JsonValue::from(Value::Float(f64::NAN)), JsonValue::Null);
   }

   #[test]
   fn test_field_set_serializes_in_insertion_order() {
      let mut fields = FieldSet::default();
      fields.insert("name".to_string(), Value::from("a"));
      fields.insert("age".to_string(), Value::from(10_i64));

      let json = serde_json::to_string(&fields).unwrap();
      assert_eq!(json, r#"{"name":"a","age":10}"#);
   }
}
