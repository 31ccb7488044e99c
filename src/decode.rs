//! Row decoding: converting MySQL result cells into [`Value`]s and rows
//! into [`FieldSet`]s.

use indexmap::IndexMap;
use sqlx::mysql::{MySqlRow, MySqlValueRef};
use sqlx::{Column, Row, TypeInfo, Value as _, ValueRef};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::error::Error;
use crate::value::{FieldSet, Value};

/// Convert a MySQL cell to a [`Value`].
///
/// The conversion switches on the column's MySQL type name. Binary-chunk
/// cells (BLOB/BINARY family) are normalized to their text form when the
/// payload is valid UTF-8, matching how text-protocol clients surface such
/// cells; non-UTF-8 payloads stay [`Value::Binary`]. Date and time columns
/// decode through the `time` crate and are rendered as text.
pub fn to_value(value: MySqlValueRef) -> Result<Value, Error> {
   if value.is_null() {
      return Ok(Value::Null);
   }

   let column_type = value.type_info();

   let result = match column_type.name() {
      "BOOLEAN" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<bool>() {
            Value::Bool(v)
         } else {
            Value::Null
         }
      }

      "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<i64>() {
            Value::Int(v)
         } else {
            Value::Null
         }
      }

      "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
      | "BIGINT UNSIGNED" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<u64>() {
            // Values beyond i64 have no lossless representation in Value
            if let Ok(int_val) = i64::try_from(v) {
               Value::Int(int_val)
            } else {
               Value::Float(v as f64)
            }
         } else {
            Value::Null
         }
      }

      "FLOAT" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<f32>() {
            Value::Float(v.into())
         } else {
            Value::Null
         }
      }

      "DOUBLE" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<f64>() {
            Value::Float(v)
         } else {
            Value::Null
         }
      }

      "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(v)
         } else {
            Value::Null
         }
      }

      "DATE" => {
         if let Ok(d) = ValueRef::to_owned(&value).try_decode::<Date>() {
            Value::Text(d.to_string())
         } else if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(v)
         } else {
            Value::Null
         }
      }

      "TIME" => {
         if let Ok(t) = ValueRef::to_owned(&value).try_decode::<Time>() {
            Value::Text(t.to_string())
         } else if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(v)
         } else {
            Value::Null
         }
      }

      "DATETIME" => {
         if let Ok(dt) = ValueRef::to_owned(&value).try_decode::<PrimitiveDateTime>() {
            Value::Text(dt.to_string())
         } else if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            // Fall back to string representation
            Value::Text(v)
         } else {
            Value::Null
         }
      }

      "TIMESTAMP" => {
         if let Ok(dt) = ValueRef::to_owned(&value).try_decode::<OffsetDateTime>() {
            Value::Text(dt.to_string())
         } else if let Ok(dt) = ValueRef::to_owned(&value).try_decode::<PrimitiveDateTime>() {
            Value::Text(dt.to_string())
         } else if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(v)
         } else {
            Value::Null
         }
      }

      "DECIMAL" => {
         // DECIMAL travels as a decimal string on the wire
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(v)
         } else if let Ok(bytes) = ValueRef::to_owned(&value).try_decode::<Vec<u8>>() {
            text_from_bytes(bytes)
         } else {
            Value::Null
         }
      }

      "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT"
      | "GEOMETRY" => {
         if let Ok(bytes) = ValueRef::to_owned(&value).try_decode::<Vec<u8>>() {
            text_from_bytes(bytes)
         } else {
            Value::Null
         }
      }

      "JSON" => {
         if let Ok(v) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(v)
         } else if let Ok(bytes) = ValueRef::to_owned(&value).try_decode::<Vec<u8>>() {
            text_from_bytes(bytes)
         } else {
            Value::Null
         }
      }

      "NULL" => Value::Null,

      _ => {
         // For unknown types, try text first, then raw bytes
         if let Ok(text) = ValueRef::to_owned(&value).try_decode::<String>() {
            Value::Text(text)
         } else if let Ok(bytes) = ValueRef::to_owned(&value).try_decode::<Vec<u8>>() {
            text_from_bytes(bytes)
         } else {
            return Err(Error::UnsupportedDatatype(format!(
               "Unknown MySQL type: {}",
               column_type.name()
            )));
         }
      }
   };

   Ok(result)
}

/// Normalize a binary payload to text when it is valid UTF-8.
fn text_from_bytes(bytes: Vec<u8>) -> Value {
   match String::from_utf8(bytes) {
      Ok(text) => Value::Text(text),
      Err(e) => Value::Binary(e.into_bytes()),
   }
}

/// Decode one result row into a [`FieldSet`], preserving column order and
/// column → cell alignment.
pub fn decode_row(row: &MySqlRow) -> Result<FieldSet, Error> {
   let mut fields = IndexMap::default();
   for (i, column) in row.columns().iter().enumerate() {
      let v = row.try_get_raw(i)?;
      let v = to_value(v)?;
      fields.insert(column.name().to_string(), v);
   }
   Ok(fields)
}

/// Decode a full cursor of rows, in cursor order.
///
/// An empty cursor yields an empty vector, never an absent result.
pub fn decode_rows(rows: Vec<MySqlRow>) -> Result<Vec<FieldSet>, Error> {
   let mut decoded = Vec::with_capacity(rows.len());
   for row in rows {
      decoded.push(decode_row(&row)?);
   }
   Ok(decoded)
}
