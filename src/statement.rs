//! Statement building: turning field maps into column lists, placeholder
//! lists, and positional argument sequences.
//!
//! These are pure functions; SQL assembly and execution live in the client.

use crate::error::{Error, Result};
use crate::value::{FieldSet, Value};

/// The (columns, placeholders, arguments) triple for one write statement.
///
/// For a single-row insert the placeholder list is `?,?,...` with one
/// marker per column; for a batch insert it is `(?,...),(?,...),...` with
/// one group per row. The argument sequence always matches the placeholder
/// count, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementFragment {
   /// Comma-joined column names, in the field map's iteration order.
   pub columns: String,
   /// Positional placeholder list matching `columns`.
   pub placeholders: String,
   /// Values to bind, one per placeholder.
   pub arguments: Vec<Value>,
}

/// Build the column list, placeholder list, and arguments for a single-row
/// INSERT.
///
/// Column order follows the field map's iteration order; callers must not
/// rely on any particular order beyond column/argument alignment.
pub fn insert_fragment(fields: &FieldSet) -> StatementFragment {
   let columns = fields.keys().cloned().collect::<Vec<_>>().join(",");
   let placeholders = repeat_placeholders(fields.len());
   let arguments = fields.values().cloned().collect();

   StatementFragment {
      columns,
      placeholders,
      arguments,
   }
}

/// Build the `column=?` list and arguments for an UPDATE's SET clause.
///
/// WHERE-clause arguments are not part of the fragment; the client appends
/// them after the SET arguments, preserving call-site order.
pub fn set_fragment(fields: &FieldSet) -> (String, Vec<Value>) {
   let assignments = fields
      .keys()
      .map(|key| format!("{key}=?"))
      .collect::<Vec<_>>()
      .join(",");
   let arguments = fields.values().cloned().collect();

   (assignments, arguments)
}

/// Build the column list, row-grouped placeholder list, and flattened
/// arguments for a multi-row INSERT.
///
/// The column list is derived from the first row. Every subsequent row must
/// carry exactly the same key set; a row with a missing or extra key fails
/// with [`Error::MismatchedBatchRow`] instead of silently binding values to
/// the wrong columns.
pub fn batch_insert_fragment(rows: &[FieldSet]) -> Result<StatementFragment> {
   let Some(first) = rows.first() else {
      return Err(Error::InvalidArgument("batch data list is empty".into()));
   };

   let group = format!("({})", repeat_placeholders(first.len()));
   let mut placeholders = Vec::with_capacity(rows.len());
   let mut arguments = Vec::with_capacity(rows.len() * first.len());

   for (index, row) in rows.iter().enumerate() {
      if row.len() != first.len() {
         return Err(Error::MismatchedBatchRow(index));
      }
      for key in first.keys() {
         let Some(value) = row.get(key) else {
            return Err(Error::MismatchedBatchRow(index));
         };
         arguments.push(value.clone());
      }
      placeholders.push(group.clone());
   }

   Ok(StatementFragment {
      columns: first.keys().cloned().collect::<Vec<_>>().join(","),
      placeholders: placeholders.join(","),
      arguments,
   })
}

/// `?,?,...,?` with `count` markers.
fn repeat_placeholders(count: usize) -> String {
   let mut s = "?,".repeat(count);
   s.pop();
   s
}

#[cfg(test)]
mod tests {
   use super::*;

   fn sample_fields() -> FieldSet {
      let mut fields = FieldSet::default();
      fields.insert("name".to_string(), Value::from("a"));
      fields.insert("age".to_string(), Value::from(10_i64));
      fields
   }

   #[test]
   fn test_insert_fragment_counts_match() {
      let fragment = insert_fragment(&sample_fields());

      assert_eq!(fragment.columns.split(',').count(), 2);
      assert_eq!(fragment.placeholders.split(',').count(), 2);
      assert_eq!(fragment.arguments.len(), 2);
   }

   #[test]
   fn test_insert_fragment_preserves_alignment() {
      let fragment = insert_fragment(&sample_fields());

      assert_eq!(fragment.columns, "name,age");
      assert_eq!(fragment.placeholders, "?,?");
      assert_eq!(
         fragment.arguments,
         vec![Value::from("a"), Value::from(10_i64)]
      );
   }

   #[test]
   fn test_insert_fragment_single_column() {
      let mut fields = FieldSet::default();
      fields.insert("id".to_string(), Value::from(1_i64));

      let fragment = insert_fragment(&fields);
      assert_eq!(fragment.columns, "id");
      assert_eq!(fragment.placeholders, "?");
   }

   #[test]
   fn test_set_fragment() {
      let mut fields = FieldSet::default();
      fields.insert("age".to_string(), Value::from(11_i64));

      let (assignments, arguments) = set_fragment(&fields);
      assert_eq!(assignments, "age=?");
      assert_eq!(arguments, vec![Value::from(11_i64)]);
   }

   #[test]
   fn test_set_fragment_multiple_columns() {
      let (assignments, arguments) = set_fragment(&sample_fields());
      assert_eq!(assignments, "name=?,age=?");
      assert_eq!(arguments.len(), 2);
   }

   #[test]
   fn test_batch_fragment_groups_placeholders_per_row() {
      let rows = vec![sample_fields(), sample_fields(), sample_fields()];
      let fragment = batch_insert_fragment(&rows).unwrap();

      assert_eq!(fragment.columns, "name,age");
      assert_eq!(fragment.placeholders, "(?,?),(?,?),(?,?)");
      assert_eq!(fragment.arguments.len(), 6);
   }

   #[test]
   fn test_batch_fragment_flattens_arguments_in_row_order() {
      let mut second = FieldSet::default();
      // Same key set, different insertion order: values must still follow
      // the first row's column order
      second.insert("age".to_string(), Value::from(20_i64));
      second.insert("name".to_string(), Value::from("b"));

      let fragment = batch_insert_fragment(&[sample_fields(), second]).unwrap();
      assert_eq!(
         fragment.arguments,
         vec![
            Value::from("a"),
            Value::from(10_i64),
            Value::from("b"),
            Value::from(20_i64),
         ]
      );
   }

   #[test]
   fn test_batch_fragment_rejects_empty_list() {
      let err = batch_insert_fragment(&[]).unwrap_err();
      assert!(matches!(err, Error::InvalidArgument(_)));
   }

   #[test]
   fn test_batch_fragment_rejects_missing_key() {
      let mut short = FieldSet::default();
      short.insert("name".to_string(), Value::from("b"));

      let err = batch_insert_fragment(&[sample_fields(), short]).unwrap_err();
      assert!(matches!(err, Error::MismatchedBatchRow(1)));
   }

   #[test]
   fn test_batch_fragment_rejects_renamed_key() {
      let mut renamed = FieldSet::default();
      renamed.insert("name".to_string(), Value::from("b"));
      renamed.insert("years".to_string(), Value::from(20_i64));

      let err = batch_insert_fragment(&[sample_fields(), renamed]).unwrap_err();
      assert!(matches!(err, Error::MismatchedBatchRow(1)));
   }
}
