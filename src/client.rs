//! The CRUD facade: a pooled MySQL client with map-based write and read
//! operations.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::debug;

use crate::config::{MySqlClientConfig, QuoteStyle};
use crate::decode::{decode_row, decode_rows};
use crate::error::{Error, Result};
use crate::statement::{batch_insert_fragment, insert_fragment, set_fragment};
use crate::value::{FieldSet, Value, bind_value};

/// Pooled MySQL client exposing map-based CRUD operations.
///
/// The client owns a connection pool for its lifetime and is safe to share
/// across concurrent callers; each operation checks a pooled connection out
/// for the duration of a single call. The facade holds no other state, so
/// no locking happens at this layer.
///
/// WHERE fragments are taken verbatim: the client never parses, validates,
/// or escapes them. Keeping a fragment free of untrusted input is the
/// caller's responsibility; only values bound through placeholders are
/// parameter-escaped by the driver.
///
/// # Example
///
/// ```no_run
/// use sqlx_mysql_toolkit::{FieldSet, MySqlClient, MySqlClientConfig, Value};
///
/// # async fn example() -> Result<(), sqlx_mysql_toolkit::Error> {
/// let client = MySqlClient::connect(MySqlClientConfig {
///     user: "app".into(),
///     password: "secret".into(),
///     database: "app_db".into(),
///     ..Default::default()
/// })
/// .await?;
///
/// let mut user = FieldSet::default();
/// user.insert("name".into(), Value::from("a"));
/// user.insert("age".into(), Value::from(10_i64));
///
/// let id = client.insert("users", &user).await?;
/// let row = client
///     .get_one("users", "*", Some("id=?"), vec![Value::Int(id as i64)])
///     .await?;
///
/// client.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct MySqlClient {
   pool: MySqlPool,
   debug: bool,
   quote_style: QuoteStyle,
}

impl MySqlClient {
   /// Connect to a MySQL server and verify liveness.
   ///
   /// Builds a connection pool from the configuration (max-open maps to the
   /// pool's maximum connection count, max-idle to the count kept alive
   /// while idle) and issues a `SELECT 1` ping. Connectivity and ping
   /// failures are returned as errors, never swallowed.
   pub async fn connect(config: MySqlClientConfig) -> Result<Self> {
      let mut options = MySqlConnectOptions::new()
         .host(&config.host)
         .port(config.port)
         .username(&config.user)
         .password(&config.password);

      if !config.database.is_empty() {
         options = options.database(&config.database);
      }

      let pool = MySqlPoolOptions::new()
         .max_connections(config.max_open_connections)
         .min_connections(config.max_idle_connections)
         .connect_with(options)
         .await?;

      // Liveness check before handing the pool to the caller
      sqlx::query("SELECT 1").execute(&pool).await?;

      Ok(Self {
         pool,
         debug: config.debug,
         quote_style: config.quote_style,
      })
   }

   /// Insert one row and return the generated identifier.
   ///
   /// Column order follows the field map's iteration order. Returns the
   /// database-reported last-insert id verbatim.
   pub async fn insert(&self, table: &str, fields: &FieldSet) -> Result<u64> {
      require_table(table)?;
      if fields.is_empty() {
         return Err(Error::InvalidArgument("field set is empty".into()));
      }

      let fragment = insert_fragment(fields);
      let sql = format!(
         "INSERT INTO {} ({}) VALUES ({})",
         self.quote_style.quote(table),
         fragment.columns,
         fragment.placeholders
      );
      self.log_sql(&sql, &fragment.arguments);

      let mut query = sqlx::query(&sql);
      for value in fragment.arguments {
         query = bind_value(query, value);
      }
      let result = query.execute(&self.pool).await?;

      Ok(result.last_insert_id())
   }

   /// Insert multiple rows as one statement and return the affected-row
   /// count.
   ///
   /// All rows must share the first row's exact key set; a mismatched row
   /// fails fast with [`Error::MismatchedBatchRow`] before any store
   /// access. A single-row list delegates to [`insert`](Self::insert) and
   /// reports 1. The batch is one statement: it fully succeeds or fully
   /// fails as a unit.
   pub async fn batch_insert(&self, table: &str, rows: &[FieldSet]) -> Result<u64> {
      require_table(table)?;
      if rows.is_empty() {
         return Err(Error::InvalidArgument("batch data list is empty".into()));
      }
      if rows.len() == 1 {
         self.insert(table, &rows[0]).await?;
         return Ok(1);
      }

      let fragment = batch_insert_fragment(rows)?;
      let sql = format!(
         "INSERT INTO {} ({}) VALUES {}",
         self.quote_style.quote(table),
         fragment.columns,
         fragment.placeholders
      );
      self.log_sql(&sql, &fragment.arguments);

      let mut query = sqlx::query(&sql);
      for value in fragment.arguments {
         query = bind_value(query, value);
      }
      let result = query.execute(&self.pool).await?;

      Ok(result.rows_affected())
   }

   /// Update rows matching the WHERE fragment and return the affected-row
   /// count.
   ///
   /// SET-clause arguments come first, then `args` in call-site order (for
   /// the WHERE fragment's placeholders).
   pub async fn update(
      &self,
      table: &str,
      fields: &FieldSet,
      where_clause: Option<&str>,
      args: Vec<Value>,
   ) -> Result<u64> {
      require_table(table)?;
      if fields.is_empty() {
         return Err(Error::InvalidArgument("field set is empty".into()));
      }

      let (assignments, mut arguments) = set_fragment(fields);
      let sql = update_sql(self.quote_style, table, &assignments, where_clause);
      arguments.extend(args);
      self.log_sql(&sql, &arguments);

      let mut query = sqlx::query(&sql);
      for value in arguments {
         query = bind_value(query, value);
      }
      let result = query.execute(&self.pool).await?;

      Ok(result.rows_affected())
   }

   /// Delete rows matching the WHERE fragment and return the affected-row
   /// count.
   pub async fn delete(
      &self,
      table: &str,
      where_clause: Option<&str>,
      args: Vec<Value>,
   ) -> Result<u64> {
      require_table(table)?;

      let sql = delete_sql(self.quote_style, table, where_clause);
      self.log_sql(&sql, &args);

      let mut query = sqlx::query(&sql);
      for value in args {
         query = bind_value(query, value);
      }
      let result = query.execute(&self.pool).await?;

      Ok(result.rows_affected())
   }

   /// Count rows matching the WHERE fragment.
   pub async fn count(
      &self,
      table: &str,
      where_clause: Option<&str>,
      args: Vec<Value>,
   ) -> Result<i64> {
      require_table(table)?;

      let sql = count_sql(self.quote_style, table, where_clause);
      self.log_sql(&sql, &args);

      let mut query = sqlx::query(&sql);
      for value in args {
         query = bind_value(query, value);
      }
      let row = query.fetch_one(&self.pool).await?;

      Ok(row.try_get(0)?)
   }

   /// Fetch at most one row, decoded into a [`FieldSet`].
   ///
   /// `fields` is the verbatim SELECT list (e.g. `"*"` or `"name,age"`).
   /// Zero matching rows yield an empty field set, not an error.
   pub async fn get_one(
      &self,
      table: &str,
      fields: &str,
      where_clause: Option<&str>,
      args: Vec<Value>,
   ) -> Result<FieldSet> {
      require_table(table)?;

      let sql = select_sql(self.quote_style, table, fields, where_clause, true);
      self.log_sql(&sql, &args);

      let mut query = sqlx::query(&sql);
      for value in args {
         query = bind_value(query, value);
      }

      match query.fetch_optional(&self.pool).await? {
         Some(row) => decode_row(&row),
         None => Ok(FieldSet::default()),
      }
   }

   /// Fetch all rows matching the WHERE fragment, decoded into
   /// [`FieldSet`]s in cursor order.
   ///
   /// An empty result set yields an empty vector, never an absent result.
   pub async fn select(
      &self,
      table: &str,
      fields: &str,
      where_clause: Option<&str>,
      args: Vec<Value>,
   ) -> Result<Vec<FieldSet>> {
      require_table(table)?;

      let sql = select_sql(self.quote_style, table, fields, where_clause, false);
      self.log_sql(&sql, &args);

      let mut query = sqlx::query(&sql);
      for value in args {
         query = bind_value(query, value);
      }
      let rows = query.fetch_all(&self.pool).await?;

      decode_rows(rows)
   }

   /// Run a caller-supplied SQL query and decode every returned row.
   ///
   /// The escape hatch for anything the structured operations cannot
   /// express (joins, grouping, subqueries). The SQL text is passed to the
   /// driver verbatim.
   pub async fn query(&self, sql: &str, args: Vec<Value>) -> Result<Vec<FieldSet>> {
      self.log_sql(sql, &args);

      let mut query = sqlx::query(sql);
      for value in args {
         query = bind_value(query, value);
      }
      let rows = query.fetch_all(&self.pool).await?;

      decode_rows(rows)
   }

   /// Close the connection pool.
   ///
   /// Waits for checked-out connections to be returned. Must not race with
   /// in-flight operations on clones of the pool.
   pub async fn close(self) -> Result<()> {
      self.pool.close().await;
      Ok(())
   }

   fn log_sql(&self, sql: &str, args: &[Value]) {
      if self.debug {
         debug!("SQL debug: {sql}; params: {args:?}");
      }
   }
}

fn require_table(table: &str) -> Result<()> {
   if table.is_empty() {
      return Err(Error::InvalidArgument("table name is empty".into()));
   }
   Ok(())
}

fn append_where(sql: &mut String, where_clause: Option<&str>) {
   if let Some(clause) = where_clause
      && !clause.is_empty()
   {
      sql.push_str(" WHERE ");
      sql.push_str(clause);
   }
}

fn update_sql(
   quote_style: QuoteStyle,
   table: &str,
   assignments: &str,
   where_clause: Option<&str>,
) -> String {
   let mut sql = format!("UPDATE {} SET {}", quote_style.quote(table), assignments);
   append_where(&mut sql, where_clause);
   sql
}

fn delete_sql(quote_style: QuoteStyle, table: &str, where_clause: Option<&str>) -> String {
   let mut sql = format!("DELETE FROM {}", quote_style.quote(table));
   append_where(&mut sql, where_clause);
   sql
}

fn count_sql(quote_style: QuoteStyle, table: &str, where_clause: Option<&str>) -> String {
   let mut sql = format!(
      "SELECT COUNT(*) AS total FROM {}",
      quote_style.quote(table)
   );
   append_where(&mut sql, where_clause);
   sql
}

fn select_sql(
   quote_style: QuoteStyle,
   table: &str,
   fields: &str,
   where_clause: Option<&str>,
   limit_one: bool,
) -> String {
   let mut sql = format!("SELECT {} FROM {}", fields, quote_style.quote(table));
   append_where(&mut sql, where_clause);
   if limit_one {
      sql.push_str(" LIMIT 1");
   }
   sql
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_require_table_rejects_empty_name() {
      let err = require_table("").unwrap_err();
      assert!(matches!(err, Error::InvalidArgument(_)));
      assert!(require_table("users").is_ok());
   }

   #[test]
   fn test_select_sql_without_where() {
      let sql = select_sql(QuoteStyle::Backtick, "users", "*", None, false);
      assert_eq!(sql, "SELECT * FROM `users`");
   }

   #[test]
   fn test_select_sql_with_where_and_limit() {
      let sql = select_sql(QuoteStyle::Backtick, "users", "name,age", Some("id=?"), true);
      assert_eq!(sql, "SELECT name,age FROM `users` WHERE id=? LIMIT 1");
   }

   #[test]
   fn test_select_sql_bracket_style() {
      let sql = select_sql(QuoteStyle::Bracket, "users", "*", None, false);
      assert_eq!(sql, "SELECT * FROM [users]");
   }

   #[test]
   fn test_empty_where_fragment_is_dropped() {
      let sql = delete_sql(QuoteStyle::Backtick, "users", Some(""));
      assert_eq!(sql, "DELETE FROM `users`");
   }

   #[test]
   fn test_update_sql_and_argument_order() {
      let mut fields = FieldSet::default();
      fields.insert("age".to_string(), Value::from(11_i64));

      let (assignments, mut arguments) = set_fragment(&fields);
      let sql = update_sql(QuoteStyle::Backtick, "users", &assignments, Some("id=?"));
      arguments.extend(vec![Value::from(1_i64)]);

      assert_eq!(sql, "UPDATE `users` SET age=? WHERE id=?");
      // SET arguments first, WHERE arguments after, in call-site order
      assert_eq!(arguments, vec![Value::from(11_i64), Value::from(1_i64)]);
   }

   #[test]
   fn test_delete_sql() {
      let sql = delete_sql(QuoteStyle::Backtick, "users", Some("age > ?"));
      assert_eq!(sql, "DELETE FROM `users` WHERE age > ?");
   }

   #[test]
   fn test_count_sql() {
      let sql = count_sql(QuoteStyle::Backtick, "users", None);
      assert_eq!(sql, "SELECT COUNT(*) AS total FROM `users`");
   }
}
