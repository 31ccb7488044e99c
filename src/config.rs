//! Configuration for the MySQL client and its connection pool

use serde::{Deserialize, Serialize};

/// Identifier quoting style used when the client wraps table names.
///
/// Only the table name passed to the CRUD operations is quoted; field lists
/// and WHERE fragments are taken verbatim from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
   /// MySQL-style backtick quoting: `` `users` ``
   #[default]
   Backtick,
   /// Bracket quoting as used by SQL Server-compatible dialects: `[users]`
   Bracket,
}

impl QuoteStyle {
   /// Quote a single identifier, escaping any embedded closing-quote
   /// character by doubling it.
   pub fn quote(&self, identifier: &str) -> String {
      match self {
         QuoteStyle::Backtick => format!("`{}`", identifier.replace('`', "``")),
         QuoteStyle::Bracket => format!("[{}]", identifier.replace(']', "]]")),
      }
   }
}

/// Configuration for [`MySqlClient`](crate::MySqlClient)
///
/// # Examples
///
/// ```
/// use sqlx_mysql_toolkit::MySqlClientConfig;
///
/// // Override just the fields you care about
/// let config = MySqlClientConfig {
///     host: "db.internal".into(),
///     user: "app".into(),
///     password: "secret".into(),
///     database: "app_db".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySqlClientConfig {
   /// Hostname or IP address of the MySQL server
   ///
   /// Default: "localhost"
   pub host: String,

   /// TCP port of the MySQL server
   ///
   /// Default: 3306
   pub port: u16,

   /// User name for authentication
   pub user: String,

   /// Password for authentication
   pub password: String,

   /// Name of the database to use for all operations
   pub database: String,

   /// Maximum number of open connections in the pool
   ///
   /// Default: 10
   pub max_open_connections: u32,

   /// Number of connections the pool keeps alive while idle
   ///
   /// Maps to the pool's minimum connection count; idle connections beyond
   /// this are closed by the pool.
   ///
   /// Default: 2
   pub max_idle_connections: u32,

   /// When true, every operation logs the assembled SQL text and the bound
   /// argument list (at debug level) before execution
   ///
   /// Default: false
   pub debug: bool,

   /// Identifier quoting style for table names
   ///
   /// Default: [`QuoteStyle::Backtick`]
   pub quote_style: QuoteStyle,
}

impl Default for MySqlClientConfig {
   fn default() -> Self {
      Self {
         host: "localhost".to_string(),
         port: 3306,
         user: String::new(),
         password: String::new(),
         database: String::new(),
         max_open_connections: 10,
         max_idle_connections: 2,
         debug: false,
         quote_style: QuoteStyle::Backtick,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_backtick_quoting() {
      assert_eq!(QuoteStyle::Backtick.quote("users"), "`users`");
   }

   #[test]
   fn test_backtick_quoting_escapes_embedded_backtick() {
      assert_eq!(QuoteStyle::Backtick.quote("odd`name"), "`odd``name`");
   }

   #[test]
   fn test_bracket_quoting() {
      assert_eq!(QuoteStyle::Bracket.quote("users"), "[users]");
      assert_eq!(QuoteStyle::Bracket.quote("odd]name"), "[odd]]name]");
   }

   #[test]
   fn test_default_config() {
      let config = MySqlClientConfig::default();
      assert_eq!(config.host, "localhost");
      assert_eq!(config.port, 3306);
      assert_eq!(config.max_open_connections, 10);
      assert_eq!(config.max_idle_connections, 2);
      assert!(!config.debug);
      assert_eq!(config.quote_style, QuoteStyle::Backtick);
   }
}
