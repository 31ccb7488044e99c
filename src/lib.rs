//! Lightweight CRUD convenience layer for MySQL built on sqlx.
//!
//! This crate sits between application code and the sqlx MySQL driver. It
//! opens a connection pool, builds parameterized SQL from generic field
//! maps, and decodes result rows back into generic maps. It provides:
//!
//! - [`MySqlClient`] — pooled facade with `insert`, `batch_insert`,
//!   `update`, `delete`, `count`, `get_one`, `select`, and raw `query`
//! - [`FieldSet`] / [`Value`] — tagged dynamic scalars for statement
//!   arguments and decoded cells
//! - Statement building ([`statement`]) and row decoding ([`decode`])
//!
//! There is deliberately no transaction, retry, or caching layer here;
//! driver errors propagate verbatim and concurrency safety comes from the
//! pool alone.
//!
//! # Example
//!
//! ```no_run
//! use sqlx_mysql_toolkit::{FieldSet, MySqlClient, MySqlClientConfig, Value};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MySqlClient::connect(MySqlClientConfig {
//!    user: "app".into(),
//!    password: "secret".into(),
//!    database: "app_db".into(),
//!    ..Default::default()
//! })
//! .await?;
//!
//! // Write
//! let mut user = FieldSet::default();
//! user.insert("name".into(), Value::from("a"));
//! user.insert("age".into(), Value::from(10_i64));
//! let id = client.insert("users", &user).await?;
//!
//! // Read
//! let rows = client.select("users", "*", Some("age > ?"), vec![Value::Int(5)]).await?;
//!
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod statement;
pub mod value;

pub use client::MySqlClient;
pub use config::{MySqlClientConfig, QuoteStyle};
pub use error::{Error, Result};
pub use statement::{StatementFragment, batch_insert_fragment, insert_fragment, set_fragment};
pub use value::{FieldSet, Value, bind_value};
