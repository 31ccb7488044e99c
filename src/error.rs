/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for MySQL toolkit operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Caller supplied malformed input (empty table name, empty field set,
   /// empty batch list).
   #[error("invalid argument: {0}")]
   InvalidArgument(String),

   /// A batch-insert row carries a column set different from the first row.
   ///
   /// The column list for a batch insert is derived from the first row;
   /// letting later rows diverge would silently bind values to the wrong
   /// columns, so this is rejected up front.
   #[error("batch row {0} does not share the column set of the first row")]
   MismatchedBatchRow(usize),

   /// MySQL type that cannot be mapped to a `Value`.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("MYSQL_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::InvalidArgument(_) => "INVALID_ARGUMENT".to_string(),
         Error::MismatchedBatchRow(_) => "MISMATCHED_BATCH_ROW".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
      }
   }
}
