// sqlx::Error -> StoreError mapping
//
// Lives here because of the orphan rule: core cannot depend on sqlx.

use flightbook_core::error::{AppError, StoreError};

/// Convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    let store_error = match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();

            // SQLite extended result codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some("2067") | Some("1555") => StoreError::UniqueViolation(message),
                Some("275") => StoreError::CheckViolation(message),
                Some("5") | Some("517") => StoreError::Busy(message),
                Some(code) => StoreError::Other(format!("[{}] {}", code, message)),
                None => StoreError::Other(message),
            }
        }
        sqlx::Error::RowNotFound => StoreError::RowNotFound,
        sqlx::Error::ColumnNotFound(col) => StoreError::Other(format!("Column not found: {}", col)),
        _ => {
            // Connection, pool, protocol errors
            StoreError::Other(err.to_string())
        }
    };

    AppError::Store(store_error)
}
