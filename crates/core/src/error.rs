// Central Error Type for the Application

use thiserror::Error;

/// Storage-level failure raised while executing a statement
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    #[error("Database locked: {0}")]
    Busy(String),

    #[error("Row not found")]
    RowNotFound,

    #[error("Database error: {0}")]
    Other(String),
}

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// An update or filter that needs at least one field had none
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A coordinated multi-statement sequence failed and was rolled back.
    /// `rollback_error` is set when the rollback itself also failed.
    #[error("Transaction failed: {cause}")]
    TransactionFailure {
        #[source]
        cause: Box<AppError>,
        rollback_error: Option<Box<AppError>>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// What a caller may assume about stored state after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// No statement of the failed operation is visible to other transactions
    NothingChanged,
    /// Rollback could not be confirmed
    Indeterminate,
}

impl AppError {
    pub fn transaction_failure(cause: AppError, rollback_error: Option<AppError>) -> Self {
        AppError::TransactionFailure {
            cause: Box::new(cause),
            rollback_error: rollback_error.map(Box::new),
        }
    }

    pub fn outcome(&self) -> FailureOutcome {
        match self {
            AppError::TransactionFailure {
                rollback_error: Some(_),
                ..
            } => FailureOutcome::Indeterminate,
            _ => FailureOutcome::NothingChanged,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by mapping to StoreError

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_failure_is_indeterminate() {
        let err = AppError::transaction_failure(
            AppError::Store(StoreError::Other("boom".into())),
            Some(AppError::Store(StoreError::Busy("locked".into()))),
        );
        assert_eq!(err.outcome(), FailureOutcome::Indeterminate);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_clean_rollback_changes_nothing() {
        let err = AppError::transaction_failure(AppError::Validation("empty".into()), None);
        assert_eq!(err.outcome(), FailureOutcome::NothingChanged);
        assert_eq!(
            AppError::NotFound("flight 1".into()).outcome(),
            FailureOutcome::NothingChanged
        );
    }
}
