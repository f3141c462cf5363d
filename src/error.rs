use sea_orm::TransactionError;

use crate::forms::ValidationError;

/// Failure taxonomy for the query and mutation layers. Every mutation
/// reports one of these to its caller; nothing is swallowed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(e) => ServiceError::Database(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
