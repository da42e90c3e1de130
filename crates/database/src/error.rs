use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors returned by the record store services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request was rejected before reaching the database
    #[error("{0}")]
    Validation(String),

    /// The write collides with an existing record
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Db(DbErr),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                Self::Validation(format!("referenced record does not exist: {detail}"))
            }
            _ => Self::Db(err),
        }
    }
}
