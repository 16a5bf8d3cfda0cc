use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid email or password")]
    BadCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ServiceError {
    /// Classify a write failure: unique violations become `Conflict`, foreign
    /// key violations become `InvalidReference`, anything else stays a
    /// database error.
    pub fn from_write(err: sqlx::Error, conflict: &str, invalid_reference: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ServiceError::Conflict(conflict.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return ServiceError::InvalidReference(invalid_reference.to_string());
            }
            if db_err.is_check_violation() {
                return ServiceError::ValidationError(db_err.message().to_string());
            }
        }
        ServiceError::Database(err)
    }

    /// Classify a delete failure: a foreign key violation means the row is
    /// still referenced by another row.
    pub fn from_delete(err: sqlx::Error, still_referenced: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return ServiceError::Conflict(still_referenced.to_string());
            }
        }
        ServiceError::Database(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::BadCredentials => {
                AppError::BadRequest(anyhow::anyhow!("Invalid email or password"))
            }
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!("Email already registered"))
            }
            ServiceError::Unauthorized(msg) => AppError::Unauthorized(anyhow::anyhow!(msg)),
            ServiceError::Forbidden(msg) => AppError::Forbidden(anyhow::anyhow!(msg)),
            ServiceError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            ServiceError::Conflict(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            ServiceError::InvalidReference(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::ValidationError(msg) => {
                AppError::UnprocessableEntity(anyhow::anyhow!(msg))
            }
        }
    }
}
