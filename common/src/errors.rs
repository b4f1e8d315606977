// Error handling framework
// Lookups that find nothing return Ok(None); everything below is a real failure.

use std::time::Duration;
use thiserror::Error;

/// Input validation errors, raised before any SQL is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid field value for {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFieldValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Not-null violation: {0}")]
    NotNullViolation(String),

    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DatabaseError {
    /// Pool exhaustion, network or TLS failure, or an elapsed timeout
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_)
                | DatabaseError::HealthCheckFailed(_)
                | DatabaseError::Timeout(_)
        )
    }

    /// A unique, foreign-key, not-null or check constraint rejected the statement
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateKey(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::NotNullViolation(_)
                | DatabaseError::CheckViolation(_)
        )
    }

    /// Short label used as the `outcome` metric dimension
    pub fn kind(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) | DatabaseError::HealthCheckFailed(_) => "connection",
            DatabaseError::Timeout(_) => "timeout",
            DatabaseError::QueryFailed(_) => "query",
            DatabaseError::MalformedQuery(_) => "malformed_query",
            DatabaseError::NotFound(_) => "not_found",
            DatabaseError::DuplicateKey(_)
            | DatabaseError::ForeignKeyViolation(_)
            | DatabaseError::NotNullViolation(_)
            | DatabaseError::CheckViolation(_) => "constraint",
            DatabaseError::Validation(_) => "validation",
        }
    }
}

/// Map a SQLSTATE code onto the error taxonomy
fn classify_sqlstate(code: &str, message: String) -> DatabaseError {
    match code {
        "23505" => DatabaseError::DuplicateKey(message),
        "23503" => DatabaseError::ForeignKeyViolation(message),
        "23502" => DatabaseError::NotNullViolation(message),
        "23514" => DatabaseError::CheckViolation(message),
        // Class 42: syntax error or access rule violation
        c if c.starts_with("42") => DatabaseError::MalformedQuery(message),
        // Class 08: connection exception
        // Class 28: invalid authorization (bad password, unknown role)
        // Class 53: insufficient resources (too_many_connections)
        // 57P0x: server shutting down or not accepting connections
        // 3D000: database does not exist
        c if c.starts_with("08")
            || c.starts_with("28")
            || c.starts_with("53")
            || c.starts_with("57P0")
            || c == "3D000" =>
        {
            DatabaseError::ConnectionFailed(message)
        }
        _ => DatabaseError::QueryFailed(message),
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.code() {
                    Some(code) => classify_sqlstate(code.as_ref(), message),
                    None => DatabaseError::QueryFailed(message),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => DatabaseError::ConnectionFailed(err.to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}
