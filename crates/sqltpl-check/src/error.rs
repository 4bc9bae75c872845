//! Error types for sqltpl-check

use thiserror::Error;

/// Result type for sqltpl-check operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Error type for sqltpl-check operations.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Driver error that is not a statement rejection (connect, IO, protocol).
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] mysql_async::Error),
    /// Connection-level failure reported by a non-MySQL client.
    #[error("Connection error: {0}")]
    Connection(String),
    /// Validation error (e.g., nothing to check).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CheckError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        CheckError::Connection(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &CheckError) -> &'static str {
        match err {
            #[cfg(feature = "mysql")]
            CheckError::Database(_) => "database",
            CheckError::Connection(_) => "connection",
            CheckError::Validation(_) => "validation",
        }
    }

    #[test]
    fn every_variant_is_constructed_and_displayed() {
        let err = CheckError::connection("connection reset");
        assert_eq!(kind(&err), "connection");
        assert_eq!(err.to_string(), "Connection error: connection reset");

        let err = CheckError::Validation("nothing to check".into());
        assert_eq!(kind(&err), "validation");
        assert_eq!(err.to_string(), "Validation error: nothing to check");
    }
}
