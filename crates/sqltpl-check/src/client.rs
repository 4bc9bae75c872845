//! Database client trait for dry runs
//!
//! This module defines a minimal trait for executing `EXPLAIN` statements,
//! allowing sqltpl-check to work with any driver.

use crate::error::CheckResult;

/// A trait for types that can execute a single SQL statement for validation.
///
/// Implementations must return `Ok(Some(message))` when the server rejects the
/// statement and `Err(_)` only for failures unrelated to the statement itself
/// (lost connection, pool exhausted, ...).
///
/// With the `mysql` feature this is implemented for `mysql_async::Pool`
/// (one connection per call) and `tokio::sync::Mutex<mysql_async::Conn>`
/// (one shared connection, access serialized by the lock).
#[async_trait::async_trait]
pub trait DryRunClient: Sync {
    /// Execute `sql`, returning the server's error message if it was rejected.
    async fn explain(&self, sql: &str) -> CheckResult<Option<String>>;
}

#[cfg(feature = "mysql")]
mod mysql {
    use super::DryRunClient;
    use crate::error::{CheckError, CheckResult};
    use mysql_async::prelude::Queryable;

    fn rejection(result: Result<(), mysql_async::Error>) -> CheckResult<Option<String>> {
        match result {
            Ok(()) => Ok(None),
            Err(mysql_async::Error::Server(e)) => Ok(Some(e.message)),
            Err(e) => Err(CheckError::from(e)),
        }
    }

    #[async_trait::async_trait]
    impl DryRunClient for mysql_async::Pool {
        async fn explain(&self, sql: &str) -> CheckResult<Option<String>> {
            let mut conn = self.get_conn().await?;
            rejection(conn.query_drop(sql).await)
        }
    }

    #[async_trait::async_trait]
    impl DryRunClient for tokio::sync::Mutex<mysql_async::Conn> {
        async fn explain(&self, sql: &str) -> CheckResult<Option<String>> {
            let mut conn = self.lock().await;
            rejection(conn.query_drop(sql).await)
        }
    }
}
