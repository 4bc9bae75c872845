//! Dry-run tests.
//!
//! The in-memory client runs everywhere. The live test needs a MySQL server:
//! set `MYSQL_URL` (a `.env` file works) and enable the `mysql` feature.

use sqltpl_check::{CheckError, CheckResult, DryRunClient, dry_run};
use std::sync::Mutex;

/// Records every statement and rejects the ones mentioning `missing_table`.
#[derive(Default)]
struct RecordingClient {
    seen: Mutex<Vec<String>>,
}

impl RecordingClient {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DryRunClient for RecordingClient {
    async fn explain(&self, sql: &str) -> CheckResult<Option<String>> {
        self.seen.lock().unwrap().push(sql.to_string());
        if sql.contains("missing_table") {
            Ok(Some("Table 'db.missing_table' doesn't exist".to_string()))
        } else {
            Ok(None)
        }
    }
}

struct BrokenClient;

#[async_trait::async_trait]
impl DryRunClient for BrokenClient {
    async fn explain(&self, _sql: &str) -> CheckResult<Option<String>> {
        Err(CheckError::connection("connection reset"))
    }
}

#[tokio::test]
async fn accepted_statements_report_nothing() {
    let client = RecordingClient::default();
    let result = dry_run(&client, "SELECT 1; SELECT 2").await.unwrap();

    assert_eq!(result, None);
    assert_eq!(client.seen(), vec!["EXPLAIN SELECT 1", "EXPLAIN SELECT 2"]);
}

#[tokio::test]
async fn stops_at_first_rejection() {
    let client = RecordingClient::default();
    let result = dry_run(
        &client,
        "SELECT * FROM missing_table; SELECT * FROM users",
    )
    .await
    .unwrap();

    assert_eq!(
        result.as_deref(),
        Some("Table 'db.missing_table' doesn't exist")
    );
    assert_eq!(client.seen(), vec!["EXPLAIN SELECT * FROM missing_table"]);
}

#[tokio::test]
async fn driver_failures_are_errors() {
    let err = dry_run(&BrokenClient, "SELECT 1").await.unwrap_err();
    assert!(matches!(err, CheckError::Connection(_)));
}

#[tokio::test]
async fn empty_input_is_rejected_before_executing() {
    let client = RecordingClient::default();
    let err = dry_run(&client, " ; ").await.unwrap_err();

    assert!(matches!(err, CheckError::Validation(_)));
    assert!(client.seen().is_empty());
}

#[cfg(feature = "mysql")]
#[tokio::test]
async fn live_mysql_dry_run() {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("MYSQL_URL") else {
        eprintln!("MYSQL_URL not set; skipping live dry run");
        return;
    };

    let pool = mysql_async::Pool::new(url.as_str());
    assert_eq!(dry_run(&pool, "SELECT 1").await.unwrap(), None);

    let rejected = dry_run(&pool, "SELECT * FROM sqltpl_table_that_does_not_exist")
        .await
        .unwrap();
    assert!(rejected.is_some());

    pool.disconnect().await.unwrap();
}
