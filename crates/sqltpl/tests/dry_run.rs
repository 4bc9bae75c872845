//! Compile-then-explain through an in-memory `DryRunClient`.

use sqltpl::{ErrorKind, TemplateCompiler, TemplateError, args, skip};
use sqltpl_check::{CheckError, CheckResult, DryRunClient};
use std::sync::Mutex;

/// Knows a single table, `users`.
#[derive(Default)]
struct FakeServer {
    seen: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl DryRunClient for FakeServer {
    async fn explain(&self, sql: &str) -> CheckResult<Option<String>> {
        self.seen.lock().unwrap().push(sql.to_string());
        if sql.contains("FROM users") {
            Ok(None)
        } else {
            Ok(Some("Table 'app.orders' doesn't exist".to_string()))
        }
    }
}

struct Offline;

#[async_trait::async_trait]
impl DryRunClient for Offline {
    async fn explain(&self, _sql: &str) -> CheckResult<Option<String>> {
        Err(CheckError::connection("Can't connect to MySQL server"))
    }
}

#[tokio::test]
async fn accepted_query_is_returned() {
    let server = FakeServer::default();
    let sql = TemplateCompiler::new()
        .build_query_checked(
            "SELECT name FROM users WHERE ?# IN (?a){ AND block = ?d}",
            &args!["user_id", vec![1, 2, 3], skip()],
            &server,
        )
        .await
        .unwrap();

    assert_eq!(sql, "SELECT name FROM users WHERE `user_id` IN (1, 2, 3)");
    assert_eq!(
        *server.seen.lock().unwrap(),
        vec!["EXPLAIN SELECT name FROM users WHERE `user_id` IN (1, 2, 3)"]
    );
}

#[tokio::test]
async fn rejection_becomes_execution_error() {
    let server = FakeServer::default();
    let err = TemplateCompiler::new()
        .build_query_checked("SELECT * FROM orders WHERE id = ?d", &args![7], &server)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(err.to_string(), "Table 'app.orders' doesn't exist");
}

#[tokio::test]
async fn compile_errors_skip_the_dry_run() {
    let server = FakeServer::default();
    let err = TemplateCompiler::new()
        .build_query_checked("SELECT * FROM users WHERE id = ?d", &[], &server)
        .await
        .unwrap_err();

    assert!(err.is_arity());
    assert!(server.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn driver_failure_is_propagated() {
    let err = TemplateCompiler::new()
        .build_query_checked("SELECT * FROM users", &[], &Offline)
        .await
        .unwrap_err();

    assert!(matches!(err, TemplateError::Check(CheckError::Connection(_))));
}

#[tokio::test]
async fn works_through_a_trait_object() {
    let server: Box<dyn DryRunClient> = Box::new(FakeServer::default());
    let sql = TemplateCompiler::new()
        .build_query_checked("SELECT * FROM users WHERE id = ?d", &args![1], server.as_ref())
        .await
        .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE id = 1");
}
