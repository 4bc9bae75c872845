//! Dry-run validation: run every statement of a compiled query as `EXPLAIN`.
//!
//! The rewrite is textual. `#` comments and `SET @var := ...` session
//! assignments are removed first, then the remainder is split on `;`. A `;` or
//! `#` inside a string literal is not recognized as such.

use crate::client::DryRunClient;
use crate::error::{CheckError, CheckResult};
use regex::Regex;
use std::sync::OnceLock;

struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

fn rewrites() -> &'static [Rewrite] {
    static REWRITES: OnceLock<Vec<Rewrite>> = OnceLock::new();
    REWRITES.get_or_init(|| {
        [
            // `# comment` up to (and including) the line end or statement end.
            (r"#[^\n\r;]*([\n\r;]|$)", ""),
            // Session variable assignments cannot be explained.
            (r"[Ss][Ee][Tt]\s+@[A-Za-z0-9_]+\s*:?=\s*[^;]+(;|$)", ""),
            (r";\s*;", ";"),
            (r";\s*$", ""),
        ]
        .into_iter()
        .map(|(pattern, replacement)| Rewrite {
            pattern: Regex::new(pattern).expect("invalid built-in dry-run regex"),
            replacement,
        })
        .collect()
    })
}

/// Rewrite `sql` into the list of `EXPLAIN` statements a dry run executes.
///
/// ```ignore
/// let stmts = sqltpl_check::explain_statements("SELECT 1; SELECT 2;");
/// assert_eq!(stmts, vec!["EXPLAIN SELECT 1", "EXPLAIN SELECT 2"]);
/// ```
pub fn explain_statements(sql: &str) -> Vec<String> {
    let mut rewritten = sql.to_string();
    for rw in rewrites() {
        rewritten = rw
            .pattern
            .replace_all(&rewritten, rw.replacement)
            .into_owned();
    }

    rewritten
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("EXPLAIN {s}"))
        .collect()
}

/// Execute the `EXPLAIN` form of every statement in `sql`, in order.
///
/// Returns the first server error message, or `None` when every statement was
/// accepted. Execution stops at the first rejection.
pub async fn dry_run<C>(client: &C, sql: &str) -> CheckResult<Option<String>>
where
    C: DryRunClient + ?Sized,
{
    let stmts = explain_statements(sql);
    if stmts.is_empty() {
        return Err(CheckError::Validation(
            "no statements left to explain".to_string(),
        ));
    }

    for (idx, stmt) in stmts.iter().enumerate() {
        tracing::debug!(target: "sqltpl.check", stmt = idx + 1, sql = %stmt, "dry run");
        if let Some(message) = client.explain(stmt).await? {
            tracing::debug!(target: "sqltpl.check", stmt = idx + 1, error = %message, "dry run rejected");
            return Ok(Some(message));
        }
    }

    Ok(None)
}
