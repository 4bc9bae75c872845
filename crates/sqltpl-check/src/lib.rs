//! sqltpl-check
//!
//! Validation collaborators for compiled sqltpl queries.
//!
//! # Features
//!
//! - **Syntax validation** (`sql`): parse compiled SQL with `sqlparser` (MySQL dialect)
//! - **Dry runs** (`mysql`): execute the `EXPLAIN` form of each statement on a live server
//! - **Pluggable**: both checks go through traits ([`SyntaxValidator`], [`DryRunClient`])
//!
//! # Example
//!
//! ```ignore
//! use sqltpl_check::{explain_statements, is_valid_sql};
//!
//! assert!(is_valid_sql("SELECT * FROM users").valid);
//!
//! let stmts = explain_statements("SET @id := 1; SELECT * FROM users WHERE id = @id");
//! assert_eq!(stmts, vec!["EXPLAIN SELECT * FROM users WHERE id = @id"]);
//! ```

pub mod client;
pub mod dry_run;
pub mod error;
pub mod syntax;

pub use client::DryRunClient;
pub use dry_run::{dry_run, explain_statements};
pub use error::{CheckError, CheckResult};
pub use syntax::{NoopValidator, ParseResult, SyntaxValidator, format_errors};

#[cfg(feature = "sql")]
pub use syntax::{SqlParserValidator, is_valid_sql};
