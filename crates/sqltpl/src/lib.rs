//! # sqltpl
//!
//! A compiler for MySQL query templates with typed placeholders.
//!
//! ## Features
//!
//! - **Typed placeholders**: `?` (any scalar), `?d` (integer), `?f` (float),
//!   `?a` (list or assignment set), `?#` (identifier or identifier list)
//! - **Conditional blocks**: `{ ... }` is dropped when one of its placeholders
//!   is bound to [`skip()`]
//! - **Injection-safe escaping**: MySQL string escaping, validated and
//!   backtick-quoted identifiers
//! - **Context checks**: a placeholder must follow an allowed SQL keyword
//! - **Validation**: compiled SQL is parsed with `sqlparser` (feature `check`)
//!   and can be dry-run with `EXPLAIN` against MySQL (feature `mysql`)
//!
//! ## Example
//!
//! ```ignore
//! use sqltpl::{TemplateCompiler, args, skip};
//!
//! let compiler = TemplateCompiler::new();
//!
//! let sql = compiler.build_query(
//!     "SELECT ?# FROM users WHERE user_id = ?d AND block = ?d",
//!     &args![vec!["name", "email"], 2, true],
//! )?;
//! assert_eq!(sql, "SELECT `name`, `email` FROM users WHERE user_id = 2 AND block = 1");
//!
//! let sql = compiler.build_query(
//!     "SELECT name FROM users WHERE ?# IN (?a){ AND block = ?d}",
//!     &args!["user_id", vec![1, 2, 3], skip()],
//! )?;
//! assert_eq!(sql, "SELECT name FROM users WHERE `user_id` IN (1, 2, 3)");
//! ```

mod block;
mod cursor;

pub mod compiler;
pub mod context;
pub mod error;
pub mod escape;
pub mod ident;
pub mod placeholder;
pub mod value;

pub use compiler::{ArityMode, CompilerConfig, TemplateCompiler, TemplateCompilerBuilder, build_query};
pub use context::{KEYWORDS, KeywordCase};
pub use error::{ErrorKind, TemplateError, TemplateResult};
pub use escape::{MysqlEscaper, StringEscaper, ValueEscaper, unescape_mysql};
pub use ident::Ident;
pub use placeholder::{Placeholder, Specifier};
pub use value::{Arg, ArgKey, skip};

// Validation collaborators
pub use sqltpl_check::{CheckError, DryRunClient, NoopValidator, SyntaxValidator};

#[cfg(feature = "check")]
pub use sqltpl_check::SqlParserValidator;
