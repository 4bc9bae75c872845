//! SQL syntax validation.
//!
//! The compiler hands every assembled query to a [`SyntaxValidator`]. An empty
//! result means the SQL is accepted; otherwise each entry is a human-readable
//! error message.

/// Result of SQL parsing/validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Whether the SQL is syntactically valid.
    pub valid: bool,
    /// Error message if invalid.
    pub error: Option<String>,
}

/// Something that can tell whether a SQL string is well-formed.
pub trait SyntaxValidator: Send + Sync {
    /// Validate `sql`, returning all errors found (empty when valid).
    fn validate(&self, sql: &str) -> Vec<String>;
}

/// A validator that accepts every input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

impl SyntaxValidator for NoopValidator {
    fn validate(&self, _sql: &str) -> Vec<String> {
        Vec::new()
    }
}

impl<F> SyntaxValidator for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn validate(&self, sql: &str) -> Vec<String> {
        self(sql)
    }
}

/// Validates SQL with `sqlparser` using the MySQL dialect.
///
/// Backtick-quoted identifiers and backslash escapes inside string literals
/// are accepted, matching what the template compiler emits.
#[cfg(feature = "sql")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParserValidator;

#[cfg(feature = "sql")]
impl SqlParserValidator {
    pub fn mysql() -> Self {
        Self
    }
}

#[cfg(feature = "sql")]
impl SyntaxValidator for SqlParserValidator {
    fn validate(&self, sql: &str) -> Vec<String> {
        use sqlparser::dialect::MySqlDialect;
        use sqlparser::parser::Parser;

        if sql.trim().is_empty() {
            return vec!["Empty query".to_string()];
        }

        match Parser::parse_sql(&MySqlDialect {}, sql) {
            Ok(stmts) if stmts.is_empty() => vec!["No statement found".to_string()],
            Ok(_) => Vec::new(),
            Err(e) => vec![e.to_string()],
        }
    }
}

/// Check whether `sql` is syntactically valid MySQL.
#[cfg(feature = "sql")]
pub fn is_valid_sql(sql: &str) -> ParseResult {
    let errors = SqlParserValidator.validate(sql);
    if errors.is_empty() {
        ParseResult {
            valid: true,
            error: None,
        }
    } else {
        ParseResult {
            valid: false,
            error: Some(format_errors(&errors)),
        }
    }
}

/// Join validator messages into a single line.
pub fn format_errors(errors: &[String]) -> String {
    errors.join(" ")
}
