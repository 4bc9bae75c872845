//! Error types for sqltpl

use sqltpl_check::CheckError;
use thiserror::Error;

/// Result type alias for template compilation
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Broad category of a [`TemplateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbalanced or nested braces.
    Structural,
    /// Unsupported character after `?`.
    Grammar,
    /// Placeholder count does not match the argument count.
    Arity,
    /// Placeholder outside an allowed keyword context.
    Context,
    /// Argument incompatible with its specifier.
    Type,
    /// The compiled SQL failed syntax validation.
    Syntax,
    /// The database rejected the compiled SQL during a dry run.
    Execution,
}

/// Error types for template compilation.
///
/// Every variant is terminal for the compile call that produced it.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// `{` while a conditional block is already open
    #[error("Nested conditional blocks are not supported")]
    NestedBlock { offset: usize },

    /// `}` without an open conditional block
    #[error("Unexpected closing brace")]
    UnexpectedClosingBrace { offset: usize },

    /// Template ended inside a conditional block
    #[error("Unclosed conditional block")]
    UnclosedBlock { offset: usize },

    /// `?` followed by a character that is not a known specifier
    #[error("Unsupported placeholder type: ?{specifier}")]
    UnsupportedPlaceholder { specifier: char, offset: usize },

    /// Placeholder count vs. effective argument count mismatch
    #[error(
        "Wrong number of placeholders: {placeholders} placeholder(s) for {args} argument(s) ({skipped} skipped)"
    )]
    WrongPlaceholderCount {
        placeholders: usize,
        args: usize,
        skipped: usize,
    },

    /// Nearest preceding keyword is missing or not allowed
    #[error("Invalid placeholder context: {0}")]
    InvalidContext(String),

    /// Identifier failed validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Argument type incompatible with its specifier
    #[error("{0}")]
    Type(String),

    /// Syntax validator reported errors
    #[error("SQL syntax error: {0}")]
    Syntax(String),

    /// Dry run rejected by the database
    #[error("{0}")]
    Execution(String),

    /// Dry run could not be carried out
    #[error("Check error: {0}")]
    Check(#[from] CheckError),
}

impl TemplateError {
    /// Create a type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(ident: impl Into<String>) -> Self {
        Self::InvalidIdentifier(ident.into())
    }

    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NestedBlock { .. }
            | Self::UnexpectedClosingBrace { .. }
            | Self::UnclosedBlock { .. } => ErrorKind::Structural,
            Self::UnsupportedPlaceholder { .. } => ErrorKind::Grammar,
            Self::WrongPlaceholderCount { .. } => ErrorKind::Arity,
            Self::InvalidContext(_) => ErrorKind::Context,
            Self::InvalidIdentifier(_) | Self::Type(_) => ErrorKind::Type,
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::Execution(_) | Self::Check(_) => ErrorKind::Execution,
        }
    }

    /// Check if this is a brace structure error
    pub fn is_structural(&self) -> bool {
        self.kind() == ErrorKind::Structural
    }

    /// Check if this is a placeholder/argument count error
    pub fn is_arity(&self) -> bool {
        self.kind() == ErrorKind::Arity
    }

    /// Check if this is an invalid context error
    pub fn is_context(&self) -> bool {
        self.kind() == ErrorKind::Context
    }
}
