//! Template compiler.
//!
//! Walks a template once, left to right:
//!
//! - literal text is copied,
//! - `?`, `?d`, `?f`, `?a`, `?#` are replaced by the next escaped argument,
//! - `{ ... }` blocks (one level, no nesting) are dropped when one of their
//!   placeholders is bound to [`skip()`](crate::skip), and expanded otherwise.
//!
//! Then placeholder and argument counts are reconciled and the result goes
//! through the configured [`SyntaxValidator`].
//!
//! # Example
//!
//! ```ignore
//! use sqltpl::{TemplateCompiler, args, skip};
//!
//! let compiler = TemplateCompiler::new();
//! let sql = compiler.build_query(
//!     "SELECT name FROM users WHERE ?# IN (?a){ AND block = ?d}",
//!     &args!["user_id", vec![1, 2, 3], skip()],
//! )?;
//! assert_eq!(sql, "SELECT name FROM users WHERE `user_id` IN (1, 2, 3)");
//! ```

mod config;


pub use config::{ArityMode, CompilerConfig};

use crate::block::{self, BlockDecision};
use crate::context::KeywordCase;
use crate::cursor::ArgCursor;
use crate::error::{TemplateError, TemplateResult};
use crate::escape::{MysqlEscaper, StringEscaper, ValueEscaper};
use crate::placeholder::{Resolver, recognize};
use crate::value::Arg;
use sqltpl_check::{DryRunClient, NoopValidator, SyntaxValidator, format_errors};

fn default_validator() -> Box<dyn SyntaxValidator> {
    #[cfg(feature = "check")]
    {
        Box::new(sqltpl_check::SqlParserValidator::mysql())
    }
    #[cfg(not(feature = "check"))]
    {
        Box::new(NoopValidator)
    }
}

/// Compiles query templates into escaped SQL.
///
/// Holds only read-only state and can be shared between threads; every
/// [`build_query`](Self::build_query) call has its own cursor.
pub struct TemplateCompiler {
    escaper: Box<dyn StringEscaper>,
    validator: Box<dyn SyntaxValidator>,
    config: CompilerConfig,
}

impl Default for TemplateCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCompiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TemplateCompiler {
    /// MySQL escaping, default syntax validation, default config.
    pub fn new() -> Self {
        Self {
            escaper: Box::new(MysqlEscaper),
            validator: default_validator(),
            config: CompilerConfig::default(),
        }
    }

    pub fn builder() -> TemplateCompilerBuilder {
        TemplateCompilerBuilder::new()
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The skip sentinel. Same as [`crate::skip`].
    pub fn skip() -> Arg {
        Arg::Skip
    }

    /// Compile `template` with positional `args`.
    pub fn build_query(&self, template: &str, args: &[Arg]) -> TemplateResult<String> {
        let sql = self.scan(template, args)?;

        if self.config.syntax_check {
            let errors = self.validator.validate(&sql);
            if !errors.is_empty() {
                return Err(TemplateError::Syntax(format_errors(&errors)));
            }
        }

        Ok(sql)
    }

    /// Compile, then run the `EXPLAIN` form of every statement through `client`.
    ///
    /// A statement rejected by the server becomes [`TemplateError::Execution`].
    pub async fn build_query_checked<C>(
        &self,
        template: &str,
        args: &[Arg],
        client: &C,
    ) -> TemplateResult<String>
    where
        C: DryRunClient + ?Sized,
    {
        let sql = self.build_query(template, args)?;
        if let Some(message) = sqltpl_check::dry_run(client, &sql).await? {
            return Err(TemplateError::Execution(message));
        }
        Ok(sql)
    }

    fn scan(&self, template: &str, args: &[Arg]) -> TemplateResult<String> {
        let resolver = Resolver {
            escaper: ValueEscaper::new(self.escaper.as_ref()),
            keyword_case: self.config.keyword_case,
        };
        let mut cursor = ArgCursor::new(args);
        let mut out = String::with_capacity(template.len());
        let mut block_start: Option<usize> = None;
        let mut skipped_blocks = 0usize;

        let mut chars = template.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '{' => {
                    if block_start.is_some() {
                        return Err(TemplateError::NestedBlock { offset: i });
                    }
                    block_start = Some(i);
                }
                '}' => {
                    let Some(start) = block_start.take() else {
                        return Err(TemplateError::UnexpectedClosingBrace { offset: i });
                    };
                    let content = &template[start + 1..i];
                    if !self.close_block(content, &resolver, &mut cursor, &mut out)? {
                        skipped_blocks += 1;
                    }
                }
                _ if block_start.is_some() => {}
                '?' => {
                    let placeholder = recognize(template, i)?;
                    resolver.resolve(template, placeholder, &mut cursor, &mut out)?;
                    if placeholder.len > 1 {
                        chars.next();
                    }
                }
                c => out.push(c),
            }
        }

        if let Some(start) = block_start {
            return Err(TemplateError::UnclosedBlock { offset: start });
        }

        self.check_arity(&cursor)?;

        tracing::debug!(
            target: "sqltpl.compile",
            template_len = template.len(),
            args = args.len(),
            placeholders = cursor.consumed(),
            skipped_blocks,
            "compiled template"
        );

        Ok(out)
    }

    /// Emit or drop one block. Returns `false` when the block was dropped.
    fn close_block(
        &self,
        content: &str,
        resolver: &Resolver<'_>,
        cursor: &mut ArgCursor<'_>,
        out: &mut String,
    ) -> TemplateResult<bool> {
        match block::evaluate(content, cursor)? {
            BlockDecision::Emit => {
                resolver.expand(content, cursor, out)?;
                Ok(true)
            }
            BlockDecision::Skip { slot } => {
                tracing::trace!(
                    target: "sqltpl.compile",
                    arg = cursor.position() + slot,
                    "dropping conditional block"
                );
                if self.config.arity == ArityMode::PerBlock {
                    cursor.drop_slots(block::placeholder_count(content)?);
                }
                Ok(false)
            }
        }
    }

    fn check_arity(&self, cursor: &ArgCursor<'_>) -> TemplateResult<()> {
        let total = cursor.args_len();
        let consumed = cursor.consumed();

        let ok = match self.config.arity {
            ArityMode::Global => {
                consumed == total || consumed == total - cursor.skip_count()
            }
            ArityMode::PerBlock => consumed + cursor.dropped() == total,
        };

        if ok { Ok(()) } else { Err(cursor.count_error()) }
    }
}

/// Builder for [`TemplateCompiler`].
pub struct TemplateCompilerBuilder {
    escaper: Box<dyn StringEscaper>,
    validator: Box<dyn SyntaxValidator>,
    config: CompilerConfig,
}

impl Default for TemplateCompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCompilerBuilder {
    pub fn new() -> Self {
        Self {
            escaper: Box::new(MysqlEscaper),
            validator: default_validator(),
            config: CompilerConfig::default(),
        }
    }

    /// Replace the string escaping primitive.
    pub fn escaper(mut self, escaper: impl StringEscaper + 'static) -> Self {
        self.escaper = Box::new(escaper);
        self
    }

    /// Replace the syntax validator.
    pub fn syntax_validator(mut self, validator: impl SyntaxValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Accept any compiled SQL.
    pub fn without_syntax_check(mut self) -> Self {
        self.validator = Box::new(NoopValidator);
        self.config.syntax_check = false;
        self
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn arity(mut self, mode: ArityMode) -> Self {
        self.config.arity = mode;
        self
    }

    pub fn keyword_case(mut self, case: KeywordCase) -> Self {
        self.config.keyword_case = case;
        self
    }

    pub fn build(self) -> TemplateCompiler {
        TemplateCompiler {
            escaper: self.escaper,
            validator: self.validator,
            config: self.config,
        }
    }
}

/// Compile with a default [`TemplateCompiler`].
pub fn build_query(template: &str, args: &[Arg]) -> TemplateResult<String> {
    TemplateCompiler::new().build_query(template, args)
}
