//! Safe SQL identifier handling.
//!
//! This module provides [`Ident`], a validated identifier (table/column name)
//! as bound to `?#` placeholders and `?a` keys.
//!
//! - Names are validated against `^[A-Za-z0-9_]+$`
//! - Rendering wraps the name in backticks and doubles any backtick
//!
//! # Example
//! ```ignore
//! use sqltpl::Ident;
//!
//! assert_eq!(Ident::parse("user_id")?.to_sql(), "`user_id`");
//! assert!(Ident::parse("users; DROP TABLE x").is_err());
//! # Ok::<(), sqltpl::TemplateError>(())
//! ```

use crate::error::{TemplateError, TemplateResult};
use crate::value::Arg;

/// A validated SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

/// `true` when `s` is non-empty and only contains ASCII letters, digits and `_`.
pub fn is_valid_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl Ident {
    /// Validate an identifier name.
    ///
    /// Already-quoted input is not unwrapped: `` `users` `` is rejected like
    /// any other name containing a backtick.
    pub fn parse(s: &str) -> TemplateResult<Self> {
        if !is_valid_ident(s) {
            return Err(TemplateError::invalid_identifier(s));
        }
        Ok(Self(s.to_string()))
    }

    /// Validate an argument bound to an identifier slot.
    ///
    /// Only `Arg::Text` can be an identifier; any other argument is rejected
    /// with its display form in the error.
    pub fn from_arg(arg: &Arg) -> TemplateResult<Self> {
        match arg {
            Arg::Text(s) => Self::parse(s),
            other => Err(TemplateError::invalid_identifier(other.to_string())),
        }
    }

    /// The raw (unquoted) name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('`');
        for ch in self.0.chars() {
            if ch == '`' {
                out.push('`');
                out.push('`');
            } else {
                out.push(ch);
            }
        }
        out.push('`');
    }
}
