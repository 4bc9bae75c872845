//! Value escaping.
//!
//! [`ValueEscaper`] turns a typed [`Arg`] into SQL text according to the
//! placeholder [`Specifier`] it is bound to. String literals go through a
//! pluggable [`StringEscaper`]; the default is [`MysqlEscaper`].

use crate::error::{TemplateError, TemplateResult};
use crate::ident::Ident;
use crate::placeholder::Specifier;
use crate::value::{Arg, ArgKey};
use regex::Regex;
use std::sync::OnceLock;

/// The driver-level string escaping primitive.
///
/// Implementations neutralize SQL meta-characters so the result can be
/// embedded between single quotes. Any connection/charset context belongs to
/// the implementing type.
pub trait StringEscaper: Send + Sync {
    fn escape(&self, raw: &str) -> String;
}

impl<F> StringEscaper for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn escape(&self, raw: &str) -> String {
        self(raw)
    }
}

/// `mysql_real_escape_string` for ASCII-compatible charsets (utf8mb4, latin1...).
///
/// Escapes NUL, `\n`, `\r`, `\`, `'`, `"` and Ctrl-Z with a backslash.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEscaper;

impl StringEscaper for MysqlEscaper {
    fn escape(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + raw.len() / 8);
        for c in raw.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out
    }
}

/// Reverse MySQL backslash escapes, as the server does for a string literal body.
///
/// `\%` and `\_` keep their backslash (MySQL keeps them for `LIKE` patterns);
/// an unknown escape `\x` yields `x`.
pub fn unescape_mysql(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\x08'),
            Some('Z') => out.push('\x1a'),
            Some(c @ ('%' | '_')) => {
                out.push('\\');
                out.push(c);
            }
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}

enum Numeric {
    Int(i64),
    Float(f64),
}

/// Numeric value of the longest numeric prefix of `s` (`"12abc"` is 12,
/// `"abc"` is 0).
fn leading_numeric(s: &str) -> Numeric {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMERIC_RE.get_or_init(|| {
        Regex::new(r"^[ \t\n\r\x0B\x0C]*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("invalid built-in numeric regex")
    });

    let Some(m) = re.captures(s).and_then(|c| c.get(1)) else {
        return Numeric::Int(0);
    };
    let text = m.as_str();
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'+' || b == b'-') {
        if let Ok(i) = text.parse::<i64>() {
            return Numeric::Int(i);
        }
    }
    Numeric::Float(text.parse::<f64>().unwrap_or(0.0))
}

fn float_to_int(x: f64) -> TemplateResult<i64> {
    if !x.is_finite() {
        return Err(TemplateError::type_error(format!(
            "Cannot convert non-finite float {x} to integer"
        )));
    }
    // `as` truncates toward zero and saturates at the i64 bounds.
    Ok(x as i64)
}

fn format_float(x: f64) -> TemplateResult<String> {
    if !x.is_finite() {
        return Err(TemplateError::type_error(format!(
            "Non-finite float {x} cannot be rendered as SQL"
        )));
    }
    Ok(x.to_string())
}

fn skip_outside_block() -> TemplateError {
    TemplateError::type_error("Skip value can only be bound inside a conditional block")
}

/// Escapes arguments per placeholder specifier.
pub struct ValueEscaper<'a> {
    strings: &'a dyn StringEscaper,
}

impl<'a> ValueEscaper<'a> {
    pub fn new(strings: &'a dyn StringEscaper) -> Self {
        Self { strings }
    }

    /// Render `arg` for a placeholder with the given specifier.
    pub fn escape(&self, specifier: Specifier, arg: &Arg) -> TemplateResult<String> {
        match specifier {
            Specifier::Generic => self.value(arg),
            Specifier::Int => self.int(arg),
            Specifier::Float => self.float(arg),
            Specifier::Assign => self.assignments(arg),
            Specifier::Ident => self.identifiers(arg),
        }
    }

    /// `?d`
    pub fn int(&self, arg: &Arg) -> TemplateResult<String> {
        let i = match arg {
            Arg::Null => return Ok("NULL".to_string()),
            Arg::Int(i) => *i,
            Arg::Float(x) => float_to_int(*x)?,
            Arg::Bool(b) => i64::from(*b),
            Arg::Text(s) => match leading_numeric(s) {
                Numeric::Int(i) => i,
                // "1e999" overflows to infinity and casts to 0.
                Numeric::Float(x) if !x.is_finite() => 0,
                Numeric::Float(x) => float_to_int(x)?,
            },
            Arg::List(_) | Arg::Map(_) => {
                return Err(TemplateError::type_error(format!(
                    "Expected scalar for ?d placeholder, got {}",
                    arg.type_name()
                )));
            }
            Arg::Skip => return Err(skip_outside_block()),
        };
        Ok(i.to_string())
    }

    /// `?f`
    pub fn float(&self, arg: &Arg) -> TemplateResult<String> {
        let x = match arg {
            Arg::Null => return Ok("NULL".to_string()),
            Arg::Int(i) => *i as f64,
            Arg::Float(x) => *x,
            Arg::Bool(b) => f64::from(u8::from(*b)),
            Arg::Text(s) => match leading_numeric(s) {
                Numeric::Int(i) => i as f64,
                Numeric::Float(x) => x,
            },
            Arg::List(_) | Arg::Map(_) => {
                return Err(TemplateError::type_error(format!(
                    "Expected scalar for ?f placeholder, got {}",
                    arg.type_name()
                )));
            }
            Arg::Skip => return Err(skip_outside_block()),
        };
        format_float(x)
    }

    /// `?`
    pub fn value(&self, arg: &Arg) -> TemplateResult<String> {
        match arg {
            Arg::Null => Ok("NULL".to_string()),
            Arg::Int(i) => Ok(i.to_string()),
            Arg::Float(x) => format_float(*x),
            Arg::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            Arg::Text(s) => {
                let escaped = self.strings.escape(s);
                let mut out = String::with_capacity(escaped.len() + 2);
                out.push('\'');
                out.push_str(&escaped);
                out.push('\'');
                Ok(out)
            }
            Arg::List(_) | Arg::Map(_) => Err(TemplateError::type_error("Unexpected array value")),
            Arg::Skip => Err(skip_outside_block()),
        }
    }

    /// `?#`: a single identifier, or a comma-separated identifier list.
    pub fn identifiers(&self, arg: &Arg) -> TemplateResult<String> {
        let mut out = String::new();
        match arg {
            Arg::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    Ident::from_arg(item)?.write_sql(&mut out);
                }
            }
            Arg::Map(entries) => {
                for (i, (_, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    Ident::from_arg(item)?.write_sql(&mut out);
                }
            }
            scalar => Ident::from_arg(scalar)?.write_sql(&mut out),
        }
        Ok(out)
    }

    /// `?a`: values of a list, or `` `key` = value `` pairs of a map.
    pub fn assignments(&self, arg: &Arg) -> TemplateResult<String> {
        let mut parts = Vec::new();
        match arg {
            Arg::List(items) => {
                for item in items {
                    parts.push(self.value(item)?);
                }
            }
            Arg::Map(entries) => {
                for (key, item) in entries {
                    match key {
                        ArgKey::Name(name) => {
                            let mut part = Ident::parse(name)?.to_sql();
                            part.push_str(" = ");
                            part.push_str(&self.value(item)?);
                            parts.push(part);
                        }
                        ArgKey::Index(_) => parts.push(self.value(item)?),
                    }
                }
            }
            _ => {
                return Err(TemplateError::type_error(
                    "Expected array for ?a placeholder",
                ));
            }
        }
        Ok(parts.join(", "))
    }
}
