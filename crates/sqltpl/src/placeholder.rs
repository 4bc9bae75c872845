//! Placeholder recognition and resolution.
//!
//! Recognition ([`recognize`], [`segments`]) is side-effect free and shared by
//! the skip lookahead and the substituting pass. Resolution ([`Resolver`])
//! validates the context, takes the next argument from the cursor and escapes
//! it.

use crate::context::{KeywordCase, validate_context};
use crate::cursor::ArgCursor;
use crate::error::{TemplateError, TemplateResult};
use crate::escape::ValueEscaper;

/// Escaping rule selected by the character after `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specifier {
    /// `?`
    Generic,
    /// `?d`
    Int,
    /// `?f`
    Float,
    /// `?a`
    Assign,
    /// `?#`
    Ident,
}

impl Specifier {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Int),
            'f' => Some(Self::Float),
            'a' => Some(Self::Assign),
            '#' => Some(Self::Ident),
            _ => None,
        }
    }

    /// The placeholder token as written in a template.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "?",
            Self::Int => "?d",
            Self::Float => "?f",
            Self::Assign => "?a",
            Self::Ident => "?#",
        }
    }
}

/// A recognized placeholder inside some template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub specifier: Specifier,
    /// Byte offset of the `?`.
    pub offset: usize,
    /// Token length in bytes (1 for `?`, 2 otherwise).
    pub len: usize,
}

impl Placeholder {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Characters that count as "nothing" after a `?`.
fn is_trim_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\0')
}

/// Recognize the placeholder whose `?` sits at byte `offset` of `text`.
pub fn recognize(text: &str, offset: usize) -> TemplateResult<Placeholder> {
    debug_assert_eq!(text.as_bytes().get(offset), Some(&b'?'));

    match text[offset + 1..].chars().next() {
        None => Ok(Placeholder {
            specifier: Specifier::Generic,
            offset,
            len: 1,
        }),
        Some(c) if is_trim_char(c) => Ok(Placeholder {
            specifier: Specifier::Generic,
            offset,
            len: 1,
        }),
        Some(c) => match Specifier::from_char(c) {
            Some(specifier) => Ok(Placeholder {
                specifier,
                offset,
                len: 2,
            }),
            None => Err(TemplateError::UnsupportedPlaceholder {
                specifier: c,
                offset,
            }),
        },
    }
}

/// A piece of template text: either literal SQL or a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(Placeholder),
}

/// Iterator over the [`Segment`]s of a brace-free piece of template text.
///
/// Stops after the first recognition error.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
    failed: bool,
}

/// Split `text` into literal runs and placeholders.
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        text,
        pos: 0,
        failed: false,
    }
}

impl<'a> Segments<'a> {
    /// Only the placeholders, in order of appearance.
    pub fn placeholders(self) -> impl Iterator<Item = TemplateResult<Placeholder>> + 'a {
        self.filter_map(|seg| match seg {
            Ok(Segment::Literal(_)) => None,
            Ok(Segment::Placeholder(p)) => Some(Ok(p)),
            Err(e) => Some(Err(e)),
        })
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = TemplateResult<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.pos..];
        match rest.find('?') {
            Some(0) => match recognize(self.text, self.pos) {
                Ok(p) => {
                    self.pos = p.end();
                    Some(Ok(Segment::Placeholder(p)))
                }
                Err(e) => {
                    self.failed = true;
                    Some(Err(e))
                }
            },
            Some(idx) => {
                self.pos += idx;
                Some(Ok(Segment::Literal(&rest[..idx])))
            }
            None => {
                self.pos = self.text.len();
                Some(Ok(Segment::Literal(rest)))
            }
        }
    }
}

/// Substitutes placeholders with escaped arguments.
pub(crate) struct Resolver<'a> {
    pub(crate) escaper: ValueEscaper<'a>,
    pub(crate) keyword_case: KeywordCase,
}

impl Resolver<'_> {
    /// Resolve one placeholder of `text`, appending the replacement to `out`.
    ///
    /// The context is validated against `text` up to the placeholder, so for
    /// block placeholders `text` is the block content.
    pub(crate) fn resolve(
        &self,
        text: &str,
        placeholder: Placeholder,
        cursor: &mut ArgCursor<'_>,
        out: &mut String,
    ) -> TemplateResult<()> {
        validate_context(&text[..placeholder.offset], self.keyword_case)?;
        let arg = cursor.take()?;
        out.push_str(&self.escaper.escape(placeholder.specifier, arg)?);
        Ok(())
    }

    /// Copy `text` to `out`, resolving every placeholder in it.
    pub(crate) fn expand(
        &self,
        text: &str,
        cursor: &mut ArgCursor<'_>,
        out: &mut String,
    ) -> TemplateResult<()> {
        for seg in segments(text) {
            match seg? {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(p) => self.resolve(text, p, cursor, out)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(text: &str) -> Vec<Specifier> {
        segments(text)
            .placeholders()
            .map(|p| p.unwrap().specifier)
            .collect()
    }

    #[test]
    fn recognizes_every_specifier() {
        assert_eq!(
            specs("?d ?f ?a ?# ? ?"),
            vec![
                Specifier::Int,
                Specifier::Float,
                Specifier::Assign,
                Specifier::Ident,
                Specifier::Generic,
                Specifier::Generic
            ]
        );
    }

    #[test]
    fn generic_at_end_and_before_whitespace() {
        assert_eq!(recognize("a = ?", 4).unwrap().len, 1);
        assert_eq!(recognize("?\n", 0).unwrap().specifier, Specifier::Generic);
        assert_eq!(recognize("?\t", 0).unwrap().specifier, Specifier::Generic);
    }

    #[test]
    fn unsupported_specifier() {
        let err = recognize("a = ?x", 4).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported placeholder type: ?x");

        // A following comma or paren is not whitespace either.
        assert!(recognize("(?,", 1).is_err());
        assert!(recognize("(?)", 1).is_err());
    }

    #[test]
    fn segments_split_literals_and_placeholders() {
        let segs: Vec<_> = segments("a = ?d AND b IN (?a)")
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            segs,
            vec![
                Segment::Literal("a = "),
                Segment::Placeholder(Placeholder {
                    specifier: Specifier::Int,
                    offset: 4,
                    len: 2
                }),
                Segment::Literal(" AND b IN ("),
                Segment::Placeholder(Placeholder {
                    specifier: Specifier::Assign,
                    offset: 17,
                    len: 2
                }),
                Segment::Literal(")"),
            ]
        );
    }

    #[test]
    fn specifier_char_is_consumed() {
        // `?dd` is `?d` followed by a literal `d`.
        let segs: Vec<_> = segments("?dd").map(Result::unwrap).collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1], Segment::Literal("d"));
    }

    #[test]
    fn multibyte_text_is_handled() {
        let segs: Vec<_> = segments("naïve = ? — ok").map(Result::unwrap).collect();
        assert_eq!(segs[0], Segment::Literal("naïve = "));
        assert!(matches!(segs[1], Segment::Placeholder(_)));
        assert_eq!(segs[2], Segment::Literal(" — ok"));
    }

    #[test]
    fn segments_stop_after_error() {
        let items: Vec<_> = segments("?x ?d").collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[test]
    fn token_strings() {
        assert_eq!(Specifier::Ident.as_str(), "?#");
        assert_eq!(Specifier::Generic.as_str(), "?");
    }
}
