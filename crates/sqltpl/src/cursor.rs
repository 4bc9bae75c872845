//! Forward-only argument cursor owned by a single compile call.

use crate::error::{TemplateError, TemplateResult};
use crate::value::Arg;

#[derive(Debug)]
pub(crate) struct ArgCursor<'a> {
    args: &'a [Arg],
    next: usize,
    consumed: usize,
    dropped: usize,
}

impl<'a> ArgCursor<'a> {
    pub(crate) fn new(args: &'a [Arg]) -> Self {
        Self {
            args,
            next: 0,
            consumed: 0,
            dropped: 0,
        }
    }

    /// Index of the next argument to be consumed.
    pub(crate) fn position(&self) -> usize {
        self.next
    }

    pub(crate) fn args_len(&self) -> usize {
        self.args.len()
    }

    /// Look at the argument `offset` slots ahead without consuming it.
    pub(crate) fn peek(&self, offset: usize) -> Option<&'a Arg> {
        self.args.get(self.next + offset)
    }

    /// Consume the next argument.
    pub(crate) fn take(&mut self) -> TemplateResult<&'a Arg> {
        let Some(arg) = self.args.get(self.next) else {
            return Err(self.count_error());
        };
        self.next += 1;
        self.consumed += 1;
        Ok(arg)
    }

    /// Step over `n` slots belonging to a dropped block without consuming them.
    pub(crate) fn drop_slots(&mut self, n: usize) {
        let n = n.min(self.args.len() - self.next);
        self.next += n;
        self.dropped += n;
    }

    /// Placeholders resolved so far.
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    /// Slots stepped over by [`ArgCursor::drop_slots`].
    pub(crate) fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of skip sentinels in the whole argument list.
    pub(crate) fn skip_count(&self) -> usize {
        self.args.iter().filter(|a| a.is_skip()).count()
    }

    pub(crate) fn count_error(&self) -> TemplateError {
        TemplateError::WrongPlaceholderCount {
            placeholders: self.consumed,
            args: self.args.len(),
            skipped: self.skip_count(),
        }
    }
}
