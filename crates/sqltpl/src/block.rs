//! Conditional block evaluation.
//!
//! A `{ ... }` block is emitted only if none of the arguments its placeholders
//! would bind is the skip sentinel. The decision is a lookahead: the shared
//! cursor is not moved and nothing is escaped.

use crate::cursor::ArgCursor;
use crate::error::TemplateResult;
use crate::placeholder::segments;

/// Outcome of evaluating a conditional block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockDecision {
    /// Emit the block; its placeholders will be resolved.
    Emit,
    /// Drop the block. `slot` is the block-relative index of the first
    /// placeholder bound to the skip sentinel.
    Skip { slot: usize },
}

/// Decide whether the block `content` is emitted.
///
/// The n-th placeholder of the block is paired with the argument `n` slots
/// after the cursor position at block entry. Stops at the first sentinel.
/// Arguments past the end of the list count as not-skip.
pub(crate) fn evaluate(content: &str, cursor: &ArgCursor<'_>) -> TemplateResult<BlockDecision> {
    for (slot, placeholder) in segments(content).placeholders().enumerate() {
        placeholder?;
        if cursor.peek(slot).is_some_and(|arg| arg.is_skip()) {
            return Ok(BlockDecision::Skip { slot });
        }
    }
    Ok(BlockDecision::Emit)
}

/// Number of placeholders in the block `content`.
pub(crate) fn placeholder_count(content: &str) -> TemplateResult<usize> {
    segments(content)
        .placeholders()
        .try_fold(0usize, |n, p| p.map(|_| n + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Arg, skip};

    #[test]
    fn emits_when_no_sentinel() {
        let args = vec![Arg::Int(1), Arg::Int(2)];
        let cursor = ArgCursor::new(&args);
        assert_eq!(
            evaluate(" AND a = ?d AND b = ?d", &cursor).unwrap(),
            BlockDecision::Emit
        );
    }

    #[test]
    fn skips_on_any_sentinel() {
        let args = vec![Arg::Int(1), skip()];
        let cursor = ArgCursor::new(&args);
        assert_eq!(
            evaluate(" AND a = ?d AND b = ?", &cursor).unwrap(),
            BlockDecision::Skip { slot: 1 }
        );
    }

    #[test]
    fn window_starts_at_cursor() {
        let args = vec![skip(), Arg::Int(1)];
        let mut cursor = ArgCursor::new(&args);
        cursor.drop_slots(1);
        assert_eq!(evaluate(" AND a = ?d", &cursor).unwrap(), BlockDecision::Emit);
    }

    #[test]
    fn missing_arguments_are_not_sentinels() {
        let args: Vec<Arg> = Vec::new();
        let cursor = ArgCursor::new(&args);
        assert_eq!(evaluate(" AND a = ?d", &cursor).unwrap(), BlockDecision::Emit);
    }

    #[test]
    fn literal_only_block_is_emitted() {
        let args = vec![skip()];
        let cursor = ArgCursor::new(&args);
        assert_eq!(evaluate(" LIMIT 10", &cursor).unwrap(), BlockDecision::Emit);
    }

    #[test]
    fn short_circuits_before_bad_placeholders() {
        let args = vec![skip()];
        let cursor = ArgCursor::new(&args);
        assert_eq!(
            evaluate(" AND a = ?d AND b = ?x", &cursor).unwrap(),
            BlockDecision::Skip { slot: 0 }
        );
    }

    #[test]
    fn counts_placeholders() {
        assert_eq!(placeholder_count(" AND a IN (?a) AND b = ?").unwrap(), 2);
        assert_eq!(placeholder_count("no placeholders").unwrap(), 0);
        assert!(placeholder_count(" AND a = ?z").is_err());
    }
}
