use crate::context::KeywordCase;
use serde::Deserialize;

/// How placeholder and argument counts are reconciled after scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArityMode {
    /// Consumed placeholders must equal the argument count, or the argument
    /// count minus the number of skip sentinels anywhere in the list.
    ///
    /// A dropped block leaves the cursor where it was, so arguments of a
    /// dropped block are never consumed. A block with two placeholders of
    /// which only one is bound to the sentinel still passes this check when
    /// some other sentinel makes up the difference.
    #[default]
    Global,
    /// A dropped block steps the cursor over all of its placeholder slots,
    /// and consumed + stepped-over slots must equal the argument count
    /// exactly.
    PerBlock,
}

/// Compiler configuration.
///
/// Deserializable so it can live in a config file:
///
/// ```toml
/// [compiler]
/// syntax_check = true
/// arity = "global"        # or "per_block"
/// keyword_case = "strict" # or "insensitive"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Run the syntax validator on the compiled SQL.
    pub syntax_check: bool,
    /// Placeholder/argument reconciliation rule.
    pub arity: ArityMode,
    /// Keyword membership rule for placeholder contexts.
    pub keyword_case: KeywordCase,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            syntax_check: true,
            arity: ArityMode::Global,
            keyword_case: KeywordCase::Strict,
        }
    }
}

impl CompilerConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable syntax validation.
    pub fn syntax_check(mut self, enabled: bool) -> Self {
        self.syntax_check = enabled;
        self
    }

    /// Set the arity reconciliation rule.
    pub fn arity(mut self, mode: ArityMode) -> Self {
        self.arity = mode;
        self
    }

    /// Set the keyword membership rule.
    pub fn keyword_case(mut self, case: KeywordCase) -> Self {
        self.keyword_case = case;
        self
    }
}
