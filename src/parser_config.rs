//! Parser configuration and the extension seam (spec §4.13, §6.2),
//! generalizing `gosub_css3::parser_config::ParserConfig`.

use crate::error::PResult;
use crate::parser::cursor::Parser;
use crate::stylesheet::{Declaration, PropertyValueParser};
use crate::tokenizer::Token;

/// Selects which production a one-shot entry point parses (spec §4.13),
/// matching the teacher's four-variant `Context`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Context {
    Stylesheet,
    Rule,
    AtRule,
    Declaration,
}

/// The host's custom at-rule hook (spec §6.2): every method may return
/// `None` to defer to the built-in classification table, in which case the
/// result "shadows" nothing and the core proceeds as usual. Returning
/// `Some` — even `Some(Err(..))` — shadows the built-in path entirely.
pub trait CustomAtRuleParser<X, T> {
    /// A statement-form at-rule (`@name ...;`). `prelude` is scoped to the
    /// tokens before the terminating `;`.
    fn parse_at_rule(&self, _name: &str, _prelude: &mut Parser, _ctx: Context) -> Option<PResult<X>> {
        None
    }

    /// A block-form at-rule (`@name ... { ... }`). `prelude` is scoped to
    /// the tokens before `{`; `body` to the tokens inside the block.
    fn parse_at_rule_block(&self, _name: &str, _prelude: &[Token], _body: &mut Parser, _ctx: Context) -> Option<PResult<X>> {
        None
    }

    /// Intercepts one declaration before the typed-value facade runs.
    fn parse_declaration(&self, _name: &str, _value: &mut Parser, _ctx: Context) -> Option<PResult<Declaration<T>>> {
        None
    }
}

/// A custom at-rule parser that never matches anything, used as the
/// default when a caller registers none (spec §6.2: "may return `None` to
/// defer to the built-ins" — this impl always defers).
pub struct NoCustomAtRules;
impl<X, T> CustomAtRuleParser<X, T> for NoCustomAtRules {}

pub struct ParserConfig<'a, X, T> {
    pub context: Context,
    /// Recoverable errors are recorded rather than aborting the parse
    /// (spec §4.11) unless this is false, in which case the first error
    /// is returned directly — used by the strict one-shot entry points.
    pub ignore_errors: bool,
    pub source: Option<String>,
    pub at_rule_parser: Option<&'a dyn CustomAtRuleParser<X, T>>,
    pub property_parser: Option<&'a dyn PropertyValueParser<T>>,
}

impl<'a, X, T> ParserConfig<'a, X, T> {
    pub fn new(context: Context) -> Self {
        ParserConfig {
            context,
            ignore_errors: true,
            source: None,
            at_rule_parser: None,
            property_parser: None,
        }
    }
}
