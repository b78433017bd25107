//! Typed-value facade (spec §4.7): given a property name, an optional
//! vendor prefix, and a parser positioned at the start of a value, produce
//! a typed `Value<T>` or fall back to `Value::Unparsed`.
//!
//! The per-property leaf grammars themselves (`T`) are collaborators out
//! of this crate's scope (spec §1); this module is only the dispatch
//! contract plus the three checks every property shares: CSS-wide
//! keywords, `var()`/`env()` short-circuiting, and vendor-prefix fallback.

use crate::parser::cursor::Parser;
use crate::stylesheet::{CssWideKeyword, PropertyId, PropertyValueParser, Value, VendorPrefix};
use crate::tokenizer::{Token, TokenType};

/// Collects the raw token run for a declaration's value (everything up to
/// the scope boundary the caller already established), stripped of
/// leading/trailing whitespace, for the `Unparsed` fallback (spec §6.3:
/// lossless for this path).
pub fn collect_value_tokens(p: &mut Parser) -> Vec<Token> {
    let mut tokens = Vec::new();
    loop {
        let tok = p.next_including_whitespace();
        if matches!(tok.token_type, TokenType::Eof) {
            break;
        }
        tokens.push(tok);
    }
    while matches!(tokens.last().map(|t| &t.token_type), Some(TokenType::Whitespace)) {
        tokens.pop();
    }
    while matches!(tokens.first().map(|t| &t.token_type), Some(TokenType::Whitespace)) {
        tokens.remove(0);
    }
    tokens
}

/// True if any token in the run (including inside nested functions) is a
/// `var(` or `env(` function — such a value is never resolved by this
/// crate and must fall back to `Unparsed` regardless of the property's own
/// grammar (spec §4.7).
pub fn contains_var_or_env(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| matches!(&t.token_type, TokenType::Function(name) if name.eq_ignore_ascii_case("var") || name.eq_ignore_ascii_case("env")))
}

/// If the whole run is exactly one CSS-wide-keyword ident (ignoring
/// surrounding whitespace, which `collect_value_tokens` already strips),
/// returns it.
pub fn as_wide_keyword(tokens: &[Token]) -> Option<CssWideKeyword> {
    match tokens {
        [Token { token_type: TokenType::Ident(s), .. }] => CssWideKeyword::from_ident(s),
        _ => None,
    }
}

/// Parses one declaration's value per the facade contract (spec §4.7):
///
/// 1. CSS-wide keyword → `WideKeyword`.
/// 2. Contains `var()`/`env()` → `Unparsed`.
/// 3. Else, if a property parser is registered and its leaf grammar
///    consumes the whole run, the property allows this prefix → `Typed`.
/// 4. Otherwise → `Unparsed`.
///
/// `raw` is the already-collected token run (the caller owns scoping the
/// value to its top-level `;`/`}` boundary); a fresh `Parser` is built over
/// just those tokens' source slice so the leaf grammar sees only the value.
pub fn parse_declaration_value<T>(
    name: &str,
    prefix: Option<VendorPrefix>,
    raw: Vec<Token>,
    value_source: &str,
    property_parser: Option<&dyn PropertyValueParser<T>>,
) -> Value<T> {
    if let Some(kw) = as_wide_keyword(&raw) {
        return Value::WideKeyword(kw, PropertyId { name: name.to_string(), prefix });
    }
    if contains_var_or_env(&raw) {
        return Value::Unparsed(raw);
    }
    if let Some(parser) = property_parser {
        let mut value_cursor = Parser::new(value_source, None);
        if let Ok(typed) = value_cursor.parse_entirely(|p| parser.parse(name, prefix, p)) {
            return Value::Typed(typed);
        }
    }
    Value::Unparsed(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn tok(tt: TokenType) -> Token {
        Token { token_type: tt, start_byte: 0, end_byte: 0, location: Location::start(None) }
    }

    #[test]
    fn wide_keyword_detected() {
        let toks = vec![tok(TokenType::Ident("inherit".into()))];
        assert_eq!(as_wide_keyword(&toks), Some(CssWideKeyword::Inherit));
    }

    #[test]
    fn var_reference_short_circuits() {
        let toks = vec![tok(TokenType::Function("var".into())), tok(TokenType::Ident("--x".into())), tok(TokenType::RParen)];
        assert!(contains_var_or_env(&toks));
    }

    #[test]
    fn plain_run_is_not_wide_keyword() {
        let toks = vec![tok(TokenType::Ident("red".into()))];
        assert_eq!(as_wide_keyword(&toks), None);
    }
}
