//! `<supports-condition>` grammar (spec §4.5).

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::condition::{parse_condition, parse_function_args_raw, Condition};
use crate::parser::cursor::{Delimiters, Parser};
use crate::tokenizer::TokenType;

pub type SupportsCondition = Condition<SupportsLeaf>;

#[derive(Clone, Debug, PartialEq)]
pub enum SupportsLeaf {
    /// `(prop: value)`.
    Declaration { name: String, value: String },
    /// `selector(<complex-selector>)`.
    Selector(String),
    /// Anything inside `(...)` this grammar does not otherwise recognise.
    Unknown(String),
}

pub fn parse_supports_condition(p: &mut Parser) -> PResult<SupportsCondition> {
    log::trace!("parse_supports_condition");
    parse_condition(p, true, &mut parse_leaf)
}

fn parse_leaf(p: &mut Parser) -> PResult<SupportsLeaf> {
    if let TokenType::Function(ref name) = p.peek().token_type {
        if name.eq_ignore_ascii_case("selector") {
            let raw = parse_function_args_raw(p, "selector")?;
            return Ok(SupportsLeaf::Selector(raw));
        }
    }

    let open = p.next();
    if !matches!(open.token_type, TokenType::LParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(open.clone()), open.location));
    }
    let result: PResult<SupportsLeaf> = p.parse_until_before(Delimiters::CLOSE_PAREN, |p| {
        p.skip_whitespace();
        let state = p.state();
        if let Ok(decl) = p.try_parse(parse_declaration_leaf) {
            return Ok(decl);
        }
        p.reset(state);
        let mut raw = String::new();
        loop {
            let t = p.next_including_whitespace();
            if matches!(t.token_type, TokenType::Eof) {
                break;
            }
            raw.push_str(&super_token_text(&t.token_type));
        }
        Ok(SupportsLeaf::Unknown(raw.trim().to_string()))
    });
    p.skip_whitespace();
    let close = p.next();
    if !matches!(close.token_type, TokenType::RParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(close.clone()), close.location));
    }
    result
}

fn parse_declaration_leaf(p: &mut Parser) -> PResult<SupportsLeaf> {
    let tok = p.next();
    let name = match tok.token_type {
        TokenType::Ident(ref s) => s.clone(),
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    };
    p.skip_whitespace();
    let colon = p.next();
    if !matches!(colon.token_type, TokenType::Colon) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(colon.clone()), colon.location));
    }
    p.skip_whitespace();
    let mut value = String::new();
    loop {
        let t = p.next_including_whitespace();
        if matches!(t.token_type, TokenType::Eof) {
            break;
        }
        value.push_str(&super_token_text(&t.token_type));
    }
    Ok(SupportsLeaf::Declaration { name, value: value.trim().to_string() })
}

fn super_token_text(t: &TokenType) -> String {
    match t {
        TokenType::Whitespace => " ".to_string(),
        TokenType::Ident(s) | TokenType::AtKeyword(s) | TokenType::Function(s) => s.clone(),
        TokenType::QuotedString(s) => format!("\"{s}\""),
        TokenType::Colon => ":".to_string(),
        TokenType::Number { repr, .. } | TokenType::Dimension { repr, .. } | TokenType::Percentage { repr, .. } => repr.clone(),
        TokenType::Delim(c) => c.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_probe() {
        let mut p = Parser::new("selector(:has(*))", None);
        let cond = parse_supports_condition(&mut p).unwrap();
        assert_eq!(cond, Condition::Leaf(SupportsLeaf::Selector(":has(*)".into())));
    }

    #[test]
    fn declaration_probe() {
        let mut p = Parser::new("(display: grid)", None);
        let cond = parse_supports_condition(&mut p).unwrap();
        assert_eq!(
            cond,
            Condition::Leaf(SupportsLeaf::Declaration { name: "display".into(), value: "grid".into() })
        );
    }
}
