//! `<container-condition>` grammar (spec §4.5).

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::condition::{parse_condition, parse_function_args_raw, Condition};
use crate::parser::cursor::{Delimiters, Parser};
use crate::parser::media::{CompareOp, MediaValue};
use crate::tokenizer::TokenType;

pub type ContainerCondition = Condition<ContainerLeaf>;

#[derive(Clone, Debug, PartialEq)]
pub enum ContainerLeaf {
    /// `(name [op value]?)`.
    Size { name: String, op: Option<CompareOp>, value: Option<MediaValue> },
    /// `style(<declaration-probe>)`.
    Style { name: String, value: String },
}

/// Optional leading container-name ident, then the condition proper.
pub fn parse_container_query(p: &mut Parser) -> PResult<(Option<String>, ContainerCondition)> {
    log::trace!("parse_container_query");
    p.skip_whitespace();
    // A leaf always starts with `(` or the `style(` function, so a bare
    // leading ident (other than `not`) can only be the container name.
    let name = match p.peek().token_type {
        TokenType::Ident(ref s) if !s.eq_ignore_ascii_case("not") => {
            let s = s.clone();
            p.next();
            p.skip_whitespace();
            Some(s)
        }
        _ => None,
    };
    let cond = parse_condition(p, true, &mut parse_leaf)?;
    Ok((name, cond))
}

fn parse_leaf(p: &mut Parser) -> PResult<ContainerLeaf> {
    if let TokenType::Function(ref name) = p.peek().token_type {
        if name.eq_ignore_ascii_case("style") {
            let raw = parse_function_args_raw(p, "style")?;
            let (name, value) = raw.split_once(':').map(|(a, b)| (a.trim().to_string(), b.trim().to_string())).unwrap_or((raw, String::new()));
            return Ok(ContainerLeaf::Style { name, value });
        }
    }

    let open = p.next();
    if !matches!(open.token_type, TokenType::LParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(open.clone()), open.location));
    }
    let result: PResult<ContainerLeaf> = p.parse_until_before(Delimiters::CLOSE_PAREN, |p| {
        p.skip_whitespace();
        let tok = p.next();
        let name = match tok.token_type {
            TokenType::Ident(ref s) => s.clone(),
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
        };
        p.skip_whitespace();
        if p.is_exhausted() {
            return Ok(ContainerLeaf::Size { name, op: None, value: None });
        }
        let op = parse_compare_op(p)?;
        p.skip_whitespace();
        let value = parse_value(p)?;
        Ok(ContainerLeaf::Size { name, op: Some(op), value: Some(value) })
    });
    p.skip_whitespace();
    let close = p.next();
    if !matches!(close.token_type, TokenType::RParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(close.clone()), close.location));
    }
    result
}

fn parse_value(p: &mut Parser) -> PResult<MediaValue> {
    let tok = p.next();
    match tok.token_type {
        TokenType::Number { value, repr, .. } => Ok(MediaValue { repr, numeric: Some(value), unit: None }),
        TokenType::Dimension { value, repr, unit, .. } => Ok(MediaValue { repr, numeric: Some(value), unit: Some(unit) }),
        TokenType::Ident(ref s) => Ok(MediaValue { repr: s.clone(), numeric: None, unit: None }),
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

fn parse_compare_op(p: &mut Parser) -> PResult<CompareOp> {
    let tok = p.next();
    match tok.token_type {
        TokenType::Colon => Ok(CompareOp::Eq),
        TokenType::Delim('=') => Ok(CompareOp::Eq),
        TokenType::Delim('<') => {
            if matches!(p.peek().token_type, TokenType::Delim('=')) {
                p.next();
                Ok(CompareOp::Le)
            } else {
                Ok(CompareOp::Lt)
            }
        }
        TokenType::Delim('>') => {
            if matches!(p.peek().token_type, TokenType::Delim('=')) {
                p.next();
                Ok(CompareOp::Ge)
            } else {
                Ok(CompareOp::Gt)
            }
        }
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_feature() {
        let mut p = Parser::new("(min-width: 400px)", None);
        let (name, cond) = parse_container_query(&mut p).unwrap();
        assert!(name.is_none());
        match cond {
            Condition::Leaf(ContainerLeaf::Size { name, .. }) => assert_eq!(name, "min-width"),
            _ => panic!("expected Size leaf"),
        }
    }

    #[test]
    fn named_container() {
        let mut p = Parser::new("sidebar (min-width: 400px)", None);
        let (name, _cond) = parse_container_query(&mut p).unwrap();
        assert_eq!(name.as_deref(), Some("sidebar"));
    }
}
