//! `<An+B>` grammar (Selectors L4 §9): `odd`, `even`, a bare integer, `n`,
//! `An`, `An+B`, `An-B`, with or without the leading integer, `-n` allowed.

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::cursor::Parser;
use crate::selector::AnPlusB;
use crate::tokenizer::TokenType;

pub fn parse_an_plus_b(p: &mut Parser) -> PResult<AnPlusB> {
    log::trace!("parse_an_plus_b");

    let leading_sign = match p.peek().token_type {
        TokenType::Delim('+') => {
            p.next();
            1
        }
        _ => 1,
    };

    let tok = p.next();
    match tok.token_type {
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("odd") => Ok(AnPlusB { a: 2, b: 1 }),
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("even") => Ok(AnPlusB { a: 2, b: 0 }),
        TokenType::Number { int_value: Some(n), .. } => Ok(AnPlusB { a: 0, b: n }),
        TokenType::Ident(ref s) => parse_ident_form(p, s, leading_sign, &tok.location),
        TokenType::Dimension { int_value: Some(a), ref unit, .. } => parse_dimension_form(p, a, unit, &tok.location),
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location.clone())),
    }
}

fn parse_ident_form(p: &mut Parser, raw: &str, leading_sign: i32, loc: &crate::location::Location) -> PResult<AnPlusB> {
    let lower = raw.to_ascii_lowercase();
    let (a_sign, rest) = if let Some(stripped) = lower.strip_prefix('-') {
        (-1, stripped)
    } else {
        (leading_sign, lower.as_str())
    };

    if !rest.starts_with('n') {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(p.peek()), loc.clone()));
    }

    let after_n = &rest[1..];
    if after_n.is_empty() {
        let b = consume_trailing_b(p)?;
        return Ok(AnPlusB { a: a_sign, b });
    }
    let b: i32 = after_n
        .parse()
        .map_err(|_| Error::basic(BasicParseErrorKind::UnexpectedToken(p.peek()), loc.clone()))?;
    Ok(AnPlusB { a: a_sign, b })
}

fn parse_dimension_form(p: &mut Parser, a: i32, unit: &str, loc: &crate::location::Location) -> PResult<AnPlusB> {
    let lower = unit.to_ascii_lowercase();
    if lower == "n" {
        let b = consume_trailing_b(p)?;
        return Ok(AnPlusB { a, b });
    }
    if let Some(rest) = lower.strip_prefix("n-") {
        let b: i32 = format!("-{rest}")
            .parse()
            .map_err(|_| Error::basic(BasicParseErrorKind::UnexpectedToken(p.peek()), loc.clone()))?;
        return Ok(AnPlusB { a, b });
    }
    Err(Error::basic(BasicParseErrorKind::UnexpectedToken(p.peek()), loc.clone()))
}

/// After a bare `n`/`An`, an optional ` + B` / ` - B` term, whitespace on
/// either side of the sign. Absence of a sign means `b = 0` and nothing is
/// consumed.
fn consume_trailing_b(p: &mut Parser) -> PResult<i32> {
    let state = p.state();
    let sign = match p.next().token_type {
        TokenType::Delim('+') => 1,
        TokenType::Delim('-') => -1,
        _ => {
            p.reset(state);
            return Ok(0);
        }
    };
    let tok = p.next();
    match tok.token_type {
        TokenType::Number { int_value: Some(n), .. } => Ok(sign * n),
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> AnPlusB {
        let mut p = Parser::new(input, None);
        parse_an_plus_b(&mut p).unwrap()
    }

    #[test]
    fn odd_even() {
        assert_eq!(parse("odd"), AnPlusB { a: 2, b: 1 });
        assert_eq!(parse("even"), AnPlusB { a: 2, b: 0 });
    }

    #[test]
    fn bare_integer() {
        assert_eq!(parse("3"), AnPlusB { a: 0, b: 3 });
    }

    #[test]
    fn an_plus_b_forms() {
        assert_eq!(parse("2n+1"), AnPlusB { a: 2, b: 1 });
        assert_eq!(parse("2n"), AnPlusB { a: 2, b: 0 });
        assert_eq!(parse("-n+3"), AnPlusB { a: -1, b: 3 });
        assert_eq!(parse("n"), AnPlusB { a: 1, b: 0 });
        assert_eq!(parse("n-5"), AnPlusB { a: 1, b: -5 });
    }
}
