//! `<media-query-list>` grammar (spec §4.5).

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::condition::{parse_condition, Condition};
use crate::parser::cursor::{Delimiters, Parser};
use crate::tokenizer::TokenType;

pub type MediaCondition = Condition<MediaFeature>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

/// A feature's right-hand (or left/right, for interval form) operand. The
/// per-property typed-value grammar is out of scope (§1), so the operand
/// is kept as its original textual representation plus, when it parses as
/// a plain dimension/number, the numeric/unit pair comparisons need.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaValue {
    pub repr: String,
    pub numeric: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MediaFeature {
    Boolean(String),
    Plain { name: String, value: MediaValue },
    Range { name: String, op: CompareOp, value: MediaValue },
    Interval {
        low: MediaValue,
        low_op: CompareOp,
        name: String,
        high_op: CompareOp,
        high: MediaValue,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaQuery {
    pub negated: bool,
    pub media_type: Option<String>,
    pub condition: Option<MediaCondition>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaQueryList(pub Vec<MediaQuery>);

/// `<media-query-list> := <media-query> (, <media-query>)*`, scoped by the
/// caller to end at the at-rule's `{`/`;`.
pub fn parse_media_query_list(p: &mut Parser) -> PResult<MediaQueryList> {
    log::trace!("parse_media_query_list");
    let mut queries = Vec::new();
    loop {
        let q: Result<MediaQuery, Error> = p.parse_until_before(Delimiters::COMMA, parse_media_query);
        queries.push(q.unwrap_or(MediaQuery { negated: false, media_type: None, condition: None }));
        p.skip_whitespace();
        if matches!(p.peek().token_type, TokenType::Comma) {
            p.next();
            continue;
        }
        break;
    }
    Ok(MediaQueryList(queries))
}

fn parse_media_query(p: &mut Parser) -> PResult<MediaQuery> {
    p.skip_whitespace();
    // A query may start directly with a parenthesised condition (no type).
    if matches!(p.peek().token_type, TokenType::LParen) {
        let cond = parse_condition(p, true, &mut parse_feature)?;
        return Ok(MediaQuery { negated: false, media_type: None, condition: Some(cond) });
    }

    let mut negated = false;
    let tok = p.next();
    let mut media_type = match tok.token_type {
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("not") => {
            negated = true;
            p.skip_whitespace();
            let t2 = p.next();
            match t2.token_type {
                TokenType::Ident(s2) => s2,
                _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(t2.clone()), t2.location)),
            }
        }
        TokenType::Ident(ref s) => s.clone(),
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    };
    if media_type.eq_ignore_ascii_case("only") {
        p.skip_whitespace();
        let t2 = p.next();
        media_type = match t2.token_type {
            TokenType::Ident(s2) => s2,
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(t2.clone()), t2.location)),
        };
    }

    p.skip_whitespace();
    let tok = p.peek();
    let condition = match tok.token_type {
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("and") => {
            p.next();
            // `<media-condition-without-or>`: `or` is forbidden here.
            Some(parse_condition(p, false, &mut parse_feature)?)
        }
        _ => None,
    };

    Ok(MediaQuery { negated, media_type: Some(media_type), condition })
}

fn parse_value(p: &mut Parser) -> PResult<MediaValue> {
    let tok = p.next();
    match tok.token_type {
        TokenType::Number { value, repr, .. } => Ok(MediaValue { repr, numeric: Some(value), unit: None }),
        TokenType::Dimension { value, repr, unit, .. } => Ok(MediaValue { repr, numeric: Some(value), unit: Some(unit) }),
        TokenType::Ident(ref s) => Ok(MediaValue { repr: s.clone(), numeric: None, unit: None }),
        TokenType::Percentage { value, repr } => Ok(MediaValue { repr, numeric: Some(value), unit: Some("%".into()) }),
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

/// One `( ... )` media feature: boolean, plain, range, or interval form.
pub fn parse_feature(p: &mut Parser) -> PResult<MediaFeature> {
    let open = p.next();
    if !matches!(open.token_type, TokenType::LParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(open.clone()), open.location));
    }
    let result = p.parse_until_before(Delimiters::CLOSE_PAREN, |p| {
        p.skip_whitespace();
        // Interval form: `<value> <op> <name> <op> <value>`.
        let state = p.state();
        if let Ok(interval) = p.try_parse(parse_interval) {
            return Ok(interval);
        }
        p.reset(state);

        let tok = p.next();
        let name = match tok.token_type {
            TokenType::Ident(ref s) => s.clone(),
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
        };
        p.skip_whitespace();
        if p.is_exhausted() {
            return Ok(MediaFeature::Boolean(name));
        }
        let op = parse_compare_op(p)?;
        p.skip_whitespace();
        let value = parse_value(p)?;
        Ok(MediaFeature::Range { name, op, value })
    });
    p.skip_whitespace();
    let close = p.next();
    if !matches!(close.token_type, TokenType::RParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(close.clone()), close.location));
    }
    result
}

fn parse_interval(p: &mut Parser) -> PResult<MediaFeature> {
    let low = parse_value(p)?;
    p.skip_whitespace();
    let low_op = parse_compare_op(p)?;
    p.skip_whitespace();
    let tok = p.next();
    let name = match tok.token_type {
        TokenType::Ident(ref s) => s.clone(),
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    };
    p.skip_whitespace();
    let high_op = parse_compare_op(p)?;
    p.skip_whitespace();
    let high = parse_value(p)?;
    p.skip_whitespace();
    if !p.is_exhausted() {
        let tok = p.peek();
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location));
    }
    Ok(MediaFeature::Interval { low, low_op, name, high_op, high })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_range_and_and() {
        let mut p = Parser::new("(min-width: 768px) and (max-width: 1024px)", None);
        let list = parse_media_query_list(&mut p).unwrap();
        let q = &list.0[0];
        assert!(q.media_type.is_none());
        match q.condition.as_ref().unwrap() {
            Condition::And(items) => assert_eq!(items.len(), 2),
            _ => panic!("expected And"),
        }
    }

    #[test]
    fn screen_and_feature() {
        let mut p = Parser::new("screen and (min-width: 400px)", None);
        let list = parse_media_query_list(&mut p).unwrap();
        assert_eq!(list.0[0].media_type.as_deref(), Some("screen"));
    }

    #[test]
    fn boolean_feature() {
        let mut p = Parser::new("(color)", None);
        let f = parse_feature(&mut p).unwrap();
        assert_eq!(f, MediaFeature::Boolean("color".into()));
    }
}
