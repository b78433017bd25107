//! Functional pseudo-class/pseudo-element arguments (spec §4.4): everything
//! that takes `(...)` — `:not()`, `:is()`, `:nth-child(An+B of S)`,
//! `:lang()`, `:host()`, `::part()`, `::slotted()`, and friends.

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::anplusb::parse_an_plus_b;
use crate::parser::cursor::Parser;
use crate::parser::selector::{parse_compound_selector, parse_selector_list};
use crate::selector::{AnPlusB, PseudoClass, PseudoElement, Selector, SelectorList};
use crate::tokenizer::TokenType;

pub fn parse_selector_list_arg(p: &mut Parser) -> PResult<SelectorList> {
    parse_selector_list(p)
}

pub fn parse_compound_arg(p: &mut Parser) -> PResult<Selector> {
    parse_compound_selector(p)
}

pub fn parse_ident_list_arg(p: &mut Parser) -> PResult<Vec<String>> {
    let mut out = Vec::new();
    loop {
        p.skip_whitespace();
        let tok = p.next();
        match tok.token_type {
            TokenType::Ident(s) => out.push(s),
            TokenType::QuotedString(s) => out.push(s),
            TokenType::Eof => break,
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
        }
        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Comma => {
                p.next();
            }
            _ => break,
        }
    }
    Ok(out)
}

/// `:nth-child(An+B)` / `:nth-child(An+B of <selector-list>)`.
pub fn parse_an_plus_b_of(p: &mut Parser) -> PResult<(AnPlusB, Option<SelectorList>)> {
    let an_b = parse_an_plus_b(p)?;
    p.skip_whitespace();
    if let TokenType::Ident(ref s) = p.peek().token_type {
        if s.eq_ignore_ascii_case("of") {
            p.next();
            p.skip_whitespace();
            let list = parse_selector_list(p)?;
            return Ok((an_b, Some(list)));
        }
    }
    Ok((an_b, None))
}

/// `::part(ident+)`.
pub fn parse_part_args(p: &mut Parser) -> PResult<Vec<String>> {
    let mut out = Vec::new();
    loop {
        p.skip_whitespace();
        let tok = p.peek();
        match tok.token_type {
            TokenType::Ident(s) => {
                p.next();
                out.push(s);
            }
            _ => break,
        }
    }
    Ok(out)
}

pub fn pseudo_class_with_args(name: &str, p: &mut Parser) -> PResult<PseudoClass> {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "not" => Ok(PseudoClass::Not(parse_selector_list_arg(p)?)),
        "is" => Ok(PseudoClass::Is(parse_selector_list_arg(p)?)),
        "where" => Ok(PseudoClass::Where(parse_selector_list_arg(p)?)),
        "has" => Ok(PseudoClass::Has(parse_selector_list_arg(p)?)),
        "host" => Ok(PseudoClass::Host(Some(Box::new(parse_compound_arg(p)?)))),
        "host-context" => Ok(PseudoClass::HostContext(Box::new(parse_compound_arg(p)?))),
        "nth-child" => {
            let (an_b, of) = parse_an_plus_b_of(p)?;
            Ok(PseudoClass::NthChild { an_b, of })
        }
        "nth-last-child" => {
            let (an_b, of) = parse_an_plus_b_of(p)?;
            Ok(PseudoClass::NthLastChild { an_b, of })
        }
        "nth-of-type" => Ok(PseudoClass::NthOfType { an_b: parse_an_plus_b(p)? }),
        "nth-last-of-type" => Ok(PseudoClass::NthLastOfType { an_b: parse_an_plus_b(p)? }),
        "lang" | "dir" => Ok(PseudoClass::IdentArgs(lower, parse_ident_list_arg(p)?)),
        _ => Ok(PseudoClass::IdentArgs(lower, parse_ident_list_arg(p)?)),
    }
}

pub fn pseudo_element_with_args(name: &str, p: &mut Parser) -> PResult<PseudoElement> {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "slotted" => Ok(PseudoElement::Slotted(Box::new(parse_compound_arg(p)?))),
        "part" => Ok(PseudoElement::Part(parse_part_args(p)?)),
        _ if lower.starts_with("view-transition-") => {
            p.skip_whitespace();
            let tok = p.next();
            let arg = match tok.token_type {
                TokenType::Ident(s) => s,
                TokenType::Delim('*') => "*".to_string(),
                _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
            };
            Ok(PseudoElement::ViewTransitionPart(lower, arg))
        }
        _ => Ok(PseudoElement::Ident(lower)),
    }
}
