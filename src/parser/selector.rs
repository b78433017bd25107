//! Selectors Level 4 grammar (spec §4.4), producing the typed AST in
//! `crate::selector`.

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::cursor::{Delimiters, Parser};
use crate::parser::pseudo::{pseudo_class_with_args, pseudo_element_with_args};
use crate::selector::{
    AttrCaseSensitivity, AttrMatchOp, AttributeSelector, Combinator, Component, NamespacePrefix, PseudoClass, PseudoElement, QualName,
    Selector, SelectorList,
};
use crate::tokenizer::TokenType;
use smallvec::SmallVec;

/// `<selector-list> := <complex-selector> (, <complex-selector>)*`. The
/// caller is responsible for scoping the cursor (e.g. to a `{` or a
/// function's closing `)`) — this never looks past its own scope's EOF.
pub fn parse_selector_list(p: &mut Parser) -> PResult<SelectorList> {
    let mut selectors = Vec::new();
    loop {
        p.skip_whitespace();
        selectors.push(parse_complex_selector(p)?);
        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Comma => {
                p.next();
            }
            _ => break,
        }
    }
    Ok(SelectorList(selectors))
}

/// A single compound selector, used by `:host(<compound>)` and
/// `::slotted(<compound>)` arguments.
pub fn parse_compound_selector(p: &mut Parser) -> PResult<Selector> {
    p.skip_whitespace();
    let components = parse_compound_components(p)?;
    Ok(Selector { components })
}

fn parse_complex_selector(p: &mut Parser) -> PResult<Selector> {
    let mut components = parse_compound_components(p)?;
    loop {
        match try_parse_combinator(p)? {
            Some(comb) => {
                components.push(Component::Combinator(comb));
                components.extend(parse_compound_components(p)?);
            }
            None => break,
        }
    }
    Ok(Selector { components })
}

fn is_compound_boundary(t: &TokenType) -> bool {
    matches!(
        t,
        TokenType::Whitespace
            | TokenType::Eof
            | TokenType::Comma
            | TokenType::RParen
            | TokenType::RCurly
            | TokenType::RBracket
            | TokenType::Delim('>')
            | TokenType::Delim('+')
            | TokenType::Delim('~')
            | TokenType::Column
    )
}

/// Explicit `>`/`+`/`~`/`||`, or an implicit descendant combinator (bare
/// whitespace with another compound following). Returns `None` once the
/// selector is exhausted (comma, closer, or EOF next).
fn try_parse_combinator(p: &mut Parser) -> PResult<Option<Combinator>> {
    let state = p.state();
    let tok = p.next_including_whitespace();
    match tok.token_type {
        TokenType::Whitespace => {
            p.skip_whitespace();
            match p.peek().token_type {
                TokenType::Delim('>') => {
                    p.next();
                    p.skip_whitespace();
                    Ok(Some(Combinator::Child))
                }
                TokenType::Delim('+') => {
                    p.next();
                    p.skip_whitespace();
                    Ok(Some(Combinator::NextSibling))
                }
                TokenType::Delim('~') => {
                    p.next();
                    p.skip_whitespace();
                    Ok(Some(Combinator::SubsequentSibling))
                }
                TokenType::Column => {
                    p.next();
                    p.skip_whitespace();
                    Ok(Some(Combinator::Column))
                }
                t if is_compound_boundary(&t) => {
                    p.reset(state);
                    Ok(None)
                }
                _ => Ok(Some(Combinator::Descendant)),
            }
        }
        TokenType::Delim('>') => {
            p.skip_whitespace();
            Ok(Some(Combinator::Child))
        }
        TokenType::Delim('+') => {
            p.skip_whitespace();
            Ok(Some(Combinator::NextSibling))
        }
        TokenType::Delim('~') => {
            p.skip_whitespace();
            Ok(Some(Combinator::SubsequentSibling))
        }
        TokenType::Column => {
            p.skip_whitespace();
            Ok(Some(Combinator::Column))
        }
        _ => {
            p.reset(state);
            Ok(None)
        }
    }
}

fn parse_compound_components(p: &mut Parser) -> PResult<SmallVec<[Component; 8]>> {
    let mut comps: SmallVec<[Component; 8]> = SmallVec::new();
    if let Some(c) = try_parse_type_or_universal(p)? {
        comps.push(c);
    }

    let mut seen_pseudo_element = false;
    loop {
        let raw = p.peek_including_whitespace();
        if is_compound_boundary(&raw.token_type) {
            break;
        }
        match raw.token_type {
            TokenType::Hash { is_id: true, .. } => {
                let tok = p.next();
                if let TokenType::Hash { value, .. } = tok.token_type {
                    comps.push(Component::Id(value));
                }
            }
            TokenType::Delim('.') => {
                p.next();
                let tok = p.next();
                match tok.token_type {
                    TokenType::Ident(s) => comps.push(Component::Class(s)),
                    _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
                }
            }
            TokenType::LBracket => comps.push(parse_attribute_selector(p)?),
            TokenType::Colon => comps.push(parse_pseudo(p, &mut seen_pseudo_element)?),
            TokenType::Delim('&') => {
                p.next();
                comps.push(Component::Nesting);
            }
            _ => break,
        }
    }
    Ok(comps)
}

fn parse_pseudo(p: &mut Parser, seen_pseudo_element: &mut bool) -> PResult<Component> {
    p.next(); // leading ':'
    let is_element = matches!(p.peek_including_whitespace().token_type, TokenType::Colon);
    if is_element {
        p.next();
    }
    let tok = p.next();
    match tok.token_type {
        TokenType::Ident(name) => {
            if is_element {
                *seen_pseudo_element = true;
                Ok(Component::PseudoElement(PseudoElement::Ident(name.to_ascii_lowercase())))
            } else if name.eq_ignore_ascii_case("before")
                || name.eq_ignore_ascii_case("after")
                || name.eq_ignore_ascii_case("first-line")
                || name.eq_ignore_ascii_case("first-letter")
            {
                // Legacy single-colon pseudo-elements.
                *seen_pseudo_element = true;
                Ok(Component::PseudoElement(PseudoElement::Ident(name.to_ascii_lowercase())))
            } else {
                Ok(Component::PseudoClass(PseudoClass::Ident(name.to_ascii_lowercase())))
            }
        }
        TokenType::Function(name) => {
            let comp = p.parse_until_after(Delimiters::CLOSE_PAREN, |p| {
                if is_element {
                    pseudo_element_with_args(&name, p).map(Component::PseudoElement)
                } else {
                    pseudo_class_with_args(&name, p).map(Component::PseudoClass)
                }
            })?;
            if is_element {
                *seen_pseudo_element = true;
            }
            Ok(comp)
        }
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

fn try_parse_type_or_universal(p: &mut Parser) -> PResult<Option<Component>> {
    let raw = p.peek_including_whitespace();
    match raw.token_type {
        TokenType::Delim('*') => {
            p.next();
            if matches!(p.peek_including_whitespace().token_type, TokenType::Delim('|')) {
                p.next();
                Ok(Some(parse_name_or_universal_after_prefix(p, NamespacePrefix::Any)?))
            } else {
                Ok(Some(Component::Universal(None)))
            }
        }
        TokenType::Delim('|') => {
            p.next();
            Ok(Some(parse_name_or_universal_after_prefix(p, NamespacePrefix::None)?))
        }
        TokenType::Ident(ref s) => {
            let s = s.clone();
            p.next();
            if matches!(p.peek_including_whitespace().token_type, TokenType::Delim('|')) {
                p.next();
                Ok(Some(parse_name_or_universal_after_prefix(p, NamespacePrefix::Named(s))?))
            } else {
                Ok(Some(Component::Type(QualName { prefix: None, local_name: s })))
            }
        }
        _ => Ok(None),
    }
}

fn parse_name_or_universal_after_prefix(p: &mut Parser, prefix: NamespacePrefix) -> PResult<Component> {
    let tok = p.next();
    match tok.token_type {
        TokenType::Delim('*') => Ok(Component::Universal(Some(prefix))),
        TokenType::Ident(s) => Ok(Component::Type(QualName { prefix: Some(prefix), local_name: s })),
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

fn parse_attribute_selector(p: &mut Parser) -> PResult<Component> {
    p.next(); // '['
    p.skip_whitespace();
    let name = parse_attr_qual_name(p)?;
    p.skip_whitespace();

    let op = match p.peek().token_type {
        TokenType::Delim('=') => Some(AttrMatchOp::Equal),
        TokenType::TildeMatch => Some(AttrMatchOp::Includes),
        TokenType::PipeMatch => Some(AttrMatchOp::DashMatch),
        TokenType::CaretMatch => Some(AttrMatchOp::Prefix),
        TokenType::DollarMatch => Some(AttrMatchOp::Suffix),
        TokenType::StarMatch => Some(AttrMatchOp::Substring),
        _ => None,
    };

    let matcher = if let Some(op) = op {
        p.next();
        p.skip_whitespace();
        let value_tok = p.next();
        let value = match value_tok.token_type {
            TokenType::QuotedString(s) => s,
            TokenType::Ident(s) => s,
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(value_tok.clone()), value_tok.location)),
        };
        p.skip_whitespace();
        let case = match p.peek().token_type {
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("i") => {
                p.next();
                AttrCaseSensitivity::AsciiCaseInsensitive
            }
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("s") => {
                p.next();
                AttrCaseSensitivity::Explicit
            }
            _ => AttrCaseSensitivity::CaseSensitive,
        };
        Some((op, value, case))
    } else {
        None
    };

    p.skip_whitespace();
    let close = p.next();
    if !matches!(close.token_type, TokenType::RBracket) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(close.clone()), close.location));
    }
    Ok(Component::Attribute(AttributeSelector { name, matcher }))
}

fn parse_attr_qual_name(p: &mut Parser) -> PResult<QualName> {
    let tok = p.next();
    match tok.token_type {
        TokenType::Delim('|') => {
            let next = p.next();
            match next.token_type {
                TokenType::Ident(s) => Ok(QualName { prefix: Some(NamespacePrefix::None), local_name: s }),
                _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(next.clone()), next.location)),
            }
        }
        TokenType::Delim('*') => {
            if matches!(p.peek().token_type, TokenType::Delim('|')) {
                p.next();
                let next = p.next();
                match next.token_type {
                    TokenType::Ident(s) => Ok(QualName { prefix: Some(NamespacePrefix::Any), local_name: s }),
                    _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(next.clone()), next.location)),
                }
            } else {
                Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location))
            }
        }
        TokenType::Ident(s) => {
            if matches!(p.peek().token_type, TokenType::Delim('|')) {
                p.next();
                let next = p.next();
                match next.token_type {
                    TokenType::Ident(local) => Ok(QualName { prefix: Some(NamespacePrefix::Named(s)), local_name: local }),
                    _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(next.clone()), next.location)),
                }
            } else {
                Ok(QualName { prefix: None, local_name: s })
            }
        }
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> SelectorList {
        let mut p = Parser::new(input, None);
        parse_selector_list(&mut p).unwrap()
    }

    #[test]
    fn type_class_id() {
        let list = parse("div.foo#bar");
        assert_eq!(
            list.0[0].components.as_slice(),
            &[
                Component::Type(QualName { prefix: None, local_name: "div".into() }),
                Component::Class("foo".into()),
                Component::Id("bar".into()),
            ]
        );
    }

    #[test]
    fn descendant_and_child_combinators() {
        let list = parse("a b > c");
        let combs: Vec<_> = list.0[0]
            .components
            .iter()
            .filter_map(|c| match c {
                Component::Combinator(cmb) => Some(*cmb),
                _ => None,
            })
            .collect();
        assert_eq!(combs, vec![Combinator::Descendant, Combinator::Child]);
    }

    #[test]
    fn attribute_selector_with_flag() {
        let list = parse("[data-x~=\"y\" i]");
        match &list.0[0].components[0] {
            Component::Attribute(attr) => {
                assert_eq!(attr.name.local_name, "data-x");
                let (op, value, case) = attr.matcher.as_ref().unwrap();
                assert_eq!(*op, AttrMatchOp::Includes);
                assert_eq!(value, "y");
                assert_eq!(*case, AttrCaseSensitivity::AsciiCaseInsensitive);
            }
            _ => panic!("expected attribute selector"),
        }
    }

    #[test]
    fn is_not_selector_lists() {
        let list = parse(":is(.a, .b):not(#c)");
        assert_eq!(list.0[0].components.len(), 2);
        match &list.0[0].components[0] {
            Component::PseudoClass(PseudoClass::Is(inner)) => assert_eq!(inner.0.len(), 2),
            _ => panic!("expected :is()"),
        }
    }

    #[test]
    fn nesting_ampersand() {
        let list = parse("&.foo");
        assert_eq!(list.0[0].components[0], Component::Nesting);
    }

    #[test]
    fn comma_separated_list() {
        let list = parse("a, b");
        assert_eq!(list.0.len(), 2);
    }
}
