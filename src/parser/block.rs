//! Block-body parsing (spec §4.6 step 4): the hardest subsystem. A block
//! body is a mixed sequence of declarations and nested rules (CSS
//! Nesting). Parsed with one explicit frame stack — pushing on every
//! opening `{` that starts a recursively-nesting construct (a style rule,
//! `@media`, `@supports`, …) and popping on its matching `}` — so a
//! stylesheet with a million levels of `@media` nesting parses with flat
//! (non-recursive) call-stack usage, per spec §5's stack-safety clause.
//!
//! Fixed-shape bodies (`@font-face`, `@page`, `@keyframes`, …) never push
//! a frame here — `at_rule.rs` parses them to a complete `Rule` in one
//! pass, since their own body cannot recursively contain more of this
//! grammar.

use crate::error::{BasicParseErrorKind, Error, ErrorChannel, PResult};
use crate::parser::at_rule::{dispatch_at_rule, Dispatch};
use crate::parser::cursor::{Delimiters, Parser};
use crate::parser::rule::{assemble, PendingDescriptor};
use crate::parser::selector::parse_selector_list;
use crate::parser::value::{collect_value_tokens, parse_declaration_value};
use crate::parser_config::ParserConfig;
use crate::stylesheet::{Declaration, Rule, Value, VendorPrefix};
use crate::tokenizer::TokenType;

struct Frame<X, T> {
    descriptor: PendingDescriptor,
    declarations: Vec<Declaration<T>>,
    rules: Vec<Rule<X, T>>,
}

impl<X, T> Frame<X, T> {
    fn new(descriptor: PendingDescriptor) -> Self {
        Frame { descriptor, declarations: Vec::new(), rules: Vec::new() }
    }
}

/// Runs the whole stylesheet loop (spec §4.6 step 1) plus every nested
/// block body underneath it, in one explicit-stack pass.
pub fn parse_stylesheet_rules<X, T>(p: &mut Parser, config: &ParserConfig<X, T>, errors: &mut ErrorChannel) -> Vec<Rule<X, T>> {
    let mut stack: Vec<Frame<X, T>> = vec![Frame::new(PendingDescriptor::TopLevel)];
    let mut charset_allowed = true;

    loop {
        if stack.len() == 1 {
            skip_cdo_cdc_and_whitespace(p);
        } else {
            p.skip_whitespace();
        }

        let tok = p.peek();
        match tok.token_type {
            TokenType::Eof => {
                while stack.len() > 1 {
                    log::debug!("implicit close at EOF, {} frame(s) remaining", stack.len() - 1);
                    let frame = stack.pop().unwrap();
                    let rule = assemble(frame.descriptor, frame.declarations, frame.rules);
                    stack.last_mut().unwrap().rules.push(rule);
                }
                break;
            }
            TokenType::RCurly => {
                p.next();
                if stack.len() > 1 {
                    log::debug!("block-frame pop, depth now {}", stack.len() - 1);
                    let frame = stack.pop().unwrap();
                    let rule = assemble(frame.descriptor, frame.declarations, frame.rules);
                    stack.last_mut().unwrap().rules.push(rule);
                }
                // A stray `}` at the top level is simply consumed (spec
                // §4.1's StrayCloseCurly, absorbed here rather than at the
                // tokenizer boundary).
            }
            TokenType::Semicolon => {
                p.next();
            }
            TokenType::AtKeyword(name) => {
                p.next();
                let location = tok.location.clone();
                charset_allowed = handle_at_keyword(p, name, location, charset_allowed, stack.len() == 1, &mut stack, config, errors);
            }
            _ => {
                charset_allowed = false;
                handle_declaration_or_qualified(p, &mut stack, config, errors);
            }
        }
    }

    stack.pop().unwrap().rules
}

fn skip_cdo_cdc_and_whitespace(p: &mut Parser) {
    loop {
        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Cdo | TokenType::Cdc => {
                p.next();
            }
            _ => break,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_at_keyword<X, T>(
    p: &mut Parser,
    name: String,
    location: crate::location::Location,
    charset_allowed: bool,
    is_top_level: bool,
    stack: &mut Vec<Frame<X, T>>,
    config: &ParserConfig<X, T>,
    errors: &mut ErrorChannel,
) -> bool {
    if charset_allowed && is_top_level && name.eq_ignore_ascii_case("charset") {
        let _: PResult<()> = p.parse_until_after(Delimiters::SEMICOLON, |p| {
            while !matches!(p.next().token_type, TokenType::Eof) {}
            Ok(())
        });
        return false;
    }

    match dispatch_at_rule(p, &name, location.clone(), config) {
        Ok(Dispatch::Statement(rule)) => {
            if let Some(r) = rule {
                stack.last_mut().unwrap().rules.push(r);
            }
        }
        Ok(Dispatch::PushFrame(descriptor)) => {
            stack.push(Frame::new(descriptor));
        }
        Ok(Dispatch::Complete(rule)) => {
            stack.last_mut().unwrap().rules.push(rule);
        }
        Err(e) => {
            errors.record(location, format!("{}", e.kind), None);
        }
    }
    false
}

fn handle_declaration_or_qualified<X, T>(p: &mut Parser, stack: &mut Vec<Frame<X, T>>, config: &ParserConfig<X, T>, errors: &mut ErrorChannel) {
    let state = p.state();
    let tok = p.peek();
    if let TokenType::Ident(name) = tok.token_type.clone() {
        match try_parse_declaration::<T>(p, &name, config) {
            Ok(decl) => {
                stack.last_mut().unwrap().declarations.push(decl);
                return;
            }
            Err(_) => {
                p.reset(state);
            }
        }
    }

    match parse_selector_list(p) {
        Ok(selectors) if matches!(p.peek().token_type, TokenType::LCurly) => {
            let location = p.current_location();
            p.next();
            stack.push(Frame::new(PendingDescriptor::Style { selectors, location }));
        }
        _ => {
            p.reset(state);
            let location = p.current_location();
            errors.record(location, "invalid declaration or qualified rule", None);
            skip_to_next_boundary(p);
        }
    }
}

/// Tries the declaration path for one ident (spec §4.6 step 4, "Ident
/// token"): `name : value [!important] (;|}|EOF)`. Must fail and leave the
/// cursor untouched if it runs into `{` — that signals a qualified rule
/// whose selector starts with this ident (e.g. `a:hover { … }`).
fn try_parse_declaration<T>(p: &mut Parser, name: &str, config: &ParserConfig<impl Sized, T>) -> PResult<Declaration<T>> {
    p.next(); // the ident
    p.skip_whitespace();
    let colon = p.next();
    if !matches!(colon.token_type, TokenType::Colon) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(colon.clone()), colon.location));
    }
    let location = p.current_location();

    if let Some(custom) = config.at_rule_parser {
        if let Some(result) = custom.parse_declaration(name, p, config.context) {
            return result;
        }
    }

    let raw = p.parse_until_before(Delimiters::SEMICOLON | Delimiters::CURLY_BRACE | Delimiters::BANG, |p| Ok(collect_value_tokens(p)))?;
    if raw.iter().any(|t| matches!(t.token_type, TokenType::LCurly)) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(colon), location));
    }

    let is_important = parse_optional_important(p)?;

    let (start_byte, end_byte) = match (raw.first(), raw.last()) {
        (Some(first), Some(last)) => (first.start_byte, last.end_byte),
        _ => (p.current_location().offset, p.current_location().offset),
    };
    let source_text = p.tokenizer_mut().slice(start_byte, end_byte);

    let value = if name.starts_with("--") {
        // Custom properties are always verbatim (spec §4.6 step 5).
        Value::Unparsed(raw)
    } else {
        let prefix = vendor_prefix_of(name);
        parse_declaration_value(name, prefix, raw, source_text, config.property_parser)
    };

    Ok(Declaration { name: name.to_string(), value, is_important, location })
}

fn parse_optional_important(p: &mut Parser) -> PResult<bool> {
    let state = p.state();
    p.skip_whitespace();
    if !matches!(p.peek().token_type, TokenType::Delim('!')) {
        p.reset(state);
        return Ok(false);
    }
    p.next();
    p.skip_whitespace();
    match p.next().token_type {
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("important") => Ok(true),
        _ => {
            p.reset(state);
            Ok(false)
        }
    }
}

fn vendor_prefix_of(name: &str) -> Option<VendorPrefix> {
    if name.starts_with("-webkit-") {
        Some(VendorPrefix::WebKit)
    } else if name.starts_with("-moz-") {
        Some(VendorPrefix::Moz)
    } else if name.starts_with("-ms-") {
        Some(VendorPrefix::Ms)
    } else if name.starts_with("-o-") {
        Some(VendorPrefix::O)
    } else {
        None
    }
}

/// Error recovery (spec §4.11): consume through the next top-level `;` or
/// matching `}`, so the enclosing rule survives.
fn skip_to_next_boundary(p: &mut Parser) {
    loop {
        let tok = p.next();
        match tok.token_type {
            TokenType::Semicolon | TokenType::Eof => break,
            TokenType::LCurly => {
                p.finish_nested_block(crate::parser::cursor::BlockType::Curly);
                break;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_config::Context;

    fn run(input: &str) -> (Vec<Rule<std::convert::Infallible, std::convert::Infallible>>, ErrorChannel) {
        let mut p = Parser::new(input, None);
        let config: ParserConfig<std::convert::Infallible, std::convert::Infallible> = ParserConfig::new(Context::Stylesheet);
        let mut errors = ErrorChannel::new();
        let rules = parse_stylesheet_rules(&mut p, &config, &mut errors);
        (rules, errors)
    }

    #[test]
    fn simple_style_rule() {
        let (rules, errors) = run("div.foo { color: red; }");
        assert!(errors.is_empty());
        assert_eq!(rules.len(), 1);
        match &rules[0] {
            Rule::Style(s) => assert_eq!(s.declarations.len(), 1),
            _ => panic!("expected a style rule"),
        }
    }

    #[test]
    fn charset_is_swallowed_first() {
        let (rules, _) = run("@charset \"utf-8\"; div { }");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn nested_media_does_not_overflow() {
        let mut input = String::new();
        for _ in 0..5000 {
            input.push_str("@media (min-width: 1px) {");
        }
        input.push_str("a { color: red; }");
        for _ in 0..5000 {
            input.push('}');
        }
        let (rules, _) = run(&input);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn invalid_declaration_is_skipped_rule_survives() {
        let (rules, errors) = run("div { color red; width: 1px; }");
        assert_eq!(rules.len(), 1);
        assert!(!errors.is_empty());
        match &rules[0] {
            Rule::Style(s) => assert_eq!(s.declarations.len(), 1),
            _ => panic!("expected a style rule"),
        }
    }
}
