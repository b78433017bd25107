//! At-rule classification and prelude/body grammars (spec §4.6 step 2).
//!
//! Every at-rule is first scoped to its prelude (the run up to the next
//! top-level `;` or `{`) without touching its body. From there the name
//! decides one of three shapes:
//!
//! - A statement (`@import`, `@namespace`, `@charset`, `@layer name;`,
//!   `@custom-media`): built directly from the prelude, no body.
//! - A fixed-shape block (`@font-face`, `@page`, `@keyframes`, …): its
//!   body is scanned once and parsed in a single bounded pass, producing
//!   a complete `Rule` — these never nest the unbounded grammar, so a
//!   full scan costs nothing asymptotically.
//! - A recursive container (`@media`, `@supports`, `@container`,
//!   `@scope`, `@layer { }`, `@starting-style`, `-moz-document`,
//!   `@nest`, and plain qualified rules handled by `block.rs` directly):
//!   only the prelude is parsed here; the body is left untouched for the
//!   caller's frame stack to walk token-by-token, so nesting depth is
//!   never pre-scanned and stack safety (spec §5) holds without the
//!   quadratic cost a naive "read the whole body first" approach would
//!   add at every nesting level.

use crate::error::{BasicParseErrorKind, Error, PResult};
use crate::parser::container::parse_container_query;
use crate::parser::cursor::{Delimiters, Parser};
use crate::parser::media::parse_media_query_list;
use crate::parser::rule::PendingDescriptor;
use crate::parser::selector::parse_selector_list;
use crate::parser::supports::parse_supports_condition;
use crate::parser::value::collect_value_tokens;
use crate::parser_config::ParserConfig;
use crate::selector::SelectorList;
use crate::stylesheet::{
    CounterStyleRule, CustomMediaRule, Declaration, FontFaceRule, FontFeatureValuesBlock, FontFeatureValuesRule, FontPaletteValuesRule,
    ImportLayer, ImportRule, Keyframe, KeyframeSelector, KeyframesRule, LayerStatementRule, NamespaceRule, PageMarginRule, PageRule,
    PropertyRule, Rule, UnknownAtRule, Value, VendorPrefix, ViewTransitionRule, ViewportRule,
};
use crate::location::Location;
use crate::tokenizer::{Token, TokenType};

/// What classifying and dispatching one at-rule produced.
pub enum Dispatch<X, T> {
    /// A statement-form rule, or `None` if it should be silently dropped
    /// (a stray `@charset` past the first rule).
    Statement(Option<Rule<X, T>>),
    /// Push this descriptor as a new frame; the caller's frame-stack loop
    /// parses the body itself.
    PushFrame(PendingDescriptor),
    /// A fixed-shape block-form rule, fully assembled.
    Complete(Rule<X, T>),
}

pub fn dispatch_at_rule<'a, X, T>(p: &mut Parser<'a>, name: &str, location: Location, config: &ParserConfig<X, T>) -> PResult<Dispatch<X, T>> {
    let lower = name.to_ascii_lowercase();
    let (prelude_start, terminator) = scan_prelude(p);

    match terminator {
        PreludeEnd::Semicolon(end) => {
            let prelude_text = p.tokenizer_mut().slice(prelude_start, end).to_string();
            advance_to_byte(p, end);
            p.next();
            dispatch_statement(&lower, &prelude_text, location, config)
        }
        PreludeEnd::Eof(end) => {
            let prelude_text = p.tokenizer_mut().slice(prelude_start, end).to_string();
            advance_to_byte(p, end);
            dispatch_statement(&lower, &prelude_text, location, config)
        }
        PreludeEnd::Curly(end) => {
            let prelude_text = p.tokenizer_mut().slice(prelude_start, end).to_string();
            advance_to_byte(p, end);
            p.next(); // consume '{'
            dispatch_block(p, &lower, &prelude_text, location, config)
        }
    }
}

fn dispatch_statement<X, T>(lower: &str, prelude_text: &str, location: Location, config: &ParserConfig<X, T>) -> PResult<Dispatch<X, T>> {
    if let Some(custom) = config.at_rule_parser {
        let mut sub = Parser::new(prelude_text, None);
        if let Some(result) = custom.parse_at_rule(lower, &mut sub, config.context) {
            return result.map(|x| Dispatch::Statement(Some(Rule::Custom(x))));
        }
    }
    statement_rule(lower, prelude_text, location)
}

fn dispatch_block<'a, X, T>(p: &mut Parser<'a>, lower: &str, prelude_text: &str, location: Location, config: &ParserConfig<X, T>) -> PResult<Dispatch<X, T>> {
    if let Some(custom) = config.at_rule_parser {
        let body_start = p.current_location().offset;
        let body_end = scan_block_body(p);
        let body_text = p.tokenizer_mut().slice(body_start, body_end).to_string();
        let prelude_tokens = collect_value_tokens(&mut Parser::new(prelude_text, None));
        let mut body_sub = Parser::new(&body_text, None);
        if let Some(result) = custom.parse_at_rule_block(lower, &prelude_tokens, &mut body_sub, config.context) {
            advance_to_byte(p, body_end);
            p.next();
            return result.map(|x| Dispatch::Complete(Rule::Custom(x)));
        }
        if is_recursive_container(lower) {
            return push_frame(lower, prelude_text, location);
        }
        advance_to_byte(p, body_end);
        p.next();
        return fixed_shape_rule(lower, prelude_text, &body_text, location);
    }

    if is_recursive_container(lower) {
        return push_frame(lower, prelude_text, location);
    }
    let body_start = p.current_location().offset;
    let body_end = scan_block_body(p);
    let body_text = p.tokenizer_mut().slice(body_start, body_end).to_string();
    advance_to_byte(p, body_end);
    p.next();
    fixed_shape_rule(lower, prelude_text, &body_text, location)
}

fn is_recursive_container(lower: &str) -> bool {
    matches!(lower, "media" | "supports" | "container" | "scope" | "layer" | "starting-style" | "-moz-document" | "nest")
}

enum PreludeEnd {
    Semicolon(usize),
    Curly(usize),
    Eof(usize),
}

/// Finds the byte span of one at-rule's prelude: the run up to (not
/// including) the next top-level `;` or `{`. `(`/`[` nesting is
/// transparent; `{` never is, since it is the signal the prelude ends —
/// unlike `Parser::parse_until_before`'s own delimiter search, which
/// treats every bracket kind as transparent and so cannot be reused here.
/// Non-destructive: the cursor is restored to its entry position.
fn scan_prelude(p: &mut Parser) -> (usize, PreludeEnd) {
    let start_state = p.state();
    let start_byte = p.current_location().offset;
    let mut depth: i32 = 0;
    let end;
    loop {
        let before = p.current_location().offset;
        let tok = p.next_including_whitespace();
        match tok.token_type {
            TokenType::Eof => {
                end = PreludeEnd::Eof(before);
                break;
            }
            TokenType::LParen | TokenType::LBracket => depth += 1,
            TokenType::RParen | TokenType::RBracket if depth > 0 => depth -= 1,
            TokenType::Semicolon if depth == 0 => {
                end = PreludeEnd::Semicolon(before);
                break;
            }
            TokenType::LCurly if depth == 0 => {
                end = PreludeEnd::Curly(before);
                break;
            }
            _ => {}
        }
    }
    p.reset(start_state);
    (start_byte, end)
}

/// Finds a block body's end byte (the position of its matching `}`),
/// assuming the opening `{` was already consumed. Non-destructive, same
/// as `scan_prelude`. Only called for fixed-shape bodies (never for a
/// recursive container, whose body is left for the frame stack).
fn scan_block_body(p: &mut Parser) -> usize {
    let state = p.state();
    let mut depth: i32 = 1;
    let end;
    loop {
        let before = p.current_location().offset;
        let tok = p.next_including_whitespace();
        match tok.token_type {
            TokenType::LCurly => depth += 1,
            TokenType::RCurly => {
                depth -= 1;
                if depth == 0 {
                    end = before;
                    break;
                }
            }
            TokenType::Eof => {
                end = before;
                break;
            }
            _ => {}
        }
    }
    p.reset(state);
    end
}

fn advance_to_byte(p: &mut Parser, byte: usize) {
    while p.current_location().offset < byte {
        p.next_including_whitespace();
    }
}

fn skip_past_semicolon(p: &mut Parser) {
    loop {
        match p.next().token_type {
            TokenType::Semicolon | TokenType::Eof => break,
            _ => {}
        }
    }
}

fn parse_bang_important(p: &mut Parser) -> bool {
    let state = p.state();
    p.skip_whitespace();
    if !matches!(p.peek().token_type, TokenType::Delim('!')) {
        p.reset(state);
        return false;
    }
    p.next();
    p.skip_whitespace();
    match p.next().token_type {
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("important") => true,
        _ => {
            p.reset(state);
            false
        }
    }
}

/// A flat `name: value [!important];` list with no typed-value facade —
/// used by the descriptor blocks (`@font-face`, `@page`, …) whose entries
/// are not necessarily real CSS properties (spec §1 leaves their own
/// grammars out of scope).
fn parse_plain_declarations<T>(body_text: &str) -> Vec<Declaration<T>> {
    let mut p = Parser::new(body_text, None);
    let mut decls = Vec::new();
    loop {
        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Eof => break,
            TokenType::Semicolon => {
                p.next();
            }
            TokenType::Ident(name) => {
                p.next();
                p.skip_whitespace();
                let colon = p.next();
                if !matches!(colon.token_type, TokenType::Colon) {
                    skip_past_semicolon(&mut p);
                    continue;
                }
                let location = p.current_location();
                let raw = p.parse_until_before(Delimiters::SEMICOLON, |p| -> PResult<Vec<Token>> { Ok(collect_value_tokens(p)) }).unwrap_or_default();
                let is_important = parse_bang_important(&mut p);
                decls.push(Declaration { name, value: Value::Unparsed(raw), is_important, location });
                skip_past_semicolon(&mut p);
            }
            _ => skip_past_semicolon(&mut p),
        }
    }
    decls
}

fn parse_in_sub<T>(text: &str, f: impl FnOnce(&mut Parser) -> PResult<T>) -> PResult<T> {
    let mut sub = Parser::new(text, None);
    sub.parse_entirely(f)
}

fn parse_single_layer_name(text: &str) -> Option<String> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    if p.is_exhausted() {
        return None;
    }
    let mut name = String::new();
    loop {
        match p.next().token_type {
            TokenType::Ident(s) => name.push_str(&s),
            TokenType::Delim('.') => name.push('.'),
            _ => break,
        }
    }
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn parse_dotted_name_required(p: &mut Parser) -> PResult<String> {
    p.skip_whitespace();
    let mut name = String::new();
    loop {
        let tok = p.next();
        match tok.token_type {
            TokenType::Ident(s) => name.push_str(&s),
            TokenType::Delim('.') => name.push('.'),
            TokenType::Eof => break,
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
        }
    }
    Ok(name)
}

// --- Recursive containers: prelude only, body left for the frame stack. ---

fn push_frame<X, T>(lower: &str, prelude_text: &str, location: Location) -> PResult<Dispatch<X, T>> {
    let descriptor = match lower {
        "media" => PendingDescriptor::Media { query: parse_in_sub(prelude_text, parse_media_query_list)?, location },
        "supports" => PendingDescriptor::Supports { condition: parse_in_sub(prelude_text, parse_supports_condition)?, location },
        "container" => {
            let (name, condition) = parse_in_sub(prelude_text, parse_container_query)?;
            PendingDescriptor::Container { name, condition, location }
        }
        "scope" => {
            let (start, end) = parse_scope_prelude(prelude_text)?;
            PendingDescriptor::Scope { start, end, location }
        }
        "layer" => PendingDescriptor::LayerBlock { name: parse_single_layer_name(prelude_text), location },
        "starting-style" => PendingDescriptor::StartingStyle { location },
        "-moz-document" => PendingDescriptor::MozDocument { prelude: collect_value_tokens(&mut Parser::new(prelude_text, None)), location },
        "nest" => PendingDescriptor::Nest { location },
        _ => unreachable!("push_frame is only called for recursive-container names"),
    };
    Ok(Dispatch::PushFrame(descriptor))
}

fn parse_scope_prelude(text: &str) -> PResult<(Option<SelectorList>, Option<SelectorList>)> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    let start = if matches!(p.peek().token_type, TokenType::LParen) {
        p.next();
        let list = p.parse_until_before(Delimiters::CLOSE_PAREN, parse_selector_list)?;
        p.skip_whitespace();
        expect_rparen(&mut p)?;
        Some(list)
    } else {
        None
    };
    p.skip_whitespace();
    let end = if matches!(p.peek().token_type, TokenType::Ident(ref s) if s.eq_ignore_ascii_case("to")) {
        p.next();
        p.skip_whitespace();
        let open = p.next();
        if !matches!(open.token_type, TokenType::LParen) {
            return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(open.clone()), open.location));
        }
        let list = p.parse_until_before(Delimiters::CLOSE_PAREN, parse_selector_list)?;
        p.skip_whitespace();
        expect_rparen(&mut p)?;
        Some(list)
    } else {
        None
    };
    Ok((start, end))
}

fn expect_rparen(p: &mut Parser) -> PResult<()> {
    let close = p.next();
    if !matches!(close.token_type, TokenType::RParen) {
        return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(close.clone()), close.location));
    }
    Ok(())
}

// --- Statement-form built-ins. ---

fn statement_rule<X, T>(lower: &str, prelude_text: &str, location: Location) -> PResult<Dispatch<X, T>> {
    let rule = match lower {
        "import" => Rule::Import(parse_import(prelude_text, location)?),
        "namespace" => Rule::Namespace(parse_namespace(prelude_text, location)?),
        "custom-media" => Rule::CustomMedia(parse_custom_media(prelude_text, location)?),
        "layer" => Rule::LayerStatement(parse_layer_statement(prelude_text, location)?),
        "charset" => return Ok(Dispatch::Statement(None)),
        _ => Rule::Unknown(UnknownAtRule {
            name: lower.to_string(),
            prelude: collect_value_tokens(&mut Parser::new(prelude_text, None)),
            block: None,
            location,
        }),
    };
    Ok(Dispatch::Statement(Some(rule)))
}

fn parse_import(text: &str, location: Location) -> PResult<ImportRule> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    let tok = p.next();
    let url = match tok.token_type {
        TokenType::QuotedString(s) => s,
        TokenType::Url(s) => s,
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    };
    p.skip_whitespace();

    // `layer` must precede `supports` in the prelude grammar (spec §9
    // open question, resolved in DESIGN.md).
    let layer = match p.peek().token_type {
        TokenType::Ident(ref s) if s.eq_ignore_ascii_case("layer") => {
            p.next();
            Some(ImportLayer::Anonymous)
        }
        TokenType::Function(ref s) if s.eq_ignore_ascii_case("layer") => {
            p.next();
            let name = p.parse_until_before(Delimiters::CLOSE_PAREN, parse_dotted_name_required)?;
            p.skip_whitespace();
            expect_rparen(&mut p)?;
            Some(ImportLayer::Named(name))
        }
        _ => None,
    };
    p.skip_whitespace();

    let supports = if matches!(p.peek().token_type, TokenType::Function(ref s) if s.eq_ignore_ascii_case("supports")) {
        p.next();
        let cond = p.parse_until_before(Delimiters::CLOSE_PAREN, parse_supports_condition)?;
        p.skip_whitespace();
        expect_rparen(&mut p)?;
        Some(cond)
    } else {
        None
    };
    p.skip_whitespace();

    let media = if !p.is_exhausted() { Some(p.parse_entirely(parse_media_query_list)?) } else { None };

    Ok(ImportRule { url, layer, supports, media, location })
}

fn parse_namespace(text: &str, location: Location) -> PResult<NamespaceRule> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    let tok = p.next();
    let (prefix, url_tok) = match tok.token_type {
        TokenType::Ident(s) => {
            p.skip_whitespace();
            (Some(s), p.next())
        }
        _ => (None, tok),
    };
    let url = match url_tok.token_type {
        TokenType::QuotedString(s) => s,
        TokenType::Url(s) => s,
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(url_tok.clone()), url_tok.location)),
    };
    Ok(NamespaceRule { prefix, url, location })
}

fn parse_custom_media(text: &str, location: Location) -> PResult<CustomMediaRule> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    let tok = p.next();
    let name = match tok.token_type {
        TokenType::Ident(s) if s.starts_with("--") => s,
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    };
    p.skip_whitespace();
    let media = p.parse_entirely(parse_media_query_list)?;
    Ok(CustomMediaRule { name, media, location })
}

fn parse_layer_statement(text: &str, location: Location) -> PResult<LayerStatementRule> {
    let mut p = Parser::new(text, None);
    let mut names = Vec::new();
    loop {
        p.skip_whitespace();
        if p.is_exhausted() {
            break;
        }
        let name = p.parse_until_before(Delimiters::COMMA, parse_dotted_name_required)?;
        names.push(name);
        p.skip_whitespace();
        if matches!(p.peek().token_type, TokenType::Comma) {
            p.next();
            continue;
        }
        break;
    }
    Ok(LayerStatementRule { names, location })
}

// --- Fixed-shape block-form built-ins: one bounded pass, never a frame. ---

fn fixed_shape_rule<X, T>(lower: &str, prelude_text: &str, body_text: &str, location: Location) -> PResult<Dispatch<X, T>> {
    let rule = match lower {
        "keyframes" | "-webkit-keyframes" | "-moz-keyframes" | "-o-keyframes" => {
            let vendor_prefix = match lower {
                "-webkit-keyframes" => Some(VendorPrefix::WebKit),
                "-moz-keyframes" => Some(VendorPrefix::Moz),
                "-o-keyframes" => Some(VendorPrefix::O),
                _ => None,
            };
            let name = parse_name_or_string(prelude_text)?;
            let keyframes = parse_keyframe_list(body_text);
            Rule::Keyframes(KeyframesRule { name, vendor_prefix, keyframes, location })
        }
        "font-face" => Rule::FontFace(FontFaceRule { declarations: parse_plain_declarations(body_text), location }),
        "font-palette-values" => Rule::FontPaletteValues(FontPaletteValuesRule {
            name: parse_name_or_string(prelude_text).unwrap_or_default(),
            declarations: parse_plain_declarations(body_text),
            location,
        }),
        "counter-style" => Rule::CounterStyle(CounterStyleRule {
            name: parse_name_or_string(prelude_text).unwrap_or_default(),
            declarations: parse_plain_declarations(body_text),
            location,
        }),
        "page" => Rule::Page(parse_page(prelude_text, body_text, location)?),
        "property" => Rule::Property(parse_property(prelude_text, body_text, location)?),
        "viewport" | "-ms-viewport" => Rule::Viewport(ViewportRule { declarations: parse_plain_declarations(body_text), location }),
        "view-transition" => Rule::ViewTransition(ViewTransitionRule { declarations: parse_plain_declarations(body_text), location }),
        "font-feature-values" => Rule::FontFeatureValues(parse_font_feature_values(prelude_text, body_text, location)?),
        _ => Rule::Unknown(UnknownAtRule {
            name: lower.to_string(),
            prelude: collect_value_tokens(&mut Parser::new(prelude_text, None)),
            block: Some(collect_value_tokens(&mut Parser::new(body_text, None))),
            location,
        }),
    };
    Ok(Dispatch::Complete(rule))
}

fn parse_name_or_string(text: &str) -> PResult<String> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    let tok = p.next();
    match tok.token_type {
        TokenType::Ident(s) => Ok(s),
        TokenType::QuotedString(s) => Ok(s),
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

fn parse_keyframe_list<T>(body_text: &str) -> Vec<Keyframe<T>> {
    let mut p = Parser::new(body_text, None);
    let mut keyframes = Vec::new();
    loop {
        p.skip_whitespace();
        if matches!(p.peek().token_type, TokenType::Eof) {
            break;
        }
        match parse_keyframe_selectors(&mut p) {
            Ok(selectors) => {
                p.skip_whitespace();
                if !matches!(p.peek().token_type, TokenType::LCurly) {
                    skip_past_semicolon(&mut p);
                    continue;
                }
                p.next();
                let location = p.current_location();
                let block_start = p.current_location().offset;
                let block_end = scan_block_body(&mut p);
                let block_text = p.tokenizer_mut().slice(block_start, block_end).to_string();
                advance_to_byte(&mut p, block_end);
                p.next();
                keyframes.push(Keyframe { selectors, declarations: parse_plain_declarations(&block_text), location });
            }
            Err(_) => skip_past_semicolon(&mut p),
        }
    }
    keyframes
}

fn parse_keyframe_selectors(p: &mut Parser) -> PResult<Vec<KeyframeSelector>> {
    let mut out = Vec::new();
    loop {
        p.skip_whitespace();
        let tok = p.next();
        let sel = match tok.token_type {
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("from") => KeyframeSelector { percentage: 0.0, written_as_from: true, written_as_to: false },
            TokenType::Ident(ref s) if s.eq_ignore_ascii_case("to") => KeyframeSelector { percentage: 100.0, written_as_from: false, written_as_to: true },
            TokenType::Percentage { value, .. } => KeyframeSelector { percentage: value, written_as_from: false, written_as_to: false },
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
        };
        out.push(sel);
        p.skip_whitespace();
        if matches!(p.peek().token_type, TokenType::Comma) {
            p.next();
            continue;
        }
        break;
    }
    Ok(out)
}

fn parse_page<T>(prelude_text: &str, body_text: &str, location: Location) -> PResult<PageRule<T>> {
    let selector = parse_page_selector(prelude_text)?;
    let (declarations, margin_rules) = parse_page_body(body_text);
    Ok(PageRule { selector, declarations, margin_rules, location })
}

fn parse_page_selector(text: &str) -> PResult<Option<String>> {
    let mut p = Parser::new(text, None);
    p.skip_whitespace();
    if p.is_exhausted() {
        return Ok(None);
    }
    let mut s = String::new();
    loop {
        let tok = p.next();
        match tok.token_type {
            TokenType::Eof => break,
            TokenType::Ident(v) => s.push_str(&v),
            TokenType::Colon => s.push(':'),
            _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
        }
    }
    Ok(if s.is_empty() { None } else { Some(s) })
}

fn parse_page_body<T>(body_text: &str) -> (Vec<Declaration<T>>, Vec<PageMarginRule<T>>) {
    let mut p = Parser::new(body_text, None);
    let mut declarations = Vec::new();
    let mut margins = Vec::new();
    loop {
        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Eof => break,
            TokenType::Semicolon => {
                p.next();
            }
            TokenType::AtKeyword(name) => {
                p.next();
                p.skip_whitespace();
                if matches!(p.peek().token_type, TokenType::LCurly) {
                    p.next();
                    let start = p.current_location().offset;
                    let end = scan_block_body(&mut p);
                    let text = p.tokenizer_mut().slice(start, end).to_string();
                    advance_to_byte(&mut p, end);
                    p.next();
                    margins.push(PageMarginRule { name, declarations: parse_plain_declarations(&text) });
                } else {
                    skip_past_semicolon(&mut p);
                }
            }
            TokenType::Ident(name) => {
                p.next();
                p.skip_whitespace();
                let colon = p.next();
                if !matches!(colon.token_type, TokenType::Colon) {
                    skip_past_semicolon(&mut p);
                    continue;
                }
                let location = p.current_location();
                let raw = p.parse_until_before(Delimiters::SEMICOLON, |p| -> PResult<Vec<Token>> { Ok(collect_value_tokens(p)) }).unwrap_or_default();
                let is_important = parse_bang_important(&mut p);
                declarations.push(Declaration { name, value: Value::Unparsed(raw), is_important, location });
                skip_past_semicolon(&mut p);
            }
            _ => skip_past_semicolon(&mut p),
        }
    }
    (declarations, margins)
}

fn parse_property(name_prelude: &str, body_text: &str, location: Location) -> PResult<PropertyRule> {
    let mut p = Parser::new(name_prelude, None);
    p.skip_whitespace();
    let tok = p.next();
    let name = match tok.token_type {
        TokenType::Ident(s) if s.starts_with("--") => s,
        _ => return Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    };

    let mut syntax = None;
    let mut inherits = None;
    let mut initial_value = None;

    let mut bp = Parser::new(body_text, None);
    loop {
        bp.skip_whitespace();
        match bp.peek().token_type {
            TokenType::Eof => break,
            TokenType::Semicolon => {
                bp.next();
            }
            TokenType::Ident(descriptor) => {
                bp.next();
                bp.skip_whitespace();
                let colon = bp.next();
                if !matches!(colon.token_type, TokenType::Colon) {
                    skip_past_semicolon(&mut bp);
                    continue;
                }
                bp.skip_whitespace();
                match descriptor.to_ascii_lowercase().as_str() {
                    "syntax" => {
                        if let TokenType::QuotedString(s) = bp.next().token_type {
                            syntax = Some(s);
                        }
                    }
                    "inherits" => {
                        if let TokenType::Ident(s) = bp.next().token_type {
                            inherits = Some(s.eq_ignore_ascii_case("true"));
                        }
                    }
                    "initial-value" => {
                        initial_value = Some(bp.parse_until_before(Delimiters::SEMICOLON, |p| -> PResult<Vec<Token>> { Ok(collect_value_tokens(p)) }).unwrap_or_default());
                    }
                    _ => {}
                }
                skip_past_semicolon(&mut bp);
            }
            _ => skip_past_semicolon(&mut bp),
        }
    }

    Ok(PropertyRule { name, syntax, inherits, initial_value, location })
}

fn parse_font_feature_values<T>(prelude_text: &str, body_text: &str, location: Location) -> PResult<FontFeatureValuesRule<T>> {
    let families = parse_family_list(prelude_text)?;
    let blocks = parse_ffv_blocks(body_text);
    Ok(FontFeatureValuesRule { families, blocks, location })
}

fn parse_family_list(text: &str) -> PResult<Vec<String>> {
    let mut p = Parser::new(text, None);
    let mut names = Vec::new();
    loop {
        p.skip_whitespace();
        if p.is_exhausted() {
            break;
        }
        let name = p.parse_until_before(Delimiters::COMMA, parse_family_name)?;
        names.push(name);
        p.skip_whitespace();
        if matches!(p.peek().token_type, TokenType::Comma) {
            p.next();
            continue;
        }
        break;
    }
    Ok(names)
}

fn parse_family_name(p: &mut Parser) -> PResult<String> {
    p.skip_whitespace();
    let tok = p.next();
    match tok.token_type {
        TokenType::QuotedString(s) => Ok(s),
        TokenType::Ident(first) => {
            let mut name = first;
            loop {
                p.skip_whitespace();
                if !matches!(p.peek().token_type, TokenType::Ident(_)) {
                    break;
                }
                if let TokenType::Ident(s) = p.next().token_type {
                    name.push(' ');
                    name.push_str(&s);
                }
            }
            Ok(name)
        }
        _ => Err(Error::basic(BasicParseErrorKind::UnexpectedToken(tok.clone()), tok.location)),
    }
}

fn parse_ffv_blocks<T>(body_text: &str) -> Vec<FontFeatureValuesBlock<T>> {
    let mut p = Parser::new(body_text, None);
    let mut blocks = Vec::new();
    loop {
        p.skip_whitespace();
        match p.peek().token_type {
            TokenType::Eof => break,
            TokenType::AtKeyword(name) => {
                p.next();
                p.skip_whitespace();
                if matches!(p.peek().token_type, TokenType::LCurly) {
                    p.next();
                    let start = p.current_location().offset;
                    let end = scan_block_body(&mut p);
                    let text = p.tokenizer_mut().slice(start, end).to_string();
                    advance_to_byte(&mut p, end);
                    p.next();
                    blocks.push(FontFeatureValuesBlock { name, declarations: parse_plain_declarations(&text) });
                } else {
                    skip_past_semicolon(&mut p);
                }
            }
            _ => skip_past_semicolon(&mut p),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_config::Context;
    use std::convert::Infallible;

    fn dispatch(prelude_and_body: &str, name: &str) -> Dispatch<Infallible, Infallible> {
        let mut p = Parser::new(prelude_and_body, None);
        let config: ParserConfig<Infallible, Infallible> = ParserConfig::new(Context::AtRule);
        dispatch_at_rule(&mut p, name, Location::start(None), &config).unwrap()
    }

    #[test]
    fn media_prelude_pushes_a_frame_without_touching_the_body() {
        match dispatch(" (min-width: 1px) { a { color: red } }", "media") {
            Dispatch::PushFrame(PendingDescriptor::Media { query, .. }) => assert_eq!(query.0.len(), 1),
            _ => panic!("expected a pushed Media frame"),
        }
    }

    #[test]
    fn import_statement_with_layer_and_supports() {
        match dispatch(" url(foo.css) layer supports(display: grid) screen;", "import") {
            Dispatch::Statement(Some(Rule::Import(rule))) => {
                assert_eq!(rule.url, "foo.css");
                assert!(matches!(rule.layer, Some(ImportLayer::Anonymous)));
                assert!(rule.supports.is_some());
                assert!(rule.media.is_some());
            }
            _ => panic!("expected an Import statement"),
        }
    }

    #[test]
    fn keyframes_rule_parses_percentages_and_from_to() {
        match dispatch(" bounce { from { top: 0px; } 50% { top: 50px; } to { top: 100px; } }", "keyframes") {
            Dispatch::Complete(Rule::Keyframes(rule)) => {
                assert_eq!(rule.name, "bounce");
                assert_eq!(rule.keyframes.len(), 3);
                assert!(rule.keyframes[0].selectors[0].written_as_from);
                assert_eq!(rule.keyframes[1].selectors[0].percentage, 50.0);
            }
            _ => panic!("expected a Keyframes rule"),
        }
    }

    #[test]
    fn property_rule_parses_descriptors() {
        match dispatch(" --accent { syntax: \"<color>\"; inherits: false; initial-value: blue; }", "property") {
            Dispatch::Complete(Rule::Property(rule)) => {
                assert_eq!(rule.name, "--accent");
                assert_eq!(rule.syntax.as_deref(), Some("<color>"));
                assert_eq!(rule.inherits, Some(false));
                assert!(rule.initial_value.is_some());
            }
            _ => panic!("expected a Property rule"),
        }
    }

    #[test]
    fn unknown_at_rule_is_preserved_verbatim() {
        match dispatch(" some prelude { weird: tokens; }", "totally-unknown") {
            Dispatch::Complete(Rule::Unknown(rule)) => {
                assert_eq!(rule.name, "totally-unknown");
                assert!(rule.block.is_some());
            }
            _ => panic!("expected an Unknown rule"),
        }
    }

    #[test]
    fn scope_rule_parses_start_and_end_selectors() {
        match dispatch(" (.card) to (.footer) { }", "scope") {
            Dispatch::PushFrame(PendingDescriptor::Scope { start, end, .. }) => {
                assert!(start.is_some());
                assert!(end.is_some());
            }
            _ => panic!("expected a pushed Scope frame"),
        }
    }
}
