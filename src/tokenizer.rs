//! CSS Syntax Level 3 tokenizer.
//!
//! Operates over decoded `char`s rather than the original input's raw bytes
//! — accepting `&str` means the "invalid UTF-8 tolerated as name code
//! points" clause of the input contract is delegated to the caller, who
//! must already have lossily decoded (or validated) their bytes before
//! handing us a `&str`. Everything else in this module follows the byte
//! offsets, line/column tracking and error-token behaviour of CSS Syntax
//! Level 3 §4.3.

use crate::location::{utf16_len, Location};
use crate::unicode::{is_name, is_name_start, is_non_printable, UnicodeChar};
use std::rc::Rc;

pub type CssNumber = f64;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenType {
    Ident(String),
    Function(String),
    AtKeyword(String),
    Hash { value: String, is_id: bool },
    QuotedString(String),
    BadString,
    Url(String),
    BadUrl,
    Delim(char),
    Number { value: CssNumber, int_value: Option<i32>, repr: String },
    Percentage { value: CssNumber, repr: String },
    Dimension { value: CssNumber, int_value: Option<i32>, repr: String, unit: String },
    UnicodeRange { start: u32, end: u32 },
    Whitespace,
    Comment(String),
    Colon,
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LCurly,
    RCurly,
    /// `~=`
    TildeMatch,
    /// `|=`
    PipeMatch,
    /// `^=`
    CaretMatch,
    /// `$=`
    DollarMatch,
    /// `*=`
    StarMatch,
    /// `||`
    Column,
    Cdo,
    Cdc,
    /// A stray `)`, `]` or `}` with no matching opener at the tokenizer
    /// level. The parser decides whether this is an error (inside a
    /// nested context) or benign (at block-body level).
    StrayCloseParen,
    StrayCloseBracket,
    StrayCloseCurly,
    EofInString,
    EofInUrl,
    Eof,
}

impl TokenType {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TokenType::BadString
                | TokenType::BadUrl
                | TokenType::EofInString
                | TokenType::EofInUrl
                | TokenType::StrayCloseParen
                | TokenType::StrayCloseBracket
                | TokenType::StrayCloseCurly
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    /// Half-open byte range `[start, end)` into the original input.
    pub start_byte: usize,
    pub end_byte: usize,
    pub location: Location,
}

impl Token {
    pub fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.token_type, TokenType::Comment(_))
    }

    pub fn is_ident(&self) -> bool {
        matches!(self.token_type, TokenType::Ident(_))
    }

    pub fn ident_value(&self) -> Option<&str> {
        match &self.token_type {
            TokenType::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_delim(&self, c: char) -> bool {
        matches!(self.token_type, TokenType::Delim(d) if d == c)
    }
}

/// The `sourceMappingURL`/`sourceURL` pragma latched from comments, last
/// occurrence wins (spec §4.1).
#[derive(Clone, Debug, Default)]
pub struct SourceMapPragma {
    pub source_mapping_url: Option<String>,
    pub source_url: Option<String>,
}

/// O(1)-saveable cursor snapshot (spec §4.1 `ParserState`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerState {
    pub pos: usize,
    pub line: u32,
    pub column: u32,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<char>,
    /// `byte_offsets[i]` is the byte offset of `chars[i]`; one extra
    /// trailing entry equal to `input.len()`.
    byte_offsets: Vec<usize>,
    pos: usize,
    line: u32,
    column: u32,
    source: Option<Rc<str>>,
    pub pragma: SourceMapPragma,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str, source: Option<Rc<str>>) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut byte_offsets = Vec::with_capacity(input.len() + 1);
        for (idx, ch) in input.char_indices() {
            chars.push(ch);
            byte_offsets.push(idx);
        }
        byte_offsets.push(input.len());

        Tokenizer {
            input,
            chars,
            byte_offsets,
            pos: 0,
            line: 1,
            column: 1,
            source,
            pragma: SourceMapPragma::default(),
        }
    }

    pub fn state(&self) -> TokenizerState {
        TokenizerState {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn reset(&mut self, state: TokenizerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.column = state.column;
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn tell_byte(&self) -> usize {
        self.byte_offsets[self.pos]
    }

    pub fn current_location(&self) -> Location {
        Location::new(self.line, self.column, self.tell_byte(), self.source.clone())
    }

    pub fn slice(&self, start_byte: usize, end_byte: usize) -> &'a str {
        &self.input[start_byte..end_byte]
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                // \r\n counts as a single newline; only bump the line here
                // if this \r is not immediately followed by \n (that case
                // is handled by treating \r\n as already consumed below in
                // callers that normalize newlines before counting).
                if self.peek_char(0) == Some('\n') {
                    // Swallow the \n here so it doesn't count twice.
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 1;
            }
            '\x0C' => {
                self.line += 1;
                self.column = 1;
            }
            _ => {
                self.column += utf16_len(c);
            }
        }
        Some(c)
    }

    /// Consume the next significant token (whitespace/comments folded in,
    /// separate token kinds).
    pub fn next_token(&mut self) -> Token {
        let start_byte = self.tell_byte();
        let loc = self.current_location();

        let Some(c) = self.peek_char(0) else {
            return Token {
                token_type: TokenType::Eof,
                start_byte,
                end_byte: start_byte,
                location: loc,
            };
        };

        let token_type = match c {
            '/' if self.peek_char(1) == Some('*') => self.consume_comment(),
            c if c.is_whitespace() => self.consume_whitespace(),
            '"' | '\'' => self.consume_string(c),
            '#' => self.consume_hash(),
            '(' => {
                self.advance();
                TokenType::LParen
            }
            ')' => {
                self.advance();
                TokenType::RParen
            }
            '[' => {
                self.advance();
                TokenType::LBracket
            }
            ']' => {
                self.advance();
                TokenType::RBracket
            }
            '{' => {
                self.advance();
                TokenType::LCurly
            }
            '}' => {
                self.advance();
                TokenType::RCurly
            }
            ',' => {
                self.advance();
                TokenType::Comma
            }
            ':' => {
                self.advance();
                TokenType::Colon
            }
            ';' => {
                self.advance();
                TokenType::Semicolon
            }
            '+' if self.starts_number() => self.consume_numeric(),
            '-' if self.starts_cdc() => {
                self.advance();
                self.advance();
                self.advance();
                TokenType::Cdc
            }
            '-' if self.starts_number() => self.consume_numeric(),
            '-' if self.starts_identifier() => self.consume_ident_like(),
            '.' if self.starts_number() => self.consume_numeric(),
            '<' if self.starts_cdo() => {
                self.advance();
                self.advance();
                self.advance();
                self.advance();
                TokenType::Cdo
            }
            '~' if self.peek_char(1) == Some('=') => {
                self.advance();
                self.advance();
                TokenType::TildeMatch
            }
            '^' if self.peek_char(1) == Some('=') => {
                self.advance();
                self.advance();
                TokenType::CaretMatch
            }
            '$' if self.peek_char(1) == Some('=') => {
                self.advance();
                self.advance();
                TokenType::DollarMatch
            }
            '*' if self.peek_char(1) == Some('=') => {
                self.advance();
                self.advance();
                TokenType::StarMatch
            }
            '|' if self.peek_char(1) == Some('=') => {
                self.advance();
                self.advance();
                TokenType::PipeMatch
            }
            '|' if self.peek_char(1) == Some('|') => {
                self.advance();
                self.advance();
                TokenType::Column
            }
            '@' => self.consume_at_keyword(),
            'u' | 'U' if self.starts_unicode_range() => self.consume_unicode_range(),
            c if c.is_ascii_digit() => self.consume_numeric(),
            c if is_name_start(c) => self.consume_ident_like(),
            '\\' if self.starts_escape() => self.consume_ident_like(),
            _ => {
                self.advance();
                match c {
                    ')' => TokenType::StrayCloseParen,
                    ']' => TokenType::StrayCloseBracket,
                    '}' => TokenType::StrayCloseCurly,
                    _ => TokenType::Delim(c),
                }
            }
        };

        let end_byte = self.tell_byte();
        Token {
            token_type,
            start_byte,
            end_byte,
            location: loc,
        }
    }

    fn starts_number(&self) -> bool {
        let (mut i, c0) = match self.peek_char(0) {
            Some(c) => (0usize, c),
            None => return false,
        };
        if c0 == '+' || c0 == '-' {
            i += 1;
        }
        match (self.peek_char(i), self.peek_char(i + 1)) {
            (Some(d), _) if d.is_ascii_digit() => true,
            (Some('.'), Some(d)) if d.is_ascii_digit() => true,
            _ => false,
        }
    }

    fn starts_identifier(&self) -> bool {
        match self.peek_char(0) {
            Some('-') => match self.peek_char(1) {
                Some(c) if is_name_start(c) || c == '-' => true,
                Some('\\') => self.escape_valid_at(1),
                _ => false,
            },
            Some(c) if is_name_start(c) => true,
            Some('\\') => self.escape_valid_at(0),
            _ => false,
        }
    }

    fn starts_escape(&self) -> bool {
        self.escape_valid_at(0)
    }

    fn escape_valid_at(&self, offset: usize) -> bool {
        self.peek_char(offset) == Some('\\') && self.peek_char(offset + 1) != Some('\n') && self.peek_char(offset + 1).is_some()
    }

    fn starts_cdo(&self) -> bool {
        self.peek_char(0) == Some('<')
            && self.peek_char(1) == Some('!')
            && self.peek_char(2) == Some('-')
            && self.peek_char(3) == Some('-')
    }

    fn starts_cdc(&self) -> bool {
        self.peek_char(0) == Some('-') && self.peek_char(1) == Some('-') && self.peek_char(2) == Some('>')
    }

    fn starts_unicode_range(&self) -> bool {
        if !matches!(self.peek_char(0), Some('u') | Some('U')) {
            return false;
        }
        matches!(self.peek_char(1), Some('+'))
            && matches!(self.peek_char(2), Some(c) if c.is_ascii_hexdigit() || c == '?')
    }

    fn consume_comment(&mut self) -> TokenType {
        self.advance();
        self.advance();
        let body_start_idx = self.pos;
        loop {
            match (self.peek_char(0), self.peek_char(1)) {
                (Some('*'), Some('/')) => {
                    let body_end_byte = self.tell_byte();
                    let body = self.input[self.byte_offsets[body_start_idx]..body_end_byte].to_string();
                    self.advance();
                    self.advance();
                    self.latch_pragma(&body);
                    return TokenType::Comment(body);
                }
                (None, _) => {
                    // EOF inside comment is not an error (spec §4.1).
                    let body = self.input[self.byte_offsets[body_start_idx]..self.input.len()].to_string();
                    self.latch_pragma(&body);
                    return TokenType::Comment(body);
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Recognises `/*# sourceMappingURL=<url> */` and `/*# sourceURL=<url> */`
    /// (`@` accepted in place of `#`); last occurrence wins.
    fn latch_pragma(&mut self, body: &str) {
        let body = body.trim_start();
        let Some(rest) = body.strip_prefix('#').or_else(|| body.strip_prefix('@')) else {
            return;
        };
        if let Some(after_eq) = rest.strip_prefix("sourceMappingURL").and_then(|s| s.strip_prefix('=')) {
            let url = after_eq.split_whitespace().next().unwrap_or("").trim();
            self.pragma.source_mapping_url = Some(url.to_string());
        } else if let Some(after_eq) = rest.strip_prefix("sourceURL").and_then(|s| s.strip_prefix('=')) {
            let url = after_eq.split_whitespace().next().unwrap_or("").trim();
            self.pragma.source_url = Some(url.to_string());
        }
    }

    fn consume_whitespace(&mut self) -> TokenType {
        while matches!(self.peek_char(0), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        TokenType::Whitespace
    }

    fn consume_escaped_char(&mut self) -> char {
        // Caller already confirmed a `\` is present and is not escaping a
        // newline.
        self.advance(); // consume backslash
        match self.peek_char(0) {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::new();
                while hex.len() < 6 {
                    match self.peek_char(0) {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(c);
                            self.advance();
                        }
                        _ => break,
                    }
                }
                if matches!(self.peek_char(0), Some(c) if c.is_whitespace()) {
                    self.advance();
                }
                let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
                if code == 0 || code > UnicodeChar::MAX_ALLOWED as u32 || (0xD800..=0xDFFF).contains(&code) {
                    UnicodeChar::REPLACEMENT_CHARACTER
                } else {
                    char::from_u32(code).unwrap_or(UnicodeChar::REPLACEMENT_CHARACTER)
                }
            }
            Some(c) => {
                self.advance();
                c
            }
            None => UnicodeChar::REPLACEMENT_CHARACTER,
        }
    }

    fn consume_string(&mut self, quote: char) -> TokenType {
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek_char(0) {
                None => return TokenType::EofInString,
                Some(c) if c == quote => {
                    self.advance();
                    return TokenType::QuotedString(value);
                }
                Some('\n') => return TokenType::BadString,
                Some('\\') => {
                    if self.peek_char(1) == Some('\n') {
                        self.advance();
                        self.advance();
                    } else if self.peek_char(1).is_none() {
                        self.advance();
                    } else {
                        value.push(self.consume_escaped_char());
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek_char(0) {
                Some(c) if is_name(c) => {
                    name.push(c);
                    self.advance();
                }
                Some('\\') if self.escape_valid_at(0) => {
                    name.push(self.consume_escaped_char());
                }
                _ => break,
            }
        }
        name
    }

    fn consume_hash(&mut self) -> TokenType {
        self.advance(); // '#'
        let could_be_ident = matches!(self.peek_char(0), Some(c) if is_name(c) || c == '\\');
        if !could_be_ident {
            return TokenType::Delim('#');
        }
        let first = self.peek_char(0);
        let is_id = match first {
            Some(c) if is_name_start(c) => true,
            Some('\\') => true,
            Some(c) if c.is_ascii_digit() => true,
            _ => false,
        };
        let value = self.consume_name();
        TokenType::Hash { value, is_id }
    }

    fn consume_at_keyword(&mut self) -> TokenType {
        self.advance(); // '@'
        if self.starts_identifier() {
            TokenType::AtKeyword(self.consume_name())
        } else {
            TokenType::Delim('@')
        }
    }

    fn consume_ident_like(&mut self) -> TokenType {
        let name = self.consume_name();
        if self.peek_char(0) == Some('(') {
            if name.eq_ignore_ascii_case("url") {
                self.advance();
                return self.consume_url();
            }
            self.advance();
            return TokenType::Function(name);
        }
        TokenType::Ident(name)
    }

    fn consume_url(&mut self) -> TokenType {
        while matches!(self.peek_char(0), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        if matches!(self.peek_char(0), Some('"') | Some('\'')) {
            // url("...") / url('...') is tokenized as function + string by
            // CSS Syntax L3, but browsers also accept this shape directly
            // inside `url(...)`; treat it the same as the unquoted path by
            // re-using the string consumer and wrapping the result.
            let quote = self.peek_char(0).unwrap();
            match self.consume_string(quote) {
                TokenType::QuotedString(s) => {
                    self.consume_whitespace_in_url_tail();
                    if self.peek_char(0) == Some(')') {
                        self.advance();
                        return TokenType::Url(s);
                    }
                    return self.bad_url_remainder();
                }
                _ => return self.bad_url_remainder(),
            }
        }

        let mut value = String::new();
        loop {
            match self.peek_char(0) {
                Some(')') => {
                    self.advance();
                    return TokenType::Url(value);
                }
                None => return TokenType::EofInUrl,
                Some(c) if c.is_whitespace() => {
                    self.consume_whitespace_in_url_tail();
                    return match self.peek_char(0) {
                        Some(')') => {
                            self.advance();
                            TokenType::Url(value)
                        }
                        None => TokenType::EofInUrl,
                        _ => self.bad_url_remainder(),
                    };
                }
                Some('"') | Some('\'') | Some('(') => return self.bad_url_remainder(),
                Some(c) if is_non_printable(c) => return self.bad_url_remainder(),
                Some('\\') => {
                    if self.escape_valid_at(0) {
                        value.push(self.consume_escaped_char());
                    } else {
                        return self.bad_url_remainder();
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn consume_whitespace_in_url_tail(&mut self) {
        while matches!(self.peek_char(0), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Consume through the matching `)` or EOF after a `bad-url` condition.
    fn bad_url_remainder(&mut self) -> TokenType {
        loop {
            match self.peek_char(0) {
                None | Some(')') => {
                    if self.peek_char(0) == Some(')') {
                        self.advance();
                    }
                    return TokenType::BadUrl;
                }
                Some('\\') if self.escape_valid_at(0) => {
                    self.consume_escaped_char();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn consume_numeric(&mut self) -> TokenType {
        let start_idx = self.pos;
        let mut has_dot = false;
        let mut has_exp = false;

        if matches!(self.peek_char(0), Some('+') | Some('-')) {
            self.advance();
        }
        while matches!(self.peek_char(0), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek_char(0) == Some('.') && matches!(self.peek_char(1), Some(c) if c.is_ascii_digit()) {
            has_dot = true;
            self.advance();
            while matches!(self.peek_char(0), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek_char(0), Some('e') | Some('E')) {
            let mut look = 1;
            if matches!(self.peek_char(1), Some('+') | Some('-')) {
                look = 2;
            }
            if matches!(self.peek_char(look), Some(c) if c.is_ascii_digit()) {
                has_exp = true;
                self.advance();
                if matches!(self.peek_char(0), Some('+') | Some('-')) {
                    self.advance();
                }
                while matches!(self.peek_char(0), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let repr: String = self.chars[start_idx..self.pos].iter().collect();
        let value: CssNumber = repr.parse().unwrap_or(0.0);
        let int_value = if !has_dot && !has_exp {
            repr.parse::<i64>().ok().map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        } else {
            None
        };

        if self.starts_identifier() {
            let unit = self.consume_name();
            return TokenType::Dimension { value, int_value, repr, unit };
        }
        if self.peek_char(0) == Some('%') {
            self.advance();
            return TokenType::Percentage { value, repr };
        }
        TokenType::Number { value, int_value, repr }
    }

    fn consume_unicode_range(&mut self) -> TokenType {
        self.advance(); // u/U
        self.advance(); // +
        let mut digits = String::new();
        let mut wildcards = 0usize;
        while digits.len() + wildcards < 6 {
            match self.peek_char(0) {
                Some(c) if c.is_ascii_hexdigit() && wildcards == 0 => {
                    digits.push(c);
                    self.advance();
                }
                Some('?') => {
                    wildcards += 1;
                    self.advance();
                }
                _ => break,
            }
        }

        if wildcards > 0 {
            let start = u32::from_str_radix(&(digits.clone() + &"0".repeat(wildcards)), 16).unwrap_or(0);
            let end = u32::from_str_radix(&(digits + &"f".repeat(wildcards)), 16).unwrap_or(start);
            return TokenType::UnicodeRange { start, end };
        }

        let start = u32::from_str_radix(&digits, 16).unwrap_or(0);
        if self.peek_char(0) == Some('-') && matches!(self.peek_char(1), Some(c) if c.is_ascii_hexdigit()) {
            self.advance();
            let mut end_digits = String::new();
            while end_digits.len() < 6 {
                match self.peek_char(0) {
                    Some(c) if c.is_ascii_hexdigit() => {
                        end_digits.push(c);
                        self.advance();
                    }
                    _ => break,
                }
            }
            let end = u32::from_str_radix(&end_digits, 16).unwrap_or(start);
            return TokenType::UnicodeRange { start, end };
        }

        TokenType::UnicodeRange { start, end: start }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<TokenType> {
        let mut t = Tokenizer::new(input, None);
        let mut out = Vec::new();
        loop {
            let tok = t.next_token();
            if tok.token_type == TokenType::Eof {
                break;
            }
            out.push(tok.token_type);
        }
        out
    }

    #[test]
    fn tokenizes_simple_rule_tokens() {
        let t = toks(".a{color:red}");
        assert_eq!(
            t,
            vec![
                TokenType::Delim('.'),
                TokenType::Ident("a".into()),
                TokenType::LCurly,
                TokenType::Ident("color".into()),
                TokenType::Colon,
                TokenType::Ident("red".into()),
                TokenType::RCurly,
            ]
        );
    }

    #[test]
    fn hash_id_likeness() {
        let t = toks("#fff #000000 #1");
        match &t[0] {
            TokenType::Hash { is_id, .. } => assert!(is_id),
            _ => panic!("expected hash"),
        }
        match &t[2] {
            TokenType::Hash { is_id, .. } => assert!(is_id),
            _ => panic!("expected hash"),
        }
    }

    #[test]
    fn numeric_repr_preserved() {
        let t = toks("1.0 -5 1e3");
        match &t[0] {
            TokenType::Number { repr, .. } => assert_eq!(repr, "1.0"),
            _ => panic!(),
        }
    }

    #[test]
    fn integer_overflow_clamps() {
        let t = toks("99999999999999999999");
        match &t[0] {
            TokenType::Number { int_value, .. } => assert_eq!(*int_value, Some(i32::MAX)),
            _ => panic!(),
        }
    }

    #[test]
    fn bad_string_on_unescaped_newline() {
        let t = toks("\"abc\ndef\"");
        assert_eq!(t[0], TokenType::BadString);
    }

    #[test]
    fn eof_in_string_and_url() {
        assert_eq!(toks("\"abc")[0], TokenType::EofInString);
        assert_eq!(toks("url(abc")[0], TokenType::EofInUrl);
    }

    #[test]
    fn stray_close_tokens() {
        assert_eq!(toks(")")[0], TokenType::StrayCloseParen);
        assert_eq!(toks("]")[0], TokenType::StrayCloseBracket);
        assert_eq!(toks("}")[0], TokenType::StrayCloseCurly);
    }

    #[test]
    fn source_mapping_pragma_latched() {
        let mut t = Tokenizer::new("a {} /*# sourceMappingURL=foo.css.map */", None);
        loop {
            if t.next_token().token_type == TokenType::Eof {
                break;
            }
        }
        assert_eq!(t.pragma.source_mapping_url.as_deref(), Some("foo.css.map"));
    }

    #[test]
    fn cdo_cdc_tokens() {
        let t = toks("<!-- -->");
        assert_eq!(t, vec![TokenType::Cdo, TokenType::Whitespace, TokenType::Cdc]);
    }

    #[test]
    fn attribute_match_operators() {
        let t = toks("~= |= ^= $= *= ||");
        assert_eq!(
            t,
            vec![
                TokenType::TildeMatch,
                TokenType::Whitespace,
                TokenType::PipeMatch,
                TokenType::Whitespace,
                TokenType::CaretMatch,
                TokenType::Whitespace,
                TokenType::DollarMatch,
                TokenType::Whitespace,
                TokenType::StarMatch,
                TokenType::Whitespace,
                TokenType::Column,
            ]
        );
    }
}
