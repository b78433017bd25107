//! The parser core (spec §4.2): a cursor over the token stream with
//! O(1) save/restore, `try_parse`, `parse_entirely`, and the
//! `parse_until_before`/`parse_until_after` delimiter-scoping combinators
//! that every higher-level grammar (selectors, calc, conditions, the rule
//! builder) is built out of.

use crate::error::{BasicParseErrorKind, ParseError};
use crate::location::Location;
use crate::tokenizer::{Token, TokenType, Tokenizer, TokenizerState};
use std::rc::Rc;

bitflags::bitflags! {
    /// A set of token kinds that can terminate a `parse_until_*` scope.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Delimiters: u8 {
        const SEMICOLON    = 0b0000_0001;
        const COMMA        = 0b0000_0010;
        const BANG         = 0b0000_0100;
        const CURLY_BRACE  = 0b0000_1000;
        const CLOSE_PAREN  = 0b0001_0000;
        const CLOSE_SQUARE = 0b0010_0000;
    }
}

impl Delimiters {
    fn matches(self, token: &TokenType) -> bool {
        match token {
            TokenType::Semicolon => self.contains(Delimiters::SEMICOLON),
            TokenType::Comma => self.contains(Delimiters::COMMA),
            TokenType::Delim('!') => self.contains(Delimiters::BANG),
            TokenType::RCurly => self.contains(Delimiters::CURLY_BRACE),
            TokenType::RParen => self.contains(Delimiters::CLOSE_PAREN),
            TokenType::RBracket => self.contains(Delimiters::CLOSE_SQUARE),
            _ => false,
        }
    }
}

/// Which closer a nested block is waiting for. The block stack (see
/// `Parser::block_stack`) is a plain `Vec` pushed by `enter_nested_block`
/// and popped by `finish_nested_block` — never native recursion — so
/// arbitrarily deep `((((...))))` nesting never grows the call stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    Paren,
    Bracket,
    Curly,
}

pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    block_stack: Vec<BlockType>,
    /// Active `parse_until_*` scopes, innermost last. A scope is a byte
    /// offset the cursor must not read past; `next`/`peek` report EOF once
    /// reached, even though the underlying tokenizer has more input.
    scope_stack: Vec<usize>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, source: Option<Rc<str>>) -> Self {
        Parser {
            tokenizer: Tokenizer::new(input, source),
            block_stack: Vec::new(),
            scope_stack: Vec::new(),
        }
    }

    pub fn current_location(&self) -> Location {
        self.tokenizer.current_location()
    }

    fn scope_limit(&self) -> Option<usize> {
        self.scope_stack.last().copied()
    }

    pub fn is_exhausted(&mut self) -> bool {
        let state = self.state();
        let is_eof = self.next().token_type == TokenType::Eof;
        self.reset(state);
        is_eof
    }

    pub fn state(&self) -> ParserState {
        ParserState {
            tokenizer: self.tokenizer.state(),
            block_depth: self.block_stack.len(),
        }
    }

    pub fn reset(&mut self, state: ParserState) {
        self.tokenizer.reset(state.tokenizer);
        self.block_stack.truncate(state.block_depth);
    }

    /// Next significant token: whitespace and comments are folded away. If
    /// an active scope's end byte has been reached, reports EOF without
    /// consuming past it.
    pub fn next(&mut self) -> Token {
        loop {
            if let Some(limit) = self.scope_limit() {
                if self.tokenizer.tell_byte() >= limit {
                    return self.synthetic_eof();
                }
            }
            let tok = self.tokenizer.next_token();
            if !tok.is_whitespace() && !tok.is_comment() {
                return tok;
            }
        }
    }

    /// Like `next`, but whitespace/comments are returned as their own
    /// tokens — used by grammars that need to distinguish a descendant
    /// combinator (bare whitespace) from no combinator at all.
    pub fn next_including_whitespace(&mut self) -> Token {
        if let Some(limit) = self.scope_limit() {
            if self.tokenizer.tell_byte() >= limit {
                return self.synthetic_eof();
            }
        }
        loop {
            let tok = self.tokenizer.next_token();
            if !tok.is_comment() {
                return tok;
            }
        }
    }

    fn synthetic_eof(&self) -> Token {
        let loc = self.tokenizer.current_location();
        let byte = self.tokenizer.tell_byte();
        Token {
            token_type: TokenType::Eof,
            start_byte: byte,
            end_byte: byte,
            location: loc,
        }
    }

    pub fn peek(&mut self) -> Token {
        let state = self.state();
        let tok = self.next();
        self.reset(state);
        tok
    }

    /// Like `peek`, but whitespace is not filtered out — used by grammars
    /// (selector combinators) that must tell "nothing between these two
    /// tokens" apart from "whitespace between these two tokens".
    pub fn peek_including_whitespace(&mut self) -> Token {
        let state = self.state();
        let tok = self.next_including_whitespace();
        self.reset(state);
        tok
    }

    pub fn skip_whitespace(&mut self) {
        loop {
            let s = self.state();
            let t = self.next_including_whitespace();
            if !t.is_whitespace() {
                self.reset(s);
                break;
            }
        }
    }

    /// Run `f`; on failure, restore the cursor to where it was before `f`
    /// ran, guaranteeing no observable side effect on the token stream.
    pub fn try_parse<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError<E>>) -> Result<T, ParseError<E>> {
        let state = self.state();
        match f(self) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.reset(state);
                Err(e)
            }
        }
    }

    /// Run `f`, then require the cursor to be at end of input (or the
    /// current scope's end).
    pub fn parse_entirely<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, ParseError<E>>) -> Result<T, ParseError<E>> {
        let v = f(self)?;
        if !self.is_exhausted() {
            return Err(ParseError::basic(BasicParseErrorKind::ExtraInput, self.current_location()));
        }
        Ok(v)
    }

    /// Scope `f` to the tokens appearing before the next top-level
    /// occurrence of any delimiter in `delims`. Nested `{[(` blocks are
    /// transparent: a delimiter that appears inside one does not end the
    /// scope. On return, the cursor sits right before the delimiter (or at
    /// EOF). Any of `f`'s own unconsumed remainder inside the scope is
    /// silently discarded, not an error.
    pub fn parse_until_before<T, E>(
        &mut self,
        delims: Delimiters,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError<E>>,
    ) -> Result<T, ParseError<E>> {
        let end_byte = self.find_scope_end(delims);
        self.scope_stack.push(end_byte);
        let result = f(self);
        self.scope_stack.pop();
        // Discard whatever `f` left unconsumed within the scope.
        self.seek_to_byte(end_byte);
        result
    }

    /// Like `parse_until_before`, but the cursor ends up *after* the
    /// delimiter (consuming it) rather than before it.
    pub fn parse_until_after<T, E>(
        &mut self,
        delims: Delimiters,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError<E>>,
    ) -> Result<T, ParseError<E>> {
        let result = self.parse_until_before(delims, f);
        let before = self.tokenizer.state();
        let tok = self.tokenizer.next_token();
        if !delims.matches(&tok.token_type) && !matches!(tok.token_type, TokenType::Eof) {
            self.tokenizer.reset(before);
        }
        result
    }

    /// Finds the byte offset of the next top-level delimiter (or EOF, or
    /// the current scope's own end), treating nested `{[(`/`}])` as
    /// transparent. Implemented with an explicit depth counter, not
    /// recursion, so adversarial nesting cannot blow the call stack.
    fn find_scope_end(&mut self, delims: Delimiters) -> usize {
        let start = self.tokenizer.state();
        let outer_limit = self.scope_limit();
        let mut depth: i32 = 0;
        let end_byte;
        loop {
            if let Some(limit) = outer_limit {
                if self.tokenizer.tell_byte() >= limit {
                    end_byte = limit;
                    break;
                }
            }
            let before = self.tokenizer.tell_byte();
            let tok = self.tokenizer.next_token();
            match &tok.token_type {
                TokenType::Eof => {
                    end_byte = before;
                    break;
                }
                TokenType::LParen | TokenType::LBracket | TokenType::LCurly => depth += 1,
                TokenType::RParen | TokenType::RBracket | TokenType::RCurly if depth > 0 => depth -= 1,
                _ if depth == 0 && delims.matches(&tok.token_type) => {
                    end_byte = before;
                    break;
                }
                _ => {}
            }
        }
        self.tokenizer.reset(start);
        end_byte
    }

    fn seek_to_byte(&mut self, byte: usize) {
        while self.tokenizer.tell_byte() < byte {
            self.tokenizer.next_token();
        }
    }

    /// Enters a nested block whose opener is the current token (`( [ {` or
    /// a function's implicit `(`).
    pub fn enter_nested_block(&mut self, opener: &TokenType) -> Option<BlockType> {
        let bt = match opener {
            TokenType::LParen | TokenType::Function(_) => BlockType::Paren,
            TokenType::LBracket => BlockType::Bracket,
            TokenType::LCurly => BlockType::Curly,
            _ => return None,
        };
        self.block_stack.push(bt);
        Some(bt)
    }

    /// Consumes tokens up to and including the closer matching `block_type`,
    /// skipping transparently over any nested blocks opened in between.
    pub fn finish_nested_block(&mut self, block_type: BlockType) {
        let mut depth = 1usize;
        loop {
            let tok = self.tokenizer.next_token();
            match tok.token_type {
                TokenType::LParen | TokenType::LBracket | TokenType::LCurly => depth += 1,
                TokenType::RParen | TokenType::RBracket | TokenType::RCurly => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenType::Eof => break,
                _ => {}
            }
        }
        if self.block_stack.last() == Some(&block_type) {
            self.block_stack.pop();
        }
    }

    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer<'a> {
        &mut self.tokenizer
    }

    pub fn pragma(&self) -> &crate::tokenizer::SourceMapPragma {
        &self.tokenizer.pragma
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserState {
    tokenizer: TokenizerState,
    block_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_parse_rewinds_on_failure() {
        let mut p = Parser::new("foo bar", None::<Rc<str>>);
        let before = p.state();
        let res: Result<(), ParseError<()>> = p.try_parse(|p| {
            p.next();
            Err(ParseError::basic(BasicParseErrorKind::EndOfInput, p.current_location()))
        });
        assert!(res.is_err());
        assert_eq!(p.state(), before);
    }

    #[test]
    fn parse_until_before_stops_at_top_level_semicolon() {
        let mut p = Parser::new("a b; c", None::<Rc<str>>);
        let toks: Result<Vec<Token>, ParseError<()>> = p.parse_until_before(Delimiters::SEMICOLON, |p| {
            let mut v = Vec::new();
            loop {
                let t = p.next();
                if matches!(t.token_type, TokenType::Eof) {
                    break;
                }
                v.push(t);
            }
            Ok(v)
        });
        assert_eq!(toks.unwrap().len(), 2); // "a", "b" (whitespace filtered)
        let next = p.next();
        assert!(matches!(next.token_type, TokenType::Semicolon));
    }

    #[test]
    fn nested_parens_are_transparent_to_delimiter_search() {
        let mut p = Parser::new("f(a; b); c", None::<Rc<str>>);
        let _: Result<(), ParseError<()>> = p.parse_until_before(Delimiters::SEMICOLON, |p| {
            let t = p.next();
            assert!(matches!(t.token_type, TokenType::Function(_)));
            Ok(())
        });
        let next = p.next();
        assert!(matches!(next.token_type, TokenType::Semicolon));
    }
}
