//! A CSS Syntax Level 3 tokenizer, recursive-descent parser and recoverable
//! rule/declaration AST, generalizing `gosub_css3`'s own parser for use
//! outside the gosub engine.

pub mod cascade;
pub mod error;
pub mod location;
pub mod parser;
pub mod parser_config;
pub mod selector;
pub mod stylesheet;
pub mod tokenizer;
pub mod unicode;

use crate::error::ErrorChannel;
use crate::parser::cursor::Parser;
use crate::parser_config::{Context, ParserConfig};
use crate::stylesheet::Stylesheet;

/// Parses a whole stylesheet (spec §4.13, `Context::Stylesheet`), collecting
/// recoverable errors rather than aborting on the first one.
pub fn parse_stylesheet<X, T>(input: &str, config: &ParserConfig<X, T>) -> (Stylesheet<X, T>, ErrorChannel) {
    let mut p = Parser::new(input, config.source.as_deref().map(Into::into));
    let mut errors = ErrorChannel::new();
    let rules = parser::block::parse_stylesheet_rules(&mut p, config, &mut errors);
    let source = config.source.as_deref().map(Into::into);
    (Stylesheet { rules, source }, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_stylesheet() {
        let config: ParserConfig<std::convert::Infallible, std::convert::Infallible> = ParserConfig::new(Context::Stylesheet);
        let (sheet, errors) = parse_stylesheet("div.foo { color: red; }", &config);
        assert!(errors.is_empty());
        assert_eq!(sheet.rules.len(), 1);
    }
}
