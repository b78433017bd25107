//! Parsing (spec §4): the token cursor plus every grammar built on it.

pub mod anplusb;
pub mod at_rule;
pub mod block;
pub mod calc;
pub mod condition;
pub mod container;
pub mod cursor;
pub mod media;
pub mod pseudo;
pub mod rule;
pub mod selector;
pub mod supports;
pub mod value;

pub use cursor::{Delimiters, Parser, ParserState};
