//! Pending-rule descriptors (spec §4.10 "block-body parsing state") and
//! their assembly into a concrete `Rule<X, T>` once a frame's closing `}`
//! (or implicit EOF close) is reached.
//!
//! Only at-rules whose body can recursively contain more rules — the
//! shapes the stack-safety requirement (spec §5) is actually about — push
//! a frame here. Fixed-shape bodies (`@font-face`, `@page`,
//! `@keyframes`, `@font-feature-values`, …) have no further nesting to
//! worry about and are parsed to a complete `Rule` in one pass by
//! `at_rule.rs`, without ever joining the frame stack.

use crate::location::Location;
use crate::parser::container::ContainerCondition;
use crate::parser::media::MediaQueryList;
use crate::parser::supports::SupportsCondition;
use crate::selector::SelectorList;
use crate::stylesheet::{ContainerRule, Declaration, LayerBlockRule, MediaRule, MozDocumentRule, NestRule, Rule, ScopeRule, StartingStyleRule, StyleRule, SupportsRule};
use crate::tokenizer::Token;

/// One open `{ … }` frame's pending shape. `TopLevel` is the frame that is
/// never "assembled" — its accumulated rules become the stylesheet itself.
pub enum PendingDescriptor {
    TopLevel,
    Style { selectors: SelectorList, location: Location },
    Media { query: MediaQueryList, location: Location },
    Supports { condition: SupportsCondition, location: Location },
    Container { name: Option<String>, condition: ContainerCondition, location: Location },
    Scope { start: Option<SelectorList>, end: Option<SelectorList>, location: Location },
    LayerBlock { name: Option<String>, location: Location },
    StartingStyle { location: Location },
    MozDocument { prelude: Vec<Token>, location: Location },
    Nest { location: Location },
}

/// Converts a closed frame's descriptor, accumulated declarations, and
/// accumulated nested rules into the concrete AST node it represents.
pub fn assemble<X, T>(descriptor: PendingDescriptor, declarations: Vec<Declaration<T>>, rules: Vec<Rule<X, T>>) -> Rule<X, T> {
    match descriptor {
        PendingDescriptor::TopLevel => unreachable!("the top-level frame is never assembled"),
        PendingDescriptor::Style { selectors, location } => Rule::Style(StyleRule { selectors: Some(selectors), declarations, rules, location }),
        PendingDescriptor::Media { query, location } => Rule::Media(MediaRule { query, rules, location }),
        PendingDescriptor::Supports { condition, location } => Rule::Supports(SupportsRule { condition, rules, location }),
        PendingDescriptor::Container { name, condition, location } => Rule::Container(ContainerRule { name, condition, rules, location }),
        PendingDescriptor::Scope { start, end, location } => Rule::Scope(ScopeRule { start, end, rules, location }),
        PendingDescriptor::LayerBlock { name, location } => Rule::LayerBlock(LayerBlockRule { name, rules, location }),
        PendingDescriptor::StartingStyle { location } => Rule::StartingStyle(StartingStyleRule { rules, location }),
        PendingDescriptor::MozDocument { prelude, location } => Rule::MozDocument(MozDocumentRule { prelude, rules, location }),
        PendingDescriptor::Nest { location } => Rule::Nesting(NestRule { declarations, rules, location }),
    }
}
