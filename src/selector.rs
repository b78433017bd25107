//! Selector AST (spec §3, §4.4): Selectors Level 4 plus CSS Nesting's `&`.

use crate::cascade::Specificity;
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Selector>);

impl SelectorList {
    pub fn specificity_max(&self) -> Specificity {
        Specificity::max_of(self.0.iter().map(Selector::specificity))
    }
}

/// A complex selector: compound selectors joined by combinators, stored as
/// one flat ordered sequence (a `Combinator` component always sits between
/// two compounds). `SmallVec` avoids a heap allocation for the common case
/// of a handful of components (`div.card > .title` is 3), matching
/// `servo/components/selectors`' own choice for the same shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub components: SmallVec<[Component; 8]>,
}

impl Selector {
    pub fn specificity(&self) -> Specificity {
        self.components.iter().fold(Specificity::ZERO, |acc, c| acc.add(c.specificity()))
    }

    /// Iterates the compound selectors (runs of components between
    /// combinators), in source order.
    pub fn compounds(&self) -> impl Iterator<Item = &[Component]> {
        self.components.split(|c| matches!(c, Component::Combinator(_)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
    /// `||`, the legacy column combinator.
    Column,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespacePrefix {
    /// `ns|name`
    Named(String),
    /// `|name` (explicitly no namespace)
    None,
    /// `*|name`
    Any,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualName {
    pub prefix: Option<NamespacePrefix>,
    pub local_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrMatchOp {
    Equal,
    Includes,  // ~=
    DashMatch, // |=
    Prefix,    // ^=
    Suffix,    // $=
    Substring, // *=
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrCaseSensitivity {
    CaseSensitive,
    AsciiCaseInsensitive, // i
    Explicit,             // s
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSelector {
    pub name: QualName,
    pub matcher: Option<(AttrMatchOp, String, AttrCaseSensitivity)>,
}

/// `(a, b)` in `an+b`. `odd` is `(2, 1)`, `even` is `(2, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnPlusB {
    pub a: i32,
    pub b: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:hover`, `:focus`, ... — no argument.
    Ident(String),
    /// `:lang(en, "fr-CA")`, `:dir(ltr)`
    IdentArgs(String, Vec<String>),
    /// `:is(...)`, `:where(...)`
    Is(SelectorList),
    Where(SelectorList),
    Not(SelectorList),
    /// `:has(<relative-selector-list>)`
    Has(SelectorList),
    NthChild { an_b: AnPlusB, of: Option<SelectorList> },
    NthLastChild { an_b: AnPlusB, of: Option<SelectorList> },
    NthOfType { an_b: AnPlusB },
    NthLastOfType { an_b: AnPlusB },
    /// `:host(<compound-selector>)`
    Host(Option<Box<Selector>>),
    HostContext(Box<Selector>),
    /// `&`, CSS Nesting.
    Nesting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoElement {
    Ident(String),
    /// `::slotted(<compound-selector>)`
    Slotted(Box<Selector>),
    /// `::part(ident+)`
    Part(Vec<String>),
    /// `::view-transition-group(<ident>|*)` and friends.
    ViewTransitionPart(String, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    Type(QualName),
    Universal(Option<NamespacePrefix>),
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
    PseudoElement(PseudoElement),
    Combinator(Combinator),
    Nesting,
}

impl Component {
    pub fn specificity(&self) -> Specificity {
        match self {
            Component::Type(_) => Specificity::element(),
            Component::Universal(_) => Specificity::ZERO,
            Component::Id(_) => Specificity::id(),
            Component::Class(_) | Component::Attribute(_) => Specificity::class(),
            Component::Combinator(_) => Specificity::ZERO,
            Component::Nesting => Specificity::ZERO,
            Component::PseudoElement(_) => Specificity::element(),
            Component::PseudoClass(pc) => pc.specificity(),
        }
    }
}

impl PseudoClass {
    pub fn specificity(&self) -> Specificity {
        match self {
            PseudoClass::Where(_) | PseudoClass::Nesting => Specificity::ZERO,
            PseudoClass::Is(list) | PseudoClass::Not(list) | PseudoClass::Has(list) => list.specificity_max(),
            PseudoClass::NthChild { of: Some(list), .. } | PseudoClass::NthLastChild { of: Some(list), .. } => {
                Specificity::class().add(list.specificity_max())
            }
            PseudoClass::Host(Some(compound)) | PseudoClass::HostContext(compound) => {
                Specificity::class().add(compound.specificity())
            }
            _ => Specificity::class(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_where_before_before_specificity() {
        // :is(.foo, #bar)::before -> (1,0,1)
        let list = SelectorList(vec![
            Selector { components: smallvec![Component::Class("foo".into())] },
            Selector { components: smallvec![Component::Id("bar".into())] },
        ]);
        let sel = Selector {
            components: smallvec![
                Component::PseudoClass(PseudoClass::Is(list)),
                Component::PseudoElement(PseudoElement::Ident("before".into())),
            ],
        };
        assert_eq!(sel.specificity(), Specificity { ids: 1, classes: 0, elements: 1 });
    }
}
