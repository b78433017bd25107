//! Stylesheet AST (spec §3): `Stylesheet<X, T>`, the `Rule<X, T>` sum, and
//! `Declaration<T>`. `X` is the host's custom-at-rule payload (§6.2); `T` is
//! the per-property typed-value facade's own output type (§4.7) — both are
//! extension seams the core never constructs on its own.

use crate::cascade::Specificity;
use crate::location::Location;
use crate::parser::container::ContainerCondition;
use crate::parser::media::MediaQueryList;
use crate::parser::supports::SupportsCondition;
use crate::selector::SelectorList;
use crate::tokenizer::Token;

/// `initial | inherit | unset | revert | revert-layer`, valid for any
/// property (spec §6.4/GLOSSARY).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CssWideKeyword {
    Initial,
    Inherit,
    Unset,
    Revert,
    RevertLayer,
}

impl CssWideKeyword {
    pub fn from_ident(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "initial" => Some(CssWideKeyword::Initial),
            "inherit" => Some(CssWideKeyword::Inherit),
            "unset" => Some(CssWideKeyword::Unset),
            "revert" => Some(CssWideKeyword::Revert),
            "revert-layer" => Some(CssWideKeyword::RevertLayer),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VendorPrefix {
    WebKit,
    Moz,
    Ms,
    O,
}

impl VendorPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            VendorPrefix::WebKit => "-webkit-",
            VendorPrefix::Moz => "-moz-",
            VendorPrefix::Ms => "-ms-",
            VendorPrefix::O => "-o-",
        }
    }
}

/// A lower-cased property name plus its optional vendor prefix (spec §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyId {
    pub name: String,
    pub prefix: Option<VendorPrefix>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComposesFrom {
    Global,
    File(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposesValue {
    pub classes: Vec<String>,
    pub from: Option<ComposesFrom>,
}

/// A declaration's parsed value (spec §3). `Typed` is uninhabited unless a
/// caller supplies `T` via the per-property parser table (§6.2) — with no
/// facade registered, every declaration is `Unparsed`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<T = std::convert::Infallible> {
    Typed(T),
    /// The original token sequence, excluding comments and surrounding
    /// whitespace (spec §6.3 — kept losslessly for this fallback).
    Unparsed(Vec<Token>),
    WideKeyword(CssWideKeyword, PropertyId),
    Composes(ComposesValue),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declaration<T = std::convert::Infallible> {
    pub name: String,
    pub value: Value<T>,
    pub is_important: bool,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule<X, T = std::convert::Infallible> {
    pub selectors: Option<SelectorList>,
    pub declarations: Vec<Declaration<T>>,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaRule<X, T = std::convert::Infallible> {
    pub query: MediaQueryList,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SupportsRule<X, T = std::convert::Infallible> {
    pub condition: SupportsCondition,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerRule<X, T = std::convert::Infallible> {
    pub name: Option<String>,
    pub condition: ContainerCondition,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScopeRule<X, T = std::convert::Infallible> {
    pub start: Option<SelectorList>,
    pub end: Option<SelectorList>,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerStatementRule {
    pub names: Vec<String>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerBlockRule<X, T = std::convert::Infallible> {
    pub name: Option<String>,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImportLayer {
    Anonymous,
    Named(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportRule {
    pub url: String,
    pub layer: Option<ImportLayer>,
    pub supports: Option<SupportsCondition>,
    pub media: Option<MediaQueryList>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceRule {
    pub prefix: Option<String>,
    pub url: String,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T = std::convert::Infallible> {
    /// Each selector is a percentage (`0`..=`100`) or the `from`/`to`
    /// keyword, already normalized to a percentage for matching while the
    /// original spelling is kept for round-tripping (spec §6.4).
    pub selectors: Vec<KeyframeSelector>,
    pub declarations: Vec<Declaration<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeSelector {
    pub percentage: f64,
    pub written_as_from: bool,
    pub written_as_to: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyframesRule<T = std::convert::Infallible> {
    pub name: String,
    pub vendor_prefix: Option<VendorPrefix>,
    pub keyframes: Vec<Keyframe<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontFaceRule<T = std::convert::Infallible> {
    pub declarations: Vec<Declaration<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontFeatureValuesBlock<T = std::convert::Infallible> {
    pub name: String,
    pub declarations: Vec<Declaration<T>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontFeatureValuesRule<T = std::convert::Infallible> {
    pub families: Vec<String>,
    pub blocks: Vec<FontFeatureValuesBlock<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontPaletteValuesRule<T = std::convert::Infallible> {
    pub name: String,
    pub declarations: Vec<Declaration<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterStyleRule<T = std::convert::Infallible> {
    pub name: String,
    pub declarations: Vec<Declaration<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageMarginRule<T = std::convert::Infallible> {
    pub name: String,
    pub declarations: Vec<Declaration<T>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageRule<T = std::convert::Infallible> {
    pub selector: Option<String>,
    pub declarations: Vec<Declaration<T>>,
    pub margin_rules: Vec<PageMarginRule<T>>,
    pub location: Location,
}

/// `@property`. `syntax`/`initial_value` are kept as their source text:
/// the `<syntax>` grammar and value-type validation are typed-value
/// collaborators out of this crate's scope (spec §1).
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRule {
    pub name: String,
    pub syntax: Option<String>,
    pub inherits: Option<bool>,
    pub initial_value: Option<Vec<Token>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StartingStyleRule<X, T = std::convert::Infallible> {
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MozDocumentRule<X, T = std::convert::Infallible> {
    pub prelude: Vec<Token>,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransitionRule<T = std::convert::Infallible> {
    pub declarations: Vec<Declaration<T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewportRule<T = std::convert::Infallible> {
    pub declarations: Vec<Declaration<T>>,
    pub location: Location,
}

/// Legacy `@nest`: a block that, unlike a style rule, has no selector of
/// its own (the nesting selector `&` stands in for it) but otherwise
/// accepts the same mixed declaration/rule body.
#[derive(Clone, Debug, PartialEq)]
pub struct NestRule<X, T = std::convert::Infallible> {
    pub declarations: Vec<Declaration<T>>,
    pub rules: Vec<Rule<X, T>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CustomMediaRule {
    pub name: String,
    pub media: MediaQueryList,
    pub location: Location,
}

/// A recognised-but-opaque at-rule: valid block structure, name not in
/// the classification table (spec §4.6 step 2, "other" row). Preserved
/// verbatim so downstream tools can round-trip it; it never participates
/// in nesting.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownAtRule {
    pub name: String,
    pub prelude: Vec<Token>,
    pub block: Option<Vec<Token>>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rule<X, T = std::convert::Infallible> {
    Style(StyleRule<X, T>),
    Media(MediaRule<X, T>),
    Supports(SupportsRule<X, T>),
    Container(ContainerRule<X, T>),
    Scope(ScopeRule<X, T>),
    LayerStatement(LayerStatementRule),
    LayerBlock(LayerBlockRule<X, T>),
    Import(ImportRule),
    Namespace(NamespaceRule),
    Keyframes(KeyframesRule<T>),
    FontFace(FontFaceRule<T>),
    FontFeatureValues(FontFeatureValuesRule<T>),
    FontPaletteValues(FontPaletteValuesRule<T>),
    CounterStyle(CounterStyleRule<T>),
    Page(PageRule<T>),
    Property(PropertyRule),
    StartingStyle(StartingStyleRule<X, T>),
    MozDocument(MozDocumentRule<X, T>),
    ViewTransition(ViewTransitionRule<T>),
    Viewport(ViewportRule<T>),
    Nesting(NestRule<X, T>),
    CustomMedia(CustomMediaRule),
    Unknown(UnknownAtRule),
    Custom(X),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stylesheet<X, T = std::convert::Infallible> {
    pub rules: Vec<Rule<X, T>>,
    pub source: Option<std::rc::Rc<str>>,
}

impl<X, T> Stylesheet<X, T> {
    pub fn new(source: Option<std::rc::Rc<str>>) -> Self {
        Stylesheet { rules: Vec::new(), source }
    }
}

/// Per-property parser table entry (spec §6.2): given a lower-cased name
/// and an optional vendor prefix, attempts the property's own leaf
/// grammar. The per-property grammars themselves are collaborators out of
/// this crate's scope (spec §1) — this trait is only the seam.
pub trait PropertyValueParser<T> {
    fn parse(&self, name: &str, prefix: Option<VendorPrefix>, parser: &mut crate::parser::cursor::Parser) -> crate::error::PResult<T>;
}

/// Reports the cascade-relevant `Specificity` for a `StyleRule`'s selector
/// list, taking the max over the list as the cascade resolver (a
/// collaborator) requires when several complex selectors share one body.
impl<X, T> StyleRule<X, T> {
    pub fn specificity(&self) -> Specificity {
        self.selectors.as_ref().map(SelectorList::specificity_max).unwrap_or(Specificity::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_keyword_from_ident() {
        assert_eq!(CssWideKeyword::from_ident("inherit"), Some(CssWideKeyword::Inherit));
        assert_eq!(CssWideKeyword::from_ident("revert-layer"), Some(CssWideKeyword::RevertLayer));
        assert_eq!(CssWideKeyword::from_ident("bogus"), None);
    }
}
