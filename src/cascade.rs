//! Specificity and cascade-weight computation (spec §3, §4.4).

use std::cmp::Ordering;

/// `(ids, classes, elements)`, compared lexicographically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub elements: u32,
}

impl Specificity {
    pub const ZERO: Specificity = Specificity { ids: 0, classes: 0, elements: 0 };

    pub fn id() -> Self {
        Specificity { ids: 1, classes: 0, elements: 0 }
    }

    pub fn class() -> Self {
        Specificity { ids: 0, classes: 1, elements: 0 }
    }

    pub fn element() -> Self {
        Specificity { ids: 0, classes: 0, elements: 1 }
    }

    pub fn add(self, other: Specificity) -> Self {
        Specificity {
            ids: self.ids + other.ids,
            classes: self.classes + other.classes,
            elements: self.elements + other.elements,
        }
    }

    /// The maximum specificity in a list, per-component, per spec's rule for
    /// `:is()`/`:not()`/`:has()` (and the pseudo-class half of
    /// `:nth-child(An+B of S)`). Returns `Specificity::ZERO` for an empty list
    /// (used by `:where()`, which always contributes zero regardless of its
    /// argument).
    pub fn max_of(specificities: impl IntoIterator<Item = Specificity>) -> Self {
        specificities.into_iter().max().unwrap_or(Specificity::ZERO)
    }
}

/// Where a declaration originated, used by cascade-weight ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    UserAgent,
    User,
    Author,
}

/// `@layer` placement: unlayered, or `(layer_order, declared_order)` within
/// the stylesheet's flattened layer list. Layers declared earlier have a
/// smaller `declared_order`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Unlayered,
    Named(u32),
}

/// The full tuple that resolves which of several matching declarations for
/// one property wins (spec §4.4). Implements `Ord` so a cascade resolver can
/// just take the maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeWeight {
    pub origin: Origin,
    pub is_important: bool,
    pub is_inline_style: bool,
    pub layer: Layer,
    pub specificity: Specificity,
    pub source_order: u32,
}

/// Bucket used for the first ordering criterion: normal declarations order
/// userAgent < user < author < inline; important declarations invert origin
/// and sit entirely above every normal bucket, with inline highest of all.
fn bucket(weight: &CascadeWeight) -> u8 {
    match (weight.is_important, weight.is_inline_style, weight.origin) {
        (false, false, Origin::UserAgent) => 0,
        (false, false, Origin::User) => 1,
        (false, false, Origin::Author) => 2,
        (false, true, _) => 3,
        (true, false, Origin::Author) => 4,
        (true, false, Origin::User) => 5,
        (true, false, Origin::UserAgent) => 6,
        (true, true, _) => 7,
    }
}

impl PartialOrd for CascadeWeight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CascadeWeight {
    fn cmp(&self, other: &Self) -> Ordering {
        bucket(self)
            .cmp(&bucket(other))
            .then_with(|| layer_order(self).cmp(&layer_order(other)))
            .then_with(|| self.specificity.cmp(&other.specificity))
            .then_with(|| self.source_order.cmp(&other.source_order))
    }
}

/// Within one origin/importance bucket: for normal declarations, unlayered
/// beats any layer, and a later-declared layer beats an earlier one. For
/// important declarations this inverts: an earlier layer beats a later one,
/// and any layer beats unlayered.
fn layer_order(weight: &CascadeWeight) -> i64 {
    let layer_rank = match weight.layer {
        Layer::Unlayered => i64::from(u32::MAX) + 1,
        Layer::Named(order) => i64::from(order),
    };
    if weight.is_important {
        // Lower declared order should win; invert so `Ord`'s "larger wins"
        // semantics still apply, and so unlayered (treated as "infinitely
        // late") loses to every real layer.
        if matches!(weight.layer, Layer::Unlayered) {
            -1
        } else {
            i64::from(u32::MAX) - layer_rank
        }
    } else {
        layer_rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specificity_ordering() {
        let a = Specificity { ids: 0, classes: 1, elements: 0 };
        let b = Specificity { ids: 1, classes: 0, elements: 0 };
        assert!(a < b);
    }

    #[test]
    fn is_not_has_take_max_of_args() {
        let args = vec![Specificity { ids: 0, classes: 1, elements: 0 }, Specificity::id()];
        assert_eq!(Specificity::max_of(args), Specificity::id());
    }

    #[test]
    fn where_contributes_zero() {
        assert_eq!(Specificity::max_of(Vec::<Specificity>::new()), Specificity::ZERO);
    }

    #[test]
    fn important_author_beats_normal_inline() {
        let important_author = CascadeWeight {
            origin: Origin::Author,
            is_important: true,
            is_inline_style: false,
            layer: Layer::Unlayered,
            specificity: Specificity::ZERO,
            source_order: 0,
        };
        let normal_inline = CascadeWeight {
            origin: Origin::Author,
            is_important: false,
            is_inline_style: true,
            layer: Layer::Unlayered,
            specificity: Specificity::ZERO,
            source_order: 1,
        };
        assert!(important_author > normal_inline);
    }

    #[test]
    fn unlayered_beats_layered_when_normal() {
        let unlayered = CascadeWeight {
            origin: Origin::Author,
            is_important: false,
            is_inline_style: false,
            layer: Layer::Unlayered,
            specificity: Specificity::ZERO,
            source_order: 0,
        };
        let layered = CascadeWeight {
            origin: Origin::Author,
            is_important: false,
            is_inline_style: false,
            layer: Layer::Named(5),
            specificity: Specificity::ZERO,
            source_order: 1,
        };
        assert!(unlayered > layered);
    }

    #[test]
    fn layered_beats_unlayered_when_important() {
        let unlayered = CascadeWeight {
            origin: Origin::Author,
            is_important: true,
            is_inline_style: false,
            layer: Layer::Unlayered,
            specificity: Specificity::ZERO,
            source_order: 0,
        };
        let layered = CascadeWeight {
            origin: Origin::Author,
            is_important: true,
            is_inline_style: false,
            layer: Layer::Named(5),
            specificity: Specificity::ZERO,
            source_order: 1,
        };
        assert!(layered > unlayered);
    }
}
