//! [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
//!
//! Specificity is folded into one integer with strictly decreasing weights:
//! "count the number of ID selectors in the selector (= A), count the number
//! of class selectors, attributes selectors, and pseudo-classes in the
//! selector (= B), count the number of type selectors and pseudo-elements in
//! the selector (= C)". A, B and C occupy separate decimal ranges so the
//! integers compare like the triples for any realistic selector.

use crate::selector::{ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};

/// Weight of `*`, `%placeholder` and `&`.
pub const SPECIFICITY_UNIVERSAL: u64 = 0;
/// Weight of a type selector or pseudo-element.
pub const SPECIFICITY_TYPE: u64 = 1;
/// Weight of a class, attribute, or pseudo-class selector.
pub const SPECIFICITY_CLASS: u64 = 1_000;
/// Weight of an ID selector.
pub const SPECIFICITY_ID: u64 = 1_000_000;

impl SimpleSelector {
    /// The weight this simple selector contributes.
    ///
    /// A selector-argument pseudo-class such as `:not(.a)` counts as its
    /// argument: "the specificity of a :not() pseudo-class is replaced by
    /// the specificity of the most specific complex selector in its
    /// selector list argument".
    #[must_use]
    pub fn specificity(&self) -> u64 {
        match self {
            Self::Id(_) => SPECIFICITY_ID,
            Self::Class(_) | Self::Attribute(_) => SPECIFICITY_CLASS,
            Self::PseudoClass(pseudo) => pseudo
                .selector()
                .map_or(SPECIFICITY_CLASS, SelectorList::specificity),
            Self::Type { .. } | Self::PseudoElement(_) => SPECIFICITY_TYPE,
            Self::Universal(_) | Self::Placeholder(_) | Self::Parent => SPECIFICITY_UNIVERSAL,
        }
    }
}

impl CompoundSelector {
    /// Sum of the component weights.
    #[must_use]
    pub fn specificity(&self) -> u64 {
        self.iter().map(SimpleSelector::specificity).sum()
    }
}

impl ComplexSelector {
    /// Sum of the compound specificities along the chain.
    #[must_use]
    pub fn specificity(&self) -> u64 {
        self.compounds().map(CompoundSelector::specificity).sum()
    }
}

impl SelectorList {
    /// Maximum over the alternatives; zero for an empty list.
    #[must_use]
    pub fn specificity(&self) -> u64 {
        self.iter()
            .map(ComplexSelector::specificity)
            .max()
            .unwrap_or(SPECIFICITY_UNIVERSAL)
    }
}
